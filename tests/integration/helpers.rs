//! Helper functions for integration tests

use std::time::Duration;

use check_fritz::config::ProbeConfig;
use check_fritz::thresholds::Threshold;
use wiremock::MockServer;

/// Probe configuration pointing at a mock server, plain HTTP.
pub fn probe_config(server: &MockServer) -> ProbeConfig {
    let uri = url::Url::parse(&server.uri()).unwrap();

    ProbeConfig {
        hostname: uri.host_str().unwrap().to_string(),
        port: uri.port().unwrap(),
        username: "monitoring".to_string(),
        password: "secret".to_string(),
        modelgroup: "dsl".to_string(),
        tls: false,
        timeout: Duration::from_secs(5),
        divisor_max: 1000.0,
        divisor_current: 1_000_000.0,
        warning: None,
        critical: None,
        debug: false,
    }
}

pub fn threshold(expression: &str) -> Option<Threshold> {
    Some(Threshold::parse(expression).unwrap())
}

/// A SOAP response envelope carrying one named field.
pub fn soap_body(field: &str, value: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\">\
         <s:Body><u:Response xmlns:u=\"urn:dslforum-org:service:Test:1\">\
         <{field}>{value}</{field}>\
         </u:Response></s:Body></s:Envelope>"
    )
}
