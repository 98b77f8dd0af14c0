//! Failure behavior: every failure mode converges on one clean UNKNOWN
//! line, never a panic or an abrupt termination

use std::time::{Duration, Instant};

use check_fritz::Severity;
use check_fritz::checks::{check_downstream_current, check_downstream_max};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn test_unreachable_endpoint_is_unknown() {
    // no server listening here
    let server = MockServer::start().await;
    let config = probe_config(&server);
    drop(server);

    let result = check_downstream_max(&config).await;

    assert_eq!(result.severity, Severity::Unknown);
    assert!(result.perfdata.is_none());
    assert!(result.status_line().starts_with("UNKNOWN - "));
}

#[tokio::test]
async fn test_http_error_status_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upnp/control/wandslifconfig1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = check_downstream_max(&probe_config(&server)).await;

    assert_eq!(result.severity, Severity::Unknown);
    assert!(result.message.contains("500"), "{}", result.message);
}

#[tokio::test]
async fn test_undecodable_payload_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upnp/control/wandslifconfig1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login!</html>"))
        .mount(&server)
        .await;

    let result = check_downstream_max(&probe_config(&server)).await;

    assert_eq!(result.severity, Severity::Unknown);
    assert!(
        result.message.contains("NewDownstreamCurrRate"),
        "{}",
        result.message
    );
}

#[tokio::test]
async fn test_non_numeric_rate_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upnp/control/wandslifconfig1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(soap_body("NewDownstreamCurrRate", "n/a")),
        )
        .mount(&server)
        .await;

    let result = check_downstream_max(&probe_config(&server)).await;

    assert_eq!(result.severity, Severity::Unknown);
    assert!(
        result.message.contains("not a numeric rate"),
        "{}",
        result.message
    );
}

#[tokio::test]
async fn test_empty_history_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upnp/control/wancommonifconfig1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(soap_body("NewDS_CurrentBPS", "")),
        )
        .mount(&server)
        .await;

    let result = check_downstream_current(&probe_config(&server)).await;
    assert_eq!(result.severity, Severity::Unknown);
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upnp/control/wandslifconfig1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(soap_body("NewDownstreamCurrRate", "16000"))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let mut config = probe_config(&server);
    config.timeout = Duration::from_millis(200);

    let started = Instant::now();
    let result = check_downstream_max(&config).await;

    assert_eq!(result.severity, Severity::Unknown);
    assert!(result.message.contains("timeout"), "{}", result.message);
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "the check must give up at its own timeout, not the server's delay"
    );
}
