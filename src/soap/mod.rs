//! SOAP-over-HTTP transport towards the TR-064 control endpoint
//!
//! One remote call is one spawned task. The task performs a single HTTP
//! attempt and delivers exactly one value on exactly one of two channels:
//! the raw response payload on the result channel, or a [`SoapError`] on the
//! error channel. The caller awaits both channels under a timeout via
//! [`collect_soap_responses`]; when that wait expires, the cancellation
//! signal is flipped so the task stops promptly instead of running to
//! completion unobserved.

pub mod error;
pub mod response;

use tokio::sync::{mpsc, watch};
use tracing::trace;

pub use error::{SoapError, SoapResult};

use crate::config::ProbeConfig;

/// One named argument of a SOAP action, rendered into the request body in
/// the order it was added.
#[derive(Debug, Clone)]
pub struct SoapVariable {
    pub name: String,
    pub value: String,
}

/// A fully constructed TR-064 request: connection parameters plus the
/// operation descriptor. Immutable once handed to the dispatcher.
#[derive(Debug, Clone)]
pub struct SoapRequest {
    hostname: String,
    port: u16,
    username: String,
    password: String,
    tls: bool,
    control_path: String,
    service: String,
    action: String,
    variables: Vec<SoapVariable>,
}

impl SoapRequest {
    pub fn new(config: &ProbeConfig, control_path: &str, service: &str, action: &str) -> Self {
        Self {
            hostname: config.hostname.clone(),
            port: config.port,
            username: config.username.clone(),
            password: config.password.clone(),
            tls: config.tls,
            control_path: control_path.to_string(),
            service: service.to_string(),
            action: action.to_string(),
            variables: Vec::new(),
        }
    }

    pub fn push_variable(&mut self, name: &str, value: &str) {
        self.variables.push(SoapVariable {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn endpoint(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!(
            "{scheme}://{}:{}{}",
            self.hostname, self.port, self.control_path
        )
    }

    fn namespace(&self) -> String {
        format!("urn:dslforum-org:service:{}:1", self.service)
    }

    pub fn soap_action(&self) -> String {
        format!("{}#{}", self.namespace(), self.action)
    }

    /// Renders the SOAP 1.1 envelope for this action.
    pub fn envelope(&self) -> String {
        let mut arguments = String::new();
        for variable in &self.variables {
            arguments.push_str(&format!(
                "<{name}>{value}</{name}>",
                name = variable.name,
                value = variable.value
            ));
        }

        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"utf-8\"?>",
                "<s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" ",
                "s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">",
                "<s:Body><u:{action} xmlns:u=\"{namespace}\">{arguments}</u:{action}>",
                "</s:Body></s:Envelope>"
            ),
            action = self.action,
            namespace = self.namespace(),
            arguments = arguments
        )
    }
}

/// Dispatch one remote call onto its own task.
///
/// The task writes exactly one value to either `resps` or `errs` and never
/// to both. When `cancel` flips to `true` (or its sender is dropped) before
/// the call finished, the task aborts without delivering anything.
pub fn spawn_soap_request(
    request: SoapRequest,
    resps: mpsc::Sender<Vec<u8>>,
    errs: mpsc::Sender<SoapError>,
    mut cancel: watch::Receiver<bool>,
    debug: bool,
) {
    tokio::spawn(async move {
        tokio::select! {
            _ = async { let _ = cancel.wait_for(|cancelled| *cancelled).await; } => {
                trace!("call to {} abandoned, dropping request", request.endpoint());
            }
            result = perform_soap_request(&request, debug) => match result {
                Ok(payload) => {
                    let _ = resps.send(payload).await;
                }
                Err(e) => {
                    let _ = errs.send(e).await;
                }
            }
        }
    });
}

/// Single HTTP attempt, no retries.
async fn perform_soap_request(request: &SoapRequest, debug: bool) -> SoapResult<Vec<u8>> {
    let endpoint = request.endpoint();
    let envelope = request.envelope();

    if debug {
        trace!("{endpoint}: {} -> {envelope}", request.soap_action());
    }

    // routers ship self-signed certificates
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .build()
        .map_err(|e| SoapError::Request(e.to_string()))?;

    let response = client
        .post(&endpoint)
        .basic_auth(&request.username, Some(&request.password))
        .header("Content-Type", "text/xml; charset=\"utf-8\"")
        .header("SOAPACTION", request.soap_action())
        .body(envelope)
        .send()
        .await
        .map_err(|e| SoapError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SoapError::Status(status.as_u16()));
    }

    let payload = response
        .bytes()
        .await
        .map_err(|e| SoapError::Request(e.to_string()))?
        .to_vec();

    if debug {
        trace!(
            "{endpoint}: received {} ({} bytes)",
            String::from_utf8_lossy(&payload),
            payload.len()
        );
    }

    Ok(payload)
}

/// Await `expected` raw payloads, the first error, or the timeout,
/// whichever comes first.
///
/// On timeout the cancellation signal is flipped before returning, so the
/// dispatched task terminates instead of finishing into the void. Retry
/// policy, if any, belongs to the caller; none is implemented.
pub async fn collect_soap_responses(
    resps: &mut mpsc::Receiver<Vec<u8>>,
    errs: &mut mpsc::Receiver<SoapError>,
    expected: usize,
    timeout: std::time::Duration,
    cancel: &watch::Sender<bool>,
) -> SoapResult<Vec<Vec<u8>>> {
    let collect = async {
        let mut payloads = Vec::with_capacity(expected);
        while payloads.len() < expected {
            tokio::select! {
                // a completed task closes both channels; drain results first
                biased;
                payload = resps.recv() => match payload {
                    Some(payload) => payloads.push(payload),
                    None => return Err(SoapError::ChannelClosed),
                },
                err = errs.recv() => match err {
                    Some(err) => return Err(err),
                    None => return Err(SoapError::ChannelClosed),
                },
            }
        }
        Ok(payloads)
    };

    match tokio::time::timeout(timeout, collect).await {
        Ok(result) => result,
        Err(_) => {
            let _ = cancel.send(true);
            Err(SoapError::Timeout(timeout.as_secs()))
        }
    }
}
