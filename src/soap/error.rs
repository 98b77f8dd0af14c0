//! Error types for the SOAP transport

use std::fmt;

/// Result type alias for SOAP transport operations
pub type SoapResult<T> = Result<T, SoapError>;

/// Errors that can occur while talking to the TR-064 control endpoint
#[derive(Debug)]
pub enum SoapError {
    /// The HTTP request could not be performed
    Request(String),

    /// The control endpoint answered with a non-success HTTP status
    Status(u16),

    /// Neither a response nor an error arrived within the configured timeout
    Timeout(u64),

    /// The response channels closed before a result arrived
    ChannelClosed,
}

impl fmt::Display for SoapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoapError::Request(msg) => write!(f, "SOAP request failed: {}", msg),
            SoapError::Status(code) => {
                write!(f, "control endpoint returned HTTP status {}", code)
            }
            SoapError::Timeout(secs) => {
                write!(f, "timeout after {}s while waiting for the SOAP response", secs)
            }
            SoapError::ChannelClosed => {
                write!(f, "response channel closed before a result arrived")
            }
        }
    }
}

impl std::error::Error for SoapError {}
