//! Transport errors from the linking service client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Which time bound expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    /// Connecting, sending the form and receiving the response head.
    Connect,
    /// Waiting for the next chunk of the response body.
    Read,
}

impl fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("connect"),
            Self::Read => f.write_str("read"),
        }
    }
}

/// Errors from a single annotation round-trip.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Endpoint is not a usable URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Could not connect to the service.
    #[error("connection failed: {0}")]
    Connect(Arc<reqwest::Error>),

    /// A time bound expired; partial data was discarded.
    #[error("{phase} timeout after {after:?}")]
    Timeout { phase: TimeoutPhase, after: Duration },

    /// Service answered with something other than 200.
    #[error("HTTP error: {status}")]
    Status { status: u16 },

    /// Response body exceeded the size limit.
    #[error("response too large: more than {limit} bytes")]
    TooLarge { limit: usize },

    /// Reading the response body failed.
    #[error("failed to read response: {0}")]
    Body(Arc<reqwest::Error>),

    /// Response body is not UTF-8.
    #[error("response is not valid UTF-8")]
    Decode,

    /// Other network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() { TransportError::Connect(Arc::new(err)) } else { TransportError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransportError::Timeout { phase: TimeoutPhase::Read, after: Duration::from_millis(200) };
        assert_eq!(err.to_string(), "read timeout after 200ms");

        let err = TransportError::Status { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}
