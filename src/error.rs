use crate::error_code::ErrorKind;
use thiserror::Error;

/// Unified error type for the bridge.
///
/// Tool-level failures (unknown tool, bad arguments) travel as
/// [`ToolCallResult`](crate::types::tool::ToolCallResult) values instead, or
/// as [`Error::Rpc`] when a remote backend rejects the call; the rest of this
/// type covers everything that stops an operation outright.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported backend target '{target}': {reason}")]
    UnsupportedTarget { target: String, reason: String },

    #[error("Not connected to a tool backend")]
    NotConnected,

    #[error("{operation} timed out after {millis} ms")]
    Timeout { operation: String, millis: u64 },

    #[error("Model endpoint failure: {message}{}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Endpoint {
        status: Option<u16>,
        message: String,
    },

    #[error("Backend transport error: {0}")]
    Transport(String),

    #[error("Backend reported error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify this error into one of the bridge's error kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedTarget { .. } => ErrorKind::UnsupportedTarget,
            Error::NotConnected => ErrorKind::NotConnected,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Http(e) if e.is_timeout() => ErrorKind::Timeout,
            Error::Endpoint { .. } | Error::Http(_) => ErrorKind::EndpointFailure,
            Error::Rpc { code, .. } => ErrorKind::from_rpc_code(*code),
            Error::Transport(_)
            | Error::Configuration(_)
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Internal(_) => ErrorKind::InternalError,
        }
    }

    pub fn endpoint(message: impl Into<String>) -> Self {
        Error::Endpoint {
            status: None,
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, after: std::time::Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            millis: after.as_millis() as u64,
        }
    }
}
