//! 标准错误类别：定义 7 个错误类别及其 JSON-RPC 错误码映射。
//!
//! Error kinds shared by the backend, the wire protocol and the agent loop.
//!
//! Every failure the bridge can report falls into one of seven kinds. The
//! kind decides where the failure surfaces:
//!
//! | Kind                | Surfaces as                                  |
//! |---------------------|----------------------------------------------|
//! | `unsupported_target`| `connect` error                              |
//! | `not_connected`     | `process_query` diagnostic                   |
//! | `unknown_tool`      | tool-result failure fed back to the model    |
//! | `invalid_arguments` | tool-result failure fed back to the model    |
//! | `timeout`           | `process_query` diagnostic (loop aborted)    |
//! | `endpoint_failure`  | `process_query` diagnostic (loop aborted)    |
//! | `internal_error`    | tool-result failure or abort, depending on origin |
//!
//! ## Example
//!
//! ```rust
//! use mcp_tool_bridge::error_code::ErrorKind;
//!
//! let kind = ErrorKind::from_rpc_code(-32602);
//! assert_eq!(kind, ErrorKind::InvalidArguments);
//! assert_eq!(kind.name(), "invalid_arguments");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::mcp::protocol::{INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};

/// Classification of a bridge failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The backend launch specification names a file type we cannot run.
    UnsupportedTarget,
    /// A query was issued before a backend was connected.
    NotConnected,
    /// The requested tool is not in the advertised catalog.
    UnknownTool,
    /// A required parameter is missing or has the wrong type.
    InvalidArguments,
    /// A model or backend call exceeded its configured timeout.
    Timeout,
    /// The model endpoint was unreachable or returned an unusable reply.
    EndpointFailure,
    /// Anything else, including backend transport failures.
    InternalError,
}

impl ErrorKind {
    /// Returns the stable snake_case name (e.g., `"unknown_tool"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UnsupportedTarget => "unsupported_target",
            Self::NotConnected => "not_connected",
            Self::UnknownTool => "unknown_tool",
            Self::InvalidArguments => "invalid_arguments",
            Self::Timeout => "timeout",
            Self::EndpointFailure => "endpoint_failure",
            Self::InternalError => "internal_error",
        }
    }

    /// JSON-RPC error code used on the backend wire.
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::UnknownTool => METHOD_NOT_FOUND,
            Self::InvalidArguments => INVALID_PARAMS,
            _ => INTERNAL_ERROR,
        }
    }

    /// Maps a JSON-RPC error code back to a kind.
    ///
    /// Codes without a dedicated mapping are internal errors.
    pub fn from_rpc_code(code: i32) -> Self {
        match code {
            METHOD_NOT_FOUND => Self::UnknownTool,
            INVALID_PARAMS => Self::InvalidArguments,
            _ => Self::InternalError,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_codes_map_back_to_kind() {
        for kind in [
            ErrorKind::UnknownTool,
            ErrorKind::InvalidArguments,
            ErrorKind::InternalError,
        ] {
            assert_eq!(ErrorKind::from_rpc_code(kind.rpc_code()), kind);
        }
    }

    #[test]
    fn test_unmapped_codes_are_internal() {
        assert_eq!(ErrorKind::from_rpc_code(-32700), ErrorKind::InternalError);
        assert_eq!(ErrorKind::from_rpc_code(42), ErrorKind::InternalError);
    }

    #[test]
    fn test_serde_uses_snake_case_names() {
        let v = serde_json::to_value(ErrorKind::InvalidArguments).unwrap();
        assert_eq!(v, serde_json::json!("invalid_arguments"));
        assert_eq!(ErrorKind::EndpointFailure.to_string(), "endpoint_failure");
    }
}
