//! MCP 协议模块：基于 stdio 的 JSON-RPC 工具服务端与客户端。
//!
//! Model Context Protocol over stdio. One JSON-RPC 2.0 message per line.
//!
//! - [`McpServer`] serves any [`ToolBackend`](crate::backend::ToolBackend)
//!   on stdin/stdout (`initialize`, `tools/list`, `tools/call`, `ping`).
//! - [`McpClient`] launches a server process described by a [`BackendSpec`]
//!   and is itself a `ToolBackend`, so the agent cannot tell a local backend
//!   from a remote one.
//!
//! Tool-level failures travel as JSON-RPC errors on the wire and are turned
//! back into failure outcomes by the client:
//!
//! | Outcome kind        | JSON-RPC code |
//! |---------------------|---------------|
//! | `unknown_tool`      | -32601        |
//! | `invalid_arguments` | -32602        |
//! | `internal_error`    | -32603        |

pub mod client;
pub mod protocol;
pub mod server;

pub use client::{BackendSpec, McpClient};
pub use server::McpServer;
