//! # mcp-tool-bridge
//!
//! 这是一个基于 stdio 的 MCP 工具服务端与 Gemini 函数调用客户端的 Rust 实现。
//!
//! A stdio tool server speaking the Model Context Protocol, and a client that
//! bridges it to the Gemini function-calling API.
//!
//! ## Overview
//!
//! The `produce-server` binary exposes two tools (`get_potatoes` and
//! `get_tomatoes`) as newline-delimited JSON-RPC on stdio. The `mcp-client`
//! binary launches such a server, advertises its tools to Gemini and relays
//! the model's tool calls until it produces an answer.
//!
//! ## Key Features
//!
//! - **Tool backends**: [`ToolBackend`] abstracts anything that lists and runs
//!   tools; [`ProduceBackend`] runs in-process, [`McpClient`] forwards to a
//!   subprocess
//! - **Schema validation**: arguments are checked against each tool's JSON
//!   Schema before dispatch
//! - **Agent loop**: [`ToolCallingAgent`] drives model → tool → model turns
//!   within an iteration budget and never panics on model or tool failures
//! - **Schema translation**: [`utils::normalize_schema`] rewrites MCP input
//!   schemas into Gemini's upper-case type names
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mcp_tool_bridge::{AgentConfig, ToolCallingAgent};
//!
//! #[tokio::main]
//! async fn main() -> mcp_tool_bridge::Result<()> {
//!     let mut agent = ToolCallingAgent::with_gemini(AgentConfig::from_env()?)?;
//!     let catalog = agent.connect("stdio:produce-server").await?;
//!     println!("tools: {:?}", catalog.names());
//!
//!     let answer = agent.process_query("How many small tomatoes are there?").await;
//!     println!("{}", answer);
//!     agent.close().await
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`agent`] | Tool-calling loop and query reports |
//! | [`backend`] | `ToolBackend` trait, produce tools, argument validation |
//! | [`mcp`] | JSON-RPC protocol, stdio server and client |
//! | [`drivers`] | `ModelEndpoint` trait and the Gemini driver |
//! | [`transport`] | HTTP client and API key lookup |
//! | [`types`] | Tool descriptors, calls, results and conversation turns |
//! | [`config`] | Environment-driven agent configuration |
//! | [`logging`] | Shared tracing setup for the binaries |

pub mod agent;
pub mod backend;
pub mod config;
pub mod drivers;
pub mod error_code;
pub mod logging;
pub mod mcp;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use agent::{AbortReason, QueryOutcome, QueryReport, ToolCallingAgent};
pub use backend::{ProduceBackend, ToolBackend};
pub use config::AgentConfig;
pub use drivers::{GeminiDriver, ModelEndpoint};
pub use error_code::ErrorKind;
pub use mcp::{BackendSpec, McpClient, McpServer};
pub use types::{
    message::{ConversationState, ModelResponse, Turn},
    tool::{Arguments, ToolCallRequest, ToolCallResult, ToolCatalog, ToolDescriptor, ToolOutcome},
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
