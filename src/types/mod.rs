//! 类型系统模块：定义工具、对话轮次与模型响应的核心数据类型。
//!
//! Core data types shared by the backend, the wire protocol and the agent.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ToolDescriptor`] | Named tool with a JSON Schema for its input |
//! | [`ToolCatalog`] | Ordered, name-unique list of descriptors |
//! | [`ToolCallRequest`] | Tool invocation requested by the model |
//! | [`ToolCallResult`] | Success value or classified failure |
//! | [`ConversationState`] | Append-only turns of one query |
//! | [`ModelResponse`] | Text answer or tool calls from the model |
//!
//! ## Example
//!
//! ```rust
//! use mcp_tool_bridge::types::{ToolCatalog, ToolDescriptor};
//!
//! let catalog = ToolCatalog::new(vec![ToolDescriptor::new(
//!     "get_weather",
//!     "Get current weather for a location",
//!     serde_json::json!({
//!         "type": "object",
//!         "properties": { "location": { "type": "string" } },
//!         "required": ["location"]
//!     }),
//! )])
//! .unwrap();
//! assert!(catalog.contains("get_weather"));
//! ```

pub mod message;
pub mod tool;

pub use message::{ConversationState, ModelResponse, Role, Turn};
pub use tool::{Arguments, ToolCallRequest, ToolCallResult, ToolCatalog, ToolDescriptor, ToolOutcome};
