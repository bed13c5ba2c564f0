//! JSON-RPC 2.0 framing and the MCP payloads carried over it.
//!
//! Messages are exchanged one JSON object per line over stdio.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::tool::{Arguments, ToolDescriptor};

/// MCP protocol revision spoken by both ends.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Parse error - invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;

/// Invalid request - the JSON is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;

/// Method not found. Also used for unknown tool names.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// Invalid params.
pub const INVALID_PARAMS: i32 = -32602;

/// Internal error.
pub const INTERNAL_ERROR: i32 = -32603;

/// JSON-RPC request/response identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    Number(i64),
    String(String),
}

impl std::fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonRpcId::Number(n) => write!(f, "{}", n),
            JsonRpcId::String(s) => write!(f, "{}", s),
        }
    }
}

/// JSON-RPC 2.0 request (or notification when `id` is absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: i64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(JsonRpcId::Number(id)),
            method: method.into(),
            params,
        }
    }

    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: method.into(),
            params,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<JsonRpcId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<JsonRpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Parse error response (no id since the request could not be read).
    pub fn parse_error(message: &str) -> Self {
        Self::error(
            None,
            JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", message)),
        )
    }

    /// Invalid request response, echoing the id when one could be read.
    pub fn invalid_request(id: Option<JsonRpcId>, message: &str) -> Self {
        Self::error(
            id,
            JsonRpcError::new(INVALID_REQUEST, format!("Invalid request: {}", message)),
        )
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Name/version pair exchanged during `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    #[serde(default)]
    pub capabilities: Value,
    pub client_info: Implementation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: Implementation,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Result of `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<ToolDescriptor>,
}

/// Params of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Arguments>,
}

/// Result of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<ContentItem>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

impl CallToolResult {
    /// A single text block holding `value` as pretty-printed JSON.
    pub fn json_text(value: &Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![ContentItem::text(serde_json::to_string_pretty(value)?)],
            is_error: false,
        })
    }

    /// Concatenated text of all text blocks.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Content block within a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentItem {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notification_has_no_id_on_the_wire() {
        let n = JsonRpcRequest::notification("notifications/initialized", None);
        let v = serde_json::to_value(&n).unwrap();
        assert_eq!(v, json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }));
        assert!(n.is_notification());
    }

    #[test]
    fn test_error_response_shape() {
        let resp = JsonRpcResponse::error(
            Some(JsonRpcId::Number(7)),
            JsonRpcError::invalid_params("Missing required parameter: size"),
        );
        let v = serde_json::to_value(&resp).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["error"]["code"], -32602);
        assert!(v.get("result").is_none());
    }

    #[test]
    fn test_call_tool_result_text() {
        let result = CallToolResult::json_text(&json!({ "size": "L", "quantity": 10 })).unwrap();
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["content"][0]["type"], "text");
        let parsed: Value = serde_json::from_str(&result.text()).unwrap();
        assert_eq!(parsed["quantity"], 10);
    }

    #[test]
    fn test_initialize_result_uses_camel_case() {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.into(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: Some(false) }),
            },
            server_info: Implementation {
                name: "custom-mcp-server".into(),
                version: "0.1.0".into(),
            },
        };
        let v = serde_json::to_value(result).unwrap();
        assert_eq!(v["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(v["serverInfo"]["name"], "custom-mcp-server");
        assert_eq!(v["capabilities"]["tools"]["listChanged"], false);
    }
}
