//! Stdio MCP server: serves any [`ToolBackend`] as newline-delimited JSON-RPC.

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{
    CallToolResult, Implementation, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest,
    JsonRpcResponse, ServerCapabilities, ToolCallParams, ToolsCapability, ToolsListResult,
    PROTOCOL_VERSION,
};
use crate::backend::ToolBackend;
use crate::types::tool::{Arguments, ToolOutcome};
use crate::Result;

pub const DEFAULT_SERVER_NAME: &str = "custom-mcp-server";

pub struct McpServer<B> {
    backend: B,
    info: Implementation,
}

impl<B: ToolBackend> McpServer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            info: Implementation {
                name: DEFAULT_SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.info.name = name.into();
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Serve on the process's stdin/stdout until EOF.
    pub async fn run_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing responses to `writer`,
    /// until the reader reaches EOF.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();

        tracing::info!(server = %self.info.name, "MCP server running on stdio");

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                tracing::info!("EOF received, shutting down");
                break;
            }

            let trimmed = trim_line(&line);
            if trimmed.is_empty() {
                continue;
            }

            let request = match parse_request(trimmed) {
                Ok(req) => req,
                Err(response) => {
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            tracing::debug!("<- {} (id={:?})", request.method, request.id);

            if request.is_notification() {
                tracing::debug!(method = %request.method, "notification");
                continue;
            }

            let response = self.handle_request(request).await;
            match &response.error {
                Some(error) => tracing::debug!("-> error: {}", error),
                None => tracing::debug!("-> ok"),
            }
            write_response(&mut writer, &response).await?;
        }

        Ok(())
    }

    /// Dispatch one request to its handler.
    pub async fn handle_request(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        let id = req.id.clone();
        let result = match req.method.as_str() {
            "initialize" => self.handle_initialize(),
            "tools/list" => self.handle_tools_list().await,
            "tools/call" => self.handle_tools_call(req.params).await,
            "ping" => Ok(json!({})),
            method => Err(JsonRpcError::method_not_found(method)),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::error(id, error),
        }
    }

    fn handle_initialize(&self) -> std::result::Result<Value, JsonRpcError> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: self.info.clone(),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal(e.to_string()))
    }

    async fn handle_tools_list(&self) -> std::result::Result<Value, JsonRpcError> {
        let catalog = self
            .backend
            .list_tools()
            .await
            .map_err(|e| JsonRpcError::internal(e.to_string()))?;
        let result = ToolsListResult {
            tools: catalog.iter().cloned().collect(),
        };
        serde_json::to_value(result).map_err(|e| JsonRpcError::internal(e.to_string()))
    }

    async fn handle_tools_call(
        &self,
        params: Option<Value>,
    ) -> std::result::Result<Value, JsonRpcError> {
        let params = params.ok_or_else(|| JsonRpcError::invalid_params("Missing params"))?;
        let call: ToolCallParams = serde_json::from_value(params)
            .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))?;
        let arguments = call.arguments.unwrap_or_else(Arguments::new);

        let result = self
            .backend
            .call_tool(&call.name, &arguments)
            .await
            .map_err(|e| JsonRpcError::internal(e.to_string()))?;

        match result.outcome {
            ToolOutcome::Success { value } => {
                let content = CallToolResult::json_text(&value)
                    .map_err(|e| JsonRpcError::internal(e.to_string()))?;
                serde_json::to_value(content).map_err(|e| JsonRpcError::internal(e.to_string()))
            }
            ToolOutcome::Failure { kind, message } => {
                Err(JsonRpcError::new(kind.rpc_code(), message))
            }
        }
    }
}

fn trim_line(line: &[u8]) -> &[u8] {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &line[start..end]
}

/// Decode one request line, or build the error reply it deserves.
fn parse_request(line: &[u8]) -> std::result::Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_slice(line).map_err(|e| {
        tracing::warn!(error = %e, "unparseable request line");
        JsonRpcResponse::parse_error(&e.to_string())
    })?;

    let id = value
        .get("id")
        .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "malformed request object");
        JsonRpcResponse::invalid_request(id, &e.to_string())
    })
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let output = serde_json::to_string(response)?;
    writer.write_all(output.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
