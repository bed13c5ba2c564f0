//! Stdio MCP client: launches a tool server as a subprocess and forwards
//! tool calls to it.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

use super::protocol::{
    CallToolResult, Implementation, InitializeParams, InitializeResult, JsonRpcId,
    JsonRpcRequest, JsonRpcResponse, ToolsListResult, PROTOCOL_VERSION,
};
use crate::backend::ToolBackend;
use crate::error::Error;
use crate::error_code::ErrorKind;
use crate::types::tool::{Arguments, ToolCallResult, ToolCatalog};
use crate::Result;

pub const CLIENT_NAME: &str = "mcp-client";

/// How to launch a backend process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSpec {
    pub command: String,
    pub args: Vec<String>,
}

impl BackendSpec {
    /// Parse a launch target.
    ///
    /// - `path/to/server.py` runs with `python`
    /// - `path/to/server.js` runs with `node`
    /// - `stdio:command arg1 arg2` runs `command` directly
    pub fn parse(target: &str) -> Result<Self> {
        if let Some(cmd) = target.strip_prefix("stdio:") {
            let mut parts = cmd.split_whitespace();
            let command = parts.next().ok_or_else(|| Error::UnsupportedTarget {
                target: target.to_string(),
                reason: "Empty stdio command".to_string(),
            })?;
            return Ok(Self {
                command: command.to_string(),
                args: parts.map(str::to_string).collect(),
            });
        }

        let interpreter = match Path::new(target).extension().and_then(|e| e.to_str()) {
            Some("py") => "python",
            Some("js") => "node",
            _ => {
                return Err(Error::UnsupportedTarget {
                    target: target.to_string(),
                    reason: "Server script must be a .py or .js file".to_string(),
                })
            }
        };
        Ok(Self {
            command: interpreter.to_string(),
            args: vec![target.to_string()],
        })
    }
}

impl std::fmt::Display for BackendSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

type DynRead = Box<dyn AsyncRead + Send + Unpin>;
type BoxedReader = BufReader<DynRead>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct StdioState {
    child: Option<Child>,
    writer: BoxedWriter,
    reader: BoxedReader,
}

/// Tool backend reached over newline-delimited JSON-RPC.
pub struct McpClient {
    request_id: AtomicU64,
    state: Mutex<Option<StdioState>>,
}

impl McpClient {
    /// Spawn the process described by `spec` and perform the MCP handshake.
    pub async fn connect(spec: &BackendSpec) -> Result<Self> {
        tracing::debug!(target: "mcp-client", "Spawning: {}", spec);

        let mut child = Command::new(&spec.command)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Transport(format!("Failed to spawn '{}': {}", spec, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Transport("Failed to get stdin".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Transport("Failed to get stdout".to_string()))?;

        let client = Self::with_state(StdioState {
            child: Some(child),
            writer: Box::new(stdin),
            reader: BufReader::new(Box::new(stdout) as DynRead),
        });

        if let Err(e) = client.initialize().await {
            let _ = client.close().await;
            return Err(e);
        }
        Ok(client)
    }

    /// Wrap an already-open pair of streams. No handshake is performed.
    pub fn from_streams<R, W>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self::with_state(StdioState {
            child: None,
            writer: Box::new(writer),
            reader: BufReader::new(Box::new(reader) as DynRead),
        })
    }

    fn with_state(state: StdioState) -> Self {
        Self {
            request_id: AtomicU64::new(1),
            state: Mutex::new(Some(state)),
        }
    }

    fn next_id(&self) -> i64 {
        self.request_id.fetch_add(1, Ordering::SeqCst) as i64
    }

    /// `initialize` followed by `notifications/initialized`.
    pub async fn initialize(&self) -> Result<InitializeResult> {
        let params = InitializeParams {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info: Implementation {
                name: CLIENT_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        let result = self
            .call_method("initialize", Some(serde_json::to_value(params)?))
            .await?;
        let result: InitializeResult = serde_json::from_value(result)
            .map_err(|e| Error::Transport(format!("Invalid initialize result: {}", e)))?;

        self.send_notification("notifications/initialized", None)
            .await?;

        tracing::info!(
            server = %result.server_info.name,
            version = %result.server_info.version,
            "connected to tool server"
        );
        Ok(result)
    }

    async fn call_method(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let id = self.next_id();
        let request = JsonRpcRequest::new(id, method, params);
        let line = serde_json::to_string(&request)?;

        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(Error::NotConnected)?;

        tracing::debug!(target: "mcp-client", "-> {} (id={})", method, id);
        write_line(&mut state.writer, &line).await?;

        let expected = JsonRpcId::Number(id);
        let mut buf = String::new();
        loop {
            buf.clear();
            let n = state
                .reader
                .read_line(&mut buf)
                .await
                .map_err(|e| Error::Transport(format!("Read failed: {}", e)))?;
            if n == 0 {
                return Err(Error::Transport(
                    "Backend closed the connection".to_string(),
                ));
            }

            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            let raw: Value = match serde_json::from_str(trimmed) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(target: "mcp-client", error = %e, "skipping unparseable line from backend");
                    continue;
                }
            };
            // Notifications and server-initiated requests carry a method.
            if raw.get("method").is_some() {
                tracing::debug!(target: "mcp-client", "skipping message: {}", raw["method"]);
                continue;
            }

            let response: JsonRpcResponse = serde_json::from_value(raw)
                .map_err(|e| Error::Transport(format!("Invalid response: {}", e)))?;
            if response.id.as_ref() != Some(&expected) {
                tracing::debug!(target: "mcp-client", "skipping stale response (id={:?})", response.id);
                continue;
            }

            tracing::debug!(target: "mcp-client", "<- {} (id={})", method, id);

            if let Some(error) = response.error {
                return Err(Error::Rpc {
                    code: error.code,
                    message: error.message,
                });
            }
            return response.result.ok_or_else(|| {
                Error::Transport("Response has neither result nor error".to_string())
            });
        }
    }

    async fn send_notification(&self, method: &str, params: Option<Value>) -> Result<()> {
        let line = serde_json::to_string(&JsonRpcRequest::notification(method, params))?;
        let mut guard = self.state.lock().await;
        let state = guard.as_mut().ok_or(Error::NotConnected)?;
        tracing::debug!(target: "mcp-client", "-> {} (notification)", method);
        write_line(&mut state.writer, &line).await
    }

    /// Whether `close` has not been called yet.
    pub async fn is_open(&self) -> bool {
        self.state.lock().await.is_some()
    }
}

async fn write_line(writer: &mut BoxedWriter, line: &str) -> Result<()> {
    let io = async {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await
    };
    io.await
        .map_err(|e| Error::Transport(format!("Write failed: {}", e)))
}

/// Turn the text content of a `tools/call` result back into JSON.
fn content_value(result: &CallToolResult) -> Value {
    let text = result.text();
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

#[async_trait]
impl ToolBackend for McpClient {
    async fn list_tools(&self) -> Result<ToolCatalog> {
        let result = self.call_method("tools/list", None).await?;
        let list: ToolsListResult = serde_json::from_value(result)
            .map_err(|e| Error::Transport(format!("Failed to parse tools/list result: {}", e)))?;
        ToolCatalog::new(list.tools)
    }

    async fn call_tool(&self, name: &str, arguments: &Arguments) -> Result<ToolCallResult> {
        let params = json!({ "name": name, "arguments": arguments });
        match self.call_method("tools/call", Some(params)).await {
            Ok(result) => {
                let result: CallToolResult = serde_json::from_value(result).map_err(|e| {
                    Error::Transport(format!("Failed to parse tools/call result: {}", e))
                })?;
                if result.is_error {
                    Ok(ToolCallResult::failure(
                        name,
                        ErrorKind::InternalError,
                        result.text(),
                    ))
                } else {
                    Ok(ToolCallResult::success(name, content_value(&result)))
                }
            }
            Err(Error::Rpc { code, message }) => Ok(ToolCallResult::failure(
                name,
                ErrorKind::from_rpc_code(code),
                message,
            )),
            Err(e) => Err(e),
        }
    }

    async fn close(&self) -> Result<()> {
        let mut guard = self.state.lock().await;
        if let Some(state) = guard.take() {
            if let Some(mut child) = state.child {
                tracing::debug!(target: "mcp-client", "terminating backend process");
                let _ = child.kill().await;
            }
        }
        Ok(())
    }
}
