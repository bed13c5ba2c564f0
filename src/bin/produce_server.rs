//! produce-server：通过 stdio 提供土豆/番茄数量查询工具的 MCP 服务端
//!
//! Usage:
//!   produce-server              Serve on stdin/stdout until EOF or Ctrl-C
//!
//! Logs go to stderr; stdout carries only JSON-RPC responses.
//! Set `RUST_LOG=debug` to see each request.

use anyhow::Context;
use mcp_tool_bridge::{McpServer, ProduceBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mcp_tool_bridge::logging::init("info");

    if let Some(arg) = std::env::args().nth(1) {
        if arg == "--version" || arg == "-V" {
            eprintln!("produce-server {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    }

    let backend = ProduceBackend::new().context("failed to build produce catalog")?;
    let server = McpServer::new(backend);

    tokio::select! {
        result = server.run_stdio() => result.context("stdio server failed")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupt received, shutting down");
        }
    }

    Ok(())
}
