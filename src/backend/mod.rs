//! 工具后端模块：定义 ToolBackend trait 及内置的农产品工具实现。
//!
//! Tool backends: anything that can list tools and execute them.
//!
//! Two implementations ship with the crate:
//! - [`ProduceBackend`] runs the potato/tomato tools in-process; the
//!   `produce-server` binary serves it over stdio.
//! - [`McpClient`](crate::mcp::McpClient) forwards to a backend running in a
//!   subprocess.
//!
//! Tool-level failures (unknown tool, bad arguments) are returned as
//! `Ok(ToolCallResult)` with a failure outcome so the model can retry.
//! `Err` is reserved for the backend itself being unusable.

pub mod produce;
pub mod validation;

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::tool::{Arguments, ToolCallResult, ToolCatalog};
use crate::Result;

pub use produce::ProduceBackend;
pub use validation::ArgumentValidator;

#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Enumerate the tools this backend offers, in a stable order.
    async fn list_tools(&self) -> Result<ToolCatalog>;

    /// Execute `name` with `arguments`.
    async fn call_tool(&self, name: &str, arguments: &Arguments) -> Result<ToolCallResult>;

    /// Release any resources held by the backend.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: ToolBackend + ?Sized> ToolBackend for Arc<T> {
    async fn list_tools(&self) -> Result<ToolCatalog> {
        (**self).list_tools().await
    }

    async fn call_tool(&self, name: &str, arguments: &Arguments) -> Result<ToolCallResult> {
        (**self).call_tool(name, arguments).await
    }

    async fn close(&self) -> Result<()> {
        (**self).close().await
    }
}
