//! 模型驱动抽象层：通过 trait 隔离具体的大模型函数调用 API。
//!
//! Model endpoint abstraction. The agent talks to a `Box<dyn ModelEndpoint>`,
//! so the concrete API (Gemini `generateContent` in production, scripted
//! endpoints in tests) is chosen at construction time.

pub mod gemini;

use async_trait::async_trait;

use crate::types::message::{ConversationState, ModelResponse};
use crate::utils::schema::FunctionDeclaration;
use crate::Result;

pub use gemini::GeminiDriver;

/// A language-model API capable of function calling.
///
/// Implementations translate the whole conversation on every call; they keep
/// no per-conversation state of their own.
#[async_trait]
pub trait ModelEndpoint: Send + Sync + std::fmt::Debug {
    /// Model identifier, used for logging.
    fn model(&self) -> &str;

    /// Ask the model for its next move given the conversation so far and the
    /// tools it may call.
    async fn generate(
        &self,
        conversation: &ConversationState,
        tools: &[FunctionDeclaration],
    ) -> Result<ModelResponse>;
}
