//! Gemini generateContent 驱动：实现对话与函数调用的请求/响应格式转换
//!
//! Google Gemini `generateContent` driver. Key points:
//! - Uses `contents` with `parts`; roles are `user` and `model`.
//! - Tools go in `tools[0].functionDeclarations`.
//! - Model tool calls arrive as `functionCall` parts; results are sent back as
//!   `functionResponse` parts in a `user` content.
//! - Response: `candidates[0].content.parts`.
//! - API key is passed as `?key=` query parameter, not in headers.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::ModelEndpoint;
use crate::config::AgentConfig;
use crate::error::Error;
use crate::transport::HttpTransport;
use crate::types::message::{ConversationState, ModelResponse, Turn};
use crate::types::tool::{ToolCallRequest, ToolCallResult, ToolOutcome};
use crate::utils::schema::FunctionDeclaration;
use crate::Result;

/// Google Gemini generateContent API driver.
#[derive(Debug)]
pub struct GeminiDriver {
    transport: HttpTransport,
    model: String,
}

impl GeminiDriver {
    pub fn new(transport: HttpTransport, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            &config.base_url,
            config.api_key.clone(),
            config.model_timeout,
        )?;
        Ok(Self::new(transport, &config.model))
    }

    fn path(&self) -> String {
        format!("/v1beta/models/{}:generateContent", self.model)
    }

    /// Convert the conversation to Gemini `contents`.
    ///
    /// Consecutive tool results are merged into a single `user` content so
    /// that each `functionCall` turn is answered by exactly one content.
    fn contents(conversation: &ConversationState) -> Vec<Value> {
        let mut contents: Vec<Value> = Vec::new();
        let mut pending_responses: Vec<Value> = Vec::new();

        for turn in conversation.turns() {
            if let Turn::Tool { result } = turn {
                pending_responses.push(json!({
                    "functionResponse": {
                        "name": result.tool_name,
                        "response": Self::function_response(result),
                    }
                }));
                continue;
            }

            if !pending_responses.is_empty() {
                contents.push(json!({
                    "role": "user",
                    "parts": std::mem::take(&mut pending_responses),
                }));
            }

            match turn {
                Turn::User { text } => contents.push(json!({
                    "role": "user",
                    "parts": [{ "text": text }],
                })),
                Turn::Model { text, calls } => {
                    let mut parts: Vec<Value> = Vec::new();
                    if let Some(t) = text.as_deref().filter(|t| !t.is_empty()) {
                        parts.push(json!({ "text": t }));
                    }
                    for call in calls {
                        parts.push(json!({
                            "functionCall": { "name": call.name, "args": call.arguments }
                        }));
                    }
                    contents.push(json!({ "role": "model", "parts": parts }));
                }
                Turn::Tool { .. } => {}
            }
        }

        if !pending_responses.is_empty() {
            contents.push(json!({ "role": "user", "parts": pending_responses }));
        }
        contents
    }

    /// `functionResponse.response` payload for a tool result.
    fn function_response(result: &ToolCallResult) -> Value {
        match &result.outcome {
            ToolOutcome::Success { value } => json!({ "result": value }),
            ToolOutcome::Failure { kind, message } => json!({
                "error": { "kind": kind.name(), "message": message }
            }),
        }
    }

    /// Build the `generateContent` request body.
    pub fn build_request(conversation: &ConversationState, tools: &[FunctionDeclaration]) -> Value {
        let mut body = json!({
            "contents": Self::contents(conversation),
        });
        if !tools.is_empty() {
            body["tools"] = json!([{ "functionDeclarations": tools }]);
        }
        body
    }

    /// Parse a `generateContent` reply.
    pub fn parse_response(body: &Value) -> Result<ModelResponse> {
        // Gemini: { candidates: [{ content: { parts: [{text}|{functionCall}] }, finishReason }] }
        let parts = body
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                let reason = body
                    .pointer("/promptFeedback/blockReason")
                    .and_then(Value::as_str);
                match reason {
                    Some(r) => Error::endpoint(format!("No response found (blocked: {})", r)),
                    None => Error::endpoint("No response found"),
                }
            })?;

        let mut texts: Vec<&str> = Vec::new();
        let mut calls: Vec<ToolCallRequest> = Vec::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                texts.push(text);
            } else if let Some(call) = part.get("functionCall") {
                let name = call
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::endpoint("functionCall part without a name"))?;
                let arguments = call
                    .get("args")
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                calls.push(ToolCallRequest::new(name, arguments));
            }
        }

        // Parts such as `thought` carry neither an answer nor a call.
        if texts.is_empty() && calls.is_empty() {
            return Err(Error::endpoint("No response found"));
        }

        let text = texts.join("\n");
        if calls.is_empty() {
            Ok(ModelResponse::Text(text))
        } else {
            Ok(ModelResponse::ToolCalls {
                text: if text.is_empty() { None } else { Some(text) },
                calls,
            })
        }
    }
}

#[async_trait]
impl ModelEndpoint for GeminiDriver {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        conversation: &ConversationState,
        tools: &[FunctionDeclaration],
    ) -> Result<ModelResponse> {
        let body = Self::build_request(conversation, tools);
        let reply = self.transport.post_json(&self.path(), &body).await?;
        Self::parse_response(&reply)
    }
}
