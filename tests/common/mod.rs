//! Shared fixtures for integration tests
#![allow(dead_code)]

pub mod mock_server;

use async_trait::async_trait;
use mcp_tool_bridge::utils::FunctionDeclaration;
use mcp_tool_bridge::{
    Arguments, ConversationState, Error, ModelEndpoint, ModelResponse, ToolCallRequest,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What a scripted endpoint was asked, one entry per model call.
#[derive(Debug, Default)]
pub struct CallLog {
    pub conversations: Vec<ConversationState>,
    pub tools: Vec<Vec<FunctionDeclaration>>,
}

/// Model endpoint that replays a fixed list of responses and then fails.
#[derive(Debug)]
pub struct ScriptedEndpoint {
    replies: Mutex<VecDeque<ModelResponse>>,
    log: Arc<Mutex<CallLog>>,
}

impl ScriptedEndpoint {
    pub fn new(replies: Vec<ModelResponse>) -> (Box<Self>, Arc<Mutex<CallLog>>) {
        let log = Arc::new(Mutex::new(CallLog::default()));
        let endpoint = Box::new(Self {
            replies: Mutex::new(replies.into()),
            log: log.clone(),
        });
        (endpoint, log)
    }
}

#[async_trait]
impl ModelEndpoint for ScriptedEndpoint {
    fn model(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        conversation: &ConversationState,
        tools: &[FunctionDeclaration],
    ) -> mcp_tool_bridge::Result<ModelResponse> {
        {
            let mut log = self.log.lock().unwrap();
            log.conversations.push(conversation.clone());
            log.tools.push(tools.to_vec());
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::endpoint("script exhausted"))
    }
}

pub fn args(value: Value) -> Arguments {
    value.as_object().cloned().unwrap_or_default()
}

pub fn tool_call(name: &str, arguments: Value) -> ModelResponse {
    ModelResponse::ToolCalls {
        text: None,
        calls: vec![ToolCallRequest::new(name, args(arguments))],
    }
}

pub fn text(answer: &str) -> ModelResponse {
    ModelResponse::Text(answer.to_string())
}
