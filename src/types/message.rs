//! Conversation turns and model responses.

use serde::{Deserialize, Serialize};

use super::tool::{ToolCallRequest, ToolCallResult};

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    Tool,
}

/// One entry in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    User {
        text: String,
    },
    Model {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        calls: Vec<ToolCallRequest>,
    },
    Tool {
        result: ToolCallResult,
    },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn::User { text: text.into() }
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Turn::Model {
            text: Some(text.into()),
            calls: Vec::new(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Turn::User { .. } => Role::User,
            Turn::Model { .. } => Role::Model,
            Turn::Tool { .. } => Role::Tool,
        }
    }
}

/// Append-only conversation for a single query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationState {
    turns: Vec<Turn>,
}

impl ConversationState {
    /// Start a conversation with the user's query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(query)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Tool results recorded so far, in order.
    pub fn tool_results(&self) -> impl Iterator<Item = &ToolCallResult> {
        self.turns.iter().filter_map(|t| match t {
            Turn::Tool { result } => Some(result),
            _ => None,
        })
    }
}

/// What the model endpoint replied with.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelResponse {
    /// Final textual answer.
    Text(String),
    /// One or more tool invocations, optionally with accompanying text.
    ToolCalls {
        text: Option<String>,
        calls: Vec<ToolCallRequest>,
    },
}
