//! Loop states and the report produced by one query.

use std::fmt;

use crate::error::Error;
use crate::types::message::ConversationState;
use crate::types::tool::ToolCallRequest;

/// States of the tool-calling loop for a single query.
#[derive(Debug)]
pub(crate) enum LoopState {
    AwaitingModel,
    ModelRespondedWithText(String),
    ModelRespondedWithToolCalls {
        text: Option<String>,
        calls: Vec<ToolCallRequest>,
    },
    Done,
    Aborted(AbortReason),
}

/// Why a query ended without a final answer.
#[derive(Debug)]
pub enum AbortReason {
    /// The model kept requesting tools until the iteration budget ran out.
    BudgetExhausted { max_iterations: usize },
    /// A model call, a backend call or the connection itself failed.
    Failed(Error),
}

impl AbortReason {
    /// Stable label used in the diagnostic text.
    pub fn label(&self) -> &'static str {
        match self {
            AbortReason::BudgetExhausted { .. } => "budget_exhausted",
            AbortReason::Failed(e) => e.kind().name(),
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::BudgetExhausted { max_iterations } => write!(
                f,
                "no final answer after {} model calls",
                max_iterations
            ),
            AbortReason::Failed(e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug)]
pub enum QueryOutcome {
    Answered(String),
    Aborted {
        /// Text the model produced before the loop was aborted.
        partial: String,
        reason: AbortReason,
    },
}

/// Everything observable about one `run_query` call.
#[derive(Debug)]
pub struct QueryReport {
    pub outcome: QueryOutcome,
    /// Number of model calls made.
    pub iterations: usize,
    pub conversation: ConversationState,
}

impl QueryReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, QueryOutcome::Aborted { .. })
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match &self.outcome {
            QueryOutcome::Answered(_) => None,
            QueryOutcome::Aborted { reason, .. } => Some(reason),
        }
    }

    /// The answer, or the partial text followed by a one-line diagnostic of
    /// the form `Aborted (<label>): <message>`.
    pub fn into_text(self) -> String {
        match self.outcome {
            QueryOutcome::Answered(text) => text,
            QueryOutcome::Aborted { partial, reason } => {
                let diagnostic = format!("Aborted ({}): {}", reason.label(), reason);
                if partial.is_empty() {
                    diagnostic
                } else {
                    format!("{}\n{}", partial, diagnostic)
                }
            }
        }
    }
}
