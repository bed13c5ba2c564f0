//! 工具调用代理：驱动“模型 → 工具 → 模型”循环，直至得到最终回答或耗尽迭代预算。
//!
//! # Tool-calling agent
//!
//! [`ToolCallingAgent`] owns one backend connection and one model endpoint.
//! Each [`process_query`](ToolCallingAgent::process_query) runs the loop:
//!
//! ```text
//! AwaitingModel ──text──────────▶ ModelRespondedWithText ──▶ Done
//!      ▲    │
//!      │    └──tool calls───────▶ ModelRespondedWithToolCalls
//!      │                                   │ dispatch each call
//!      └───────────────────────────────────┘
//! ```
//!
//! Any state may end in `Aborted`: the iteration budget ran out, the model
//! endpoint failed or timed out, or the backend connection broke. Unknown
//! tools and bad arguments are not aborts; they are fed back to the model as
//! failed tool results so it can try again.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcp_tool_bridge::{AgentConfig, ToolCallingAgent};
//!
//! #[tokio::main]
//! async fn main() -> mcp_tool_bridge::Result<()> {
//!     let config = AgentConfig::from_env()?;
//!     let mut agent = ToolCallingAgent::with_gemini(config)?;
//!     agent.connect("stdio:produce-server").await?;
//!     println!("{}", agent.process_query("How many large potatoes?").await);
//!     agent.close().await
//! }
//! ```

mod state;

pub use state::{AbortReason, QueryOutcome, QueryReport};

use std::time::Instant;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::backend::ToolBackend;
use crate::config::AgentConfig;
use crate::drivers::{GeminiDriver, ModelEndpoint};
use crate::error::Error;
use crate::error_code::ErrorKind;
use crate::mcp::{BackendSpec, McpClient};
use crate::types::message::{ConversationState, ModelResponse, Turn};
use crate::types::tool::{ToolCallRequest, ToolCallResult, ToolCatalog};
use crate::utils::schema::{to_function_declaration, FunctionDeclaration};
use crate::Result;
use state::LoopState;

struct Session {
    backend: Box<dyn ToolBackend>,
    catalog: ToolCatalog,
    declarations: Vec<FunctionDeclaration>,
}

pub struct ToolCallingAgent {
    endpoint: Box<dyn ModelEndpoint>,
    config: AgentConfig,
    session: Option<Session>,
}

impl ToolCallingAgent {
    pub fn new(endpoint: Box<dyn ModelEndpoint>, config: AgentConfig) -> Self {
        Self {
            endpoint,
            config,
            session: None,
        }
    }

    /// Agent backed by the Gemini API described in `config`.
    pub fn with_gemini(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        if config.api_key.is_none() {
            warn!("no Gemini API key configured; model calls will likely be rejected");
        }
        let driver = GeminiDriver::from_config(&config)?;
        Ok(Self::new(Box::new(driver), config))
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Catalog of the connected backend, if any.
    pub fn catalog(&self) -> Option<&ToolCatalog> {
        self.session.as_ref().map(|s| &s.catalog)
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Launch the backend named by `target` and fetch its tool catalog.
    ///
    /// `target` is a `.py`/`.js` script path or `stdio:<command> [args..]`.
    /// Any previous backend is closed first.
    pub async fn connect(&mut self, target: &str) -> Result<&ToolCatalog> {
        let spec = BackendSpec::parse(target)?;
        self.close().await?;

        let limit = self.config.backend_timeout;
        let client = timeout(limit, McpClient::connect(&spec))
            .await
            .map_err(|_| Error::timeout("backend connect", limit))??;
        self.attach_backend(client).await
    }

    /// Use an already-constructed backend for subsequent queries.
    pub async fn attach_backend<B>(&mut self, backend: B) -> Result<&ToolCatalog>
    where
        B: ToolBackend + 'static,
    {
        self.close().await?;

        let limit = self.config.backend_timeout;
        let catalog = match timeout(limit, backend.list_tools()).await {
            Ok(Ok(catalog)) => catalog,
            Ok(Err(e)) => {
                let _ = backend.close().await;
                return Err(e);
            }
            Err(_) => {
                let _ = backend.close().await;
                return Err(Error::timeout("tools/list", limit));
            }
        };
        let declarations = catalog.iter().map(to_function_declaration).collect();

        info!(tools = ?catalog.names(), "Connected to server with tools");

        let session = self.session.insert(Session {
            backend: Box::new(backend),
            catalog,
            declarations,
        });
        Ok(&session.catalog)
    }

    /// Release the backend. Safe to call when not connected.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            debug!("closing tool backend");
            session.backend.close().await?;
        }
        Ok(())
    }

    /// Run one query to completion and return the answer text, or a
    /// diagnostic starting with `Aborted` when no answer could be produced.
    pub async fn process_query(&mut self, query: &str) -> String {
        self.run_query(query).await.into_text()
    }

    /// Like [`process_query`](Self::process_query) but returns the full report.
    pub async fn run_query(&mut self, query: &str) -> QueryReport {
        let mut conversation = ConversationState::new(query);
        let Some(session) = self.session.as_ref() else {
            return QueryReport {
                outcome: QueryOutcome::Aborted {
                    partial: String::new(),
                    reason: AbortReason::Failed(Error::NotConnected),
                },
                iterations: 0,
                conversation,
            };
        };

        let start = Instant::now();
        let max_iterations = self.config.max_iterations;
        let mut iterations = 0usize;
        let mut output: Vec<String> = Vec::new();
        let mut state = LoopState::AwaitingModel;

        let outcome = loop {
            state = match state {
                LoopState::AwaitingModel => {
                    if iterations >= max_iterations {
                        LoopState::Aborted(AbortReason::BudgetExhausted { max_iterations })
                    } else {
                        iterations += 1;
                        debug!(iteration = iterations, model = self.endpoint.model(), "calling model");
                        match self.call_model(&conversation, &session.declarations).await {
                            Ok(ModelResponse::Text(text)) => LoopState::ModelRespondedWithText(text),
                            Ok(ModelResponse::ToolCalls { text, calls }) => {
                                LoopState::ModelRespondedWithToolCalls { text, calls }
                            }
                            Err(e) => LoopState::Aborted(AbortReason::Failed(e)),
                        }
                    }
                }
                LoopState::ModelRespondedWithText(text) => {
                    conversation.push(Turn::model_text(text.clone()));
                    output.push(text);
                    LoopState::Done
                }
                LoopState::ModelRespondedWithToolCalls { text, calls } => {
                    if let Some(t) = text.as_deref().filter(|t| !t.is_empty()) {
                        output.push(t.to_string());
                    }
                    conversation.push(Turn::Model {
                        text,
                        calls: calls.clone(),
                    });

                    let mut next = LoopState::AwaitingModel;
                    for call in &calls {
                        match self.dispatch(session, call).await {
                            Ok(result) => conversation.push(Turn::Tool { result }),
                            Err(e) => {
                                next = LoopState::Aborted(AbortReason::Failed(e));
                                break;
                            }
                        }
                    }
                    next
                }
                LoopState::Done => break QueryOutcome::Answered(output.join("\n")),
                LoopState::Aborted(reason) => {
                    warn!(reason = %reason, iterations, "query aborted");
                    break QueryOutcome::Aborted {
                        partial: output.join("\n"),
                        reason,
                    };
                }
            };
        };

        info!(
            iterations,
            turns = conversation.len(),
            aborted = matches!(outcome, QueryOutcome::Aborted { .. }),
            duration_ms = start.elapsed().as_millis() as u64,
            "query finished"
        );

        QueryReport {
            outcome,
            iterations,
            conversation,
        }
    }

    async fn call_model(
        &self,
        conversation: &ConversationState,
        declarations: &[FunctionDeclaration],
    ) -> Result<ModelResponse> {
        let limit = self.config.model_timeout;
        timeout(limit, self.endpoint.generate(conversation, declarations))
            .await
            .map_err(|_| Error::timeout("model call", limit))?
    }

    /// Execute one tool call. `Err` means the backend itself is unusable.
    async fn dispatch(&self, session: &Session, call: &ToolCallRequest) -> Result<ToolCallResult> {
        info!(call_id = %call.id, tool = %call.name, "Model wants to call a tool");

        if !session.catalog.contains(&call.name) {
            return Ok(ToolCallResult::failure(
                &call.name,
                ErrorKind::UnknownTool,
                format!("Unknown tool: {}", call.name),
            ));
        }

        let limit = self.config.backend_timeout;
        let result = timeout(limit, session.backend.call_tool(&call.name, &call.arguments))
            .await
            .map_err(|_| Error::timeout(format!("tools/call {}", call.name), limit))?;

        match result {
            Ok(result) => {
                debug!(call_id = %call.id, success = result.is_success(), "tool finished");
                Ok(result)
            }
            Err(e @ Error::Rpc { .. }) => {
                Ok(ToolCallResult::failure(&call.name, e.kind(), e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
