use std::sync::Arc;

use shopkeep_core::errors::ApplicationError;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{AssistantReply, LlmClient, LlmError, LlmRequest, Message};
use crate::prompt::SYSTEM_PROMPT;
use crate::session::{SessionError, SessionId, SessionStore};
use crate::tools::{render_output, ShoppingContext, ToolError, ToolRegistry};

pub const DEFAULT_MAX_TOOL_CYCLES: u32 = 8;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model backend failed: {0}")]
    Backend(#[from] LlmError),
    #[error("tool `{tool}` failed: {source}")]
    Tool {
        tool: String,
        #[source]
        source: ToolError,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("model was still requesting tools after {limit} tool cycles")]
    ToolCycleLimit { limit: u32 },
}

impl From<AgentError> for ApplicationError {
    fn from(value: AgentError) -> Self {
        match value {
            AgentError::Tool { source: ToolError::Domain(error), .. } => Self::Domain(error),
            AgentError::Session(error) => Self::Persistence(error.to_string()),
            other => Self::Integration(other.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TurnState {
    AwaitingModel,
    ExecutingTools(AssistantReply),
    Done(AssistantReply),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    /// Final assistant text shown to the customer.
    pub reply: String,
    /// Messages added to the session during this turn, user message first.
    pub appended: Vec<Message>,
    pub tool_cycles: u32,
}

pub struct AgentRuntime {
    llm: Arc<dyn LlmClient>,
    sessions: Arc<dyn SessionStore>,
    tools: ToolRegistry,
    system_prompt: String,
    max_tool_cycles: u32,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            llm,
            sessions,
            tools: ToolRegistry::shopping(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            max_tool_cycles: DEFAULT_MAX_TOOL_CYCLES,
        }
    }

    pub fn with_max_tool_cycles(mut self, max_tool_cycles: u32) -> Self {
        self.max_tool_cycles = max_tool_cycles;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn max_tool_cycles(&self) -> u32 {
        self.max_tool_cycles
    }

    /// Runs one customer turn to completion. History is saved only when the
    /// model finishes with a reply that requests no tools.
    pub async fn run_turn(
        &self,
        session_id: &SessionId,
        context: &mut ShoppingContext,
        text: &str,
    ) -> Result<TurnOutcome, AgentError> {
        info!(
            event_name = "agent.turn.started",
            session_id = %session_id,
            input_chars = text.chars().count(),
            "turn started"
        );

        let result = self.drive_turn(session_id, context, text).await;
        match &result {
            Ok(outcome) => info!(
                event_name = "agent.turn.completed",
                session_id = %session_id,
                tool_cycles = outcome.tool_cycles,
                appended = outcome.appended.len(),
                "turn completed"
            ),
            Err(error) => warn!(
                event_name = "agent.turn.failed",
                session_id = %session_id,
                error = %error,
                "turn failed"
            ),
        }
        result
    }

    async fn drive_turn(
        &self,
        session_id: &SessionId,
        context: &mut ShoppingContext,
        text: &str,
    ) -> Result<TurnOutcome, AgentError> {
        let mut history = self.sessions.load(session_id).await?.unwrap_or_default();
        let turn_start = history.len();
        history.push(Message::user(text));

        let schemas = self.tools.schemas();
        let mut tool_cycles = 0u32;
        let mut state = TurnState::AwaitingModel;

        let final_reply = loop {
            state = match state {
                TurnState::AwaitingModel => {
                    let request = LlmRequest {
                        system: self.system_prompt.clone(),
                        messages: history.clone(),
                        tools: schemas.clone(),
                    };
                    let reply = self.llm.complete(request).await?;
                    debug!(
                        event_name = "agent.turn.model_reply",
                        session_id = %session_id,
                        tool_calls = reply.tool_calls.len(),
                        "model replied"
                    );
                    if reply.requests_tools() {
                        TurnState::ExecutingTools(reply)
                    } else {
                        TurnState::Done(reply)
                    }
                }
                TurnState::ExecutingTools(reply) => {
                    if tool_cycles >= self.max_tool_cycles {
                        return Err(AgentError::ToolCycleLimit { limit: self.max_tool_cycles });
                    }
                    tool_cycles += 1;

                    // Sequential, in request order: later calls observe earlier cart changes.
                    let mut results = Vec::with_capacity(reply.tool_calls.len());
                    for invocation in &reply.tool_calls {
                        let output = self
                            .tools
                            .execute(&invocation.name, context, invocation.arguments.clone())
                            .await
                            .map_err(|source| AgentError::Tool {
                                tool: invocation.name.clone(),
                                source,
                            })?;
                        info!(
                            event_name = "agent.tool.executed",
                            session_id = %session_id,
                            tool = %invocation.name,
                            call_id = %invocation.id,
                            cart_items = context.cart().len(),
                            "tool executed"
                        );
                        results.push(Message::tool_result(invocation, render_output(&output)));
                    }

                    history.push(Message::from(reply));
                    history.extend(results);
                    TurnState::AwaitingModel
                }
                TurnState::Done(reply) => break reply,
            };
        };

        let reply = final_reply.content.clone().unwrap_or_default();
        history.push(Message::from(final_reply));
        let appended = history[turn_start..].to_vec();
        self.sessions.save(session_id.clone(), history).await?;

        Ok(TurnOutcome { reply, appended, tool_cycles })
    }
}
