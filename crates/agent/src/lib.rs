//! Agent runtime for the shopping assistant.
//!
//! One customer turn is a request/act/observe loop:
//! 1. the conversation so far goes to the model (`llm`) together with the tool schemas
//! 2. any tool calls the model asks for run against the session's cart and catalog (`tools`)
//! 3. results are appended and the model is asked again, until it answers in plain text
//! 4. the finished history is checkpointed (`session`)
//!
//! The model only chooses which tool to call. Prices, totals and cart contents
//! always come from the catalog and cart in `shopkeep-core`.

pub mod llm;
pub mod openai;
pub mod prompt;
pub mod runtime;
pub mod session;
pub mod tools;

pub use llm::{AssistantReply, LlmClient, LlmError, LlmRequest, Message, ToolInvocation};
pub use runtime::{AgentError, AgentRuntime, TurnOutcome};
pub use session::{InMemorySessionStore, SessionId, SessionStore};
pub use tools::{ShoppingContext, ToolRegistry};
