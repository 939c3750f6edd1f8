use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A tool call requested by the model, correlated to its result by `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self { id: id.into(), name: name.into(), arguments }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    User {
        content: String,
    },
    Assistant {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolInvocation>,
    },
    Tool {
        tool_call_id: String,
        name: String,
        content: String,
    },
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::User { content: content.into() }
    }

    pub fn tool_result(invocation: &ToolInvocation, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: invocation.id.clone(),
            name: invocation.name.clone(),
            content: content.into(),
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::User { content } | Self::Tool { content, .. } => Some(content),
            Self::Assistant { content, .. } => content.as_deref(),
        }
    }
}

impl From<AssistantReply> for Message {
    fn from(reply: AssistantReply) -> Self {
        Self::Assistant { content: reply.content, tool_calls: reply.tool_calls }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssistantReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
}

impl AssistantReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), tool_calls: Vec::new() }
    }

    pub fn tool_call(invocation: ToolInvocation) -> Self {
        Self { content: None, tool_calls: vec![invocation] }
    }

    pub fn with_tool_call(mut self, invocation: ToolInvocation) -> Self {
        self.tool_calls.push(invocation);
        self
    }

    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Declaration of a tool as advertised to the model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LlmRequest {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSchema>,
}

impl LlmRequest {
    pub fn last_user_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|message| match message {
            Message::User { content } => Some(content.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode model response: {0}")]
    Decode(String),
    #[error("model response contained no choices")]
    EmptyResponse,
    #[error("scripted model has no reply for request #{0}")]
    ScriptExhausted(usize),
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: LlmRequest) -> Result<AssistantReply, LlmError>;
}

/// Replays canned replies in order and records every request it receives.
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    replies: Mutex<VecDeque<AssistantReply>>,
    repeat_last: bool,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlmClient {
    pub fn new(replies: impl IntoIterator<Item = AssistantReply>) -> Self {
        Self { replies: Mutex::new(replies.into_iter().collect()), ..Self::default() }
    }

    /// Returns `reply` for every request, forever.
    pub fn repeating(reply: AssistantReply) -> Self {
        Self { replies: Mutex::new(VecDeque::from([reply])), repeat_last: true, ..Self::default() }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: LlmRequest) -> Result<AssistantReply, LlmError> {
        let request_number = {
            let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push(request);
            requests.len()
        };

        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        let reply = if self.repeat_last && replies.len() == 1 {
            replies.front().cloned()
        } else {
            replies.pop_front()
        };
        reply.ok_or(LlmError::ScriptExhausted(request_number))
    }
}

/// Offline stand-in that answers every turn without calling any tool.
#[derive(Clone, Debug, Default)]
pub struct EchoLlmClient;

#[async_trait]
impl LlmClient for EchoLlmClient {
    async fn complete(&self, request: LlmRequest) -> Result<AssistantReply, LlmError> {
        let said = request.last_user_text().unwrap_or_default();
        Ok(AssistantReply::text(format!(
            "(offline) You said: {said}. Connect a model backend to browse {} shopping tools.",
            request.tools.len()
        )))
    }
}
