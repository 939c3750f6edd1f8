//! OpenAI-compatible chat-completions backend.
//!
//! Works against OpenAI itself and against gateways that mirror its wire
//! format (Ollama's `/v1` endpoint included).

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopkeep_core::config::{LlmConfig, LlmProvider};
use tracing::{debug, warn};

use crate::llm::{AssistantReply, LlmClient, LlmError, LlmRequest, Message, ToolInvocation};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const RETRY_BACKOFF_MS: u64 = 500;

pub struct OpenAiCompatibleClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<SecretString>,
    temperature: Option<f32>,
    max_retries: u32,
}

impl OpenAiCompatibleClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let client =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        let base_url = match (&config.base_url, config.provider) {
            (Some(base_url), _) => base_url.clone(),
            (None, LlmProvider::OpenAi) => OPENAI_BASE_URL.to_string(),
            (None, LlmProvider::Ollama) => "http://localhost:11434/v1".to_string(),
        };

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            max_retries: config.max_retries,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_once(&self, body: &ChatCompletionRequest) -> Result<String, LlmError> {
        let mut request = self.client.post(&self.endpoint).json(body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    async fn complete(&self, request: LlmRequest) -> Result<AssistantReply, LlmError> {
        let body = build_request_body(&self.model, self.temperature, &request);

        let mut attempt = 0u32;
        let text = loop {
            match self.send_once(&body).await {
                Ok(text) => break text,
                Err(error) if attempt < self.max_retries && is_retryable(&error) => {
                    attempt += 1;
                    warn!(
                        event_name = "llm.request.retry",
                        attempt,
                        max_retries = self.max_retries,
                        error = %error,
                        "model request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * u64::from(attempt)))
                        .await;
                }
                Err(error) => return Err(error),
            }
        };

        debug!(event_name = "llm.response.received", bytes = text.len(), "model response received");
        decode_response(&text)
    }
}

fn is_retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Transport(error) => error.is_timeout() || error.is_connect(),
        LlmError::Status { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded string on the way out; some servers answer with a plain object.
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: WireMessage,
}

fn function_kind() -> String {
    "function".to_string()
}

fn build_request_body(
    model: &str,
    temperature: Option<f32>,
    request: &LlmRequest,
) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    messages.push(WireMessage {
        role: "system".to_string(),
        content: Some(request.system.clone()),
        tool_calls: None,
        tool_call_id: None,
        name: None,
    });
    messages.extend(request.messages.iter().map(to_wire_message));

    let tools = request
        .tools
        .iter()
        .map(|schema| WireTool {
            kind: "function",
            function: WireFunction {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: schema.parameters.clone(),
            },
        })
        .collect::<Vec<_>>();

    ChatCompletionRequest {
        model: model.to_string(),
        messages,
        tool_choice: (!tools.is_empty()).then_some("auto"),
        tools,
        temperature,
    }
}

fn to_wire_message(message: &Message) -> WireMessage {
    match message {
        Message::User { content } => WireMessage {
            role: "user".to_string(),
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        },
        Message::Assistant { content, tool_calls } => WireMessage {
            role: "assistant".to_string(),
            content: content.clone(),
            tool_calls: (!tool_calls.is_empty()).then(|| {
                tool_calls
                    .iter()
                    .map(|call| WireToolCall {
                        id: call.id.clone(),
                        kind: function_kind(),
                        function: WireFunctionCall {
                            name: call.name.clone(),
                            arguments: Value::String(call.arguments.to_string()),
                        },
                    })
                    .collect()
            }),
            tool_call_id: None,
            name: None,
        },
        Message::Tool { tool_call_id, name, content } => WireMessage {
            role: "tool".to_string(),
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.clone()),
            name: Some(name.clone()),
        },
    }
}

fn decode_response(body: &str) -> Result<AssistantReply, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|error| LlmError::Decode(error.to_string()))?;
    let choice = parsed.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;

    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let arguments = parse_arguments(&call.function.name, call.function.arguments)?;
            Ok(ToolInvocation { id: call.id, name: call.function.name, arguments })
        })
        .collect::<Result<Vec<_>, LlmError>>()?;

    let content = choice.message.content.filter(|content| !content.trim().is_empty());
    Ok(AssistantReply { content, tool_calls })
}

fn parse_arguments(tool: &str, raw: Value) -> Result<Value, LlmError> {
    match raw {
        Value::Null => Ok(Value::Object(Default::default())),
        Value::String(text) if text.trim().is_empty() => Ok(Value::Object(Default::default())),
        Value::String(text) => serde_json::from_str(&text).map_err(|error| {
            LlmError::Decode(format!("arguments for tool `{tool}` are not valid JSON: {error}"))
        }),
        other => Ok(other),
    }
}
