use std::sync::Arc;

use anyhow::Result;
use shopkeep_agent::llm::EchoLlmClient;
use shopkeep_agent::openai::OpenAiCompatibleClient;
use shopkeep_agent::{
    AgentRuntime, InMemorySessionStore, LlmClient, Message, SessionId, ShoppingContext,
    TurnOutcome,
};
use shopkeep_core::config::{AppConfig, LoadOptions};
use shopkeep_core::errors::ApplicationError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::commands::{load_catalog, CommandResult};
use crate::logging;

pub const PROMPT: &str = "\nEnter (or type 'exit' to quit): ";
pub const FAREWELL: &str = "Exiting the shopping assistant. Have a great day!";
const STEP_PREVIEW_CHARS: usize = 240;

#[derive(Clone, Debug, Default)]
pub struct ChatOptions {
    pub session: Option<String>,
    pub show_steps: bool,
    pub offline: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatSummary {
    pub turns: usize,
    pub failed_turns: usize,
    /// True when the user typed `exit`, false when input simply ended.
    pub exited: bool,
}

pub async fn run(options: LoadOptions, chat: ChatOptions) -> CommandResult {
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    logging::init(&config.logging);

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(error) => return CommandResult::failure("chat", "catalog_load", error.to_string(), 3),
    };

    let llm: Arc<dyn LlmClient> = if chat.offline {
        Arc::new(EchoLlmClient)
    } else {
        match OpenAiCompatibleClient::from_config(&config.llm) {
            Ok(client) => Arc::new(client),
            Err(error) => return CommandResult::failure("chat", "llm_init", error.to_string(), 4),
        }
    };

    let runtime = AgentRuntime::new(llm, Arc::new(InMemorySessionStore::default()))
        .with_max_tool_cycles(config.agent.max_tool_cycles);
    let session_id = chat.session.map(SessionId).unwrap_or_else(SessionId::generate);
    let mut context = ShoppingContext::new(Arc::new(catalog));

    tracing::info!(
        event_name = "cli.chat.started",
        session_id = %session_id,
        offline = chat.offline,
        model = %config.llm.model,
        "chat session started"
    );

    let input = BufReader::new(tokio::io::stdin());
    let output = tokio::io::stdout();
    match chat_loop(&runtime, &session_id, &mut context, input, output, chat.show_steps).await {
        Ok(summary) => {
            tracing::info!(
                event_name = "cli.chat.finished",
                session_id = %session_id,
                turns = summary.turns,
                failed_turns = summary.failed_turns,
                "chat session finished"
            );
            CommandResult::success(String::new())
        }
        Err(error) => CommandResult::failure("chat", "console_io", error.to_string(), 5),
    }
}

/// Reads one line per turn until `exit` or end of input. A failed turn is
/// reported to the user and the loop carries on with the next line.
pub async fn chat_loop<R, W>(
    runtime: &AgentRuntime,
    session_id: &SessionId,
    context: &mut ShoppingContext,
    input: R,
    mut output: W,
    show_steps: bool,
) -> Result<ChatSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut summary = ChatSummary::default();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") {
            output.write_all(format!("{FAREWELL}\n").as_bytes()).await?;
            summary.exited = true;
            break;
        }

        match runtime.run_turn(session_id, context, text).await {
            Ok(outcome) => {
                if show_steps {
                    output.write_all(render_steps(&outcome).as_bytes()).await?;
                }
                output.write_all(format!("\nAssistant: {}\n", outcome.reply).as_bytes()).await?;
                summary.turns += 1;
            }
            Err(error) => {
                let interface =
                    ApplicationError::from(error).into_interface(session_id.as_str());
                output
                    .write_all(format!("\n[error] {}\n", interface.user_message()).as_bytes())
                    .await?;
                summary.failed_turns += 1;
            }
        }
    }

    output.flush().await?;
    Ok(summary)
}

fn render_steps(outcome: &TurnOutcome) -> String {
    let mut rendered = String::new();
    for message in &outcome.appended {
        match message {
            Message::Assistant { tool_calls, .. } => {
                for call in tool_calls {
                    let arguments = if call.name == "checkout" {
                        "{ details hidden }".to_string()
                    } else {
                        call.arguments.to_string()
                    };
                    rendered.push_str(&format!("\n  -> {} {}", call.name, arguments));
                }
            }
            Message::Tool { name, content, .. } => {
                rendered.push_str(&format!("\n  <- {name}: {}", preview(content)));
            }
            Message::User { .. } => {}
        }
    }
    if !rendered.is_empty() {
        rendered.push('\n');
    }
    rendered
}

fn preview(content: &str) -> String {
    if content.chars().count() <= STEP_PREVIEW_CHARS {
        return content.to_string();
    }
    let truncated = content.chars().take(STEP_PREVIEW_CHARS).collect::<String>();
    format!("{truncated}...")
}
