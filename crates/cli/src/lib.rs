pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use shopkeep_core::config::LoadOptions;

use crate::commands::chat::ChatOptions;

#[derive(Debug, Parser)]
#[command(
    name = "shopkeep",
    about = "Conversational shopping assistant",
    long_about = "Chat with a model-backed shopping assistant that can browse the catalog, manage a cart and check out.",
    after_help = "Examples:\n  shopkeep chat\n  shopkeep chat --session demo --show-steps\n  shopkeep catalog --category laptop\n  shopkeep config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a shopkeep.toml file (must exist when given)")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive shopping session; type `exit` to quit")]
    Chat {
        #[arg(long, help = "Session identifier (a random one is generated when omitted)")]
        session: Option<String>,
        #[arg(long, help = "Print tool calls and results before each reply")]
        show_steps: bool,
        #[arg(long, help = "Use an offline echo model instead of the configured backend")]
        offline: bool,
    },
    #[command(about = "Print the product catalog as JSON")]
    Catalog {
        #[arg(long, help = "Only print products in this category")]
        category: Option<String>,
    },
    #[command(about = "Print the tool schemas advertised to the model")]
    Tools,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        ..LoadOptions::default()
    };

    let result = match cli.command {
        Command::Chat { session, show_steps, offline } => {
            commands::chat::run(options, ChatOptions { session, show_steps, offline }).await
        }
        Command::Catalog { category } => commands::catalog::run(options, category.as_deref()),
        Command::Tools => commands::tools::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(options) }
        }
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
