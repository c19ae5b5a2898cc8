//! Docs Copilot CLI
//!
//! Main entry point for the copilot command-line tool.
//! Ingests a markdown corpus and answers questions grounded in it.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, EvalCommand, IngestCommand};
use copilot_core::logging::{self, LogFormat};
use copilot_core::{config::AppConfig, AppResult};
use std::path::PathBuf;
use std::process::ExitCode;

/// Docs Copilot - grounded answers from your documentation
#[derive(Parser, Debug)]
#[command(name = "copilot")]
#[command(about = "Answer questions from your docs, or say when they don't cover it", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "COPILOT_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "COPILOT_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (ollama, openai, openrouter)
    #[arg(short, long, global = true, env = "COPILOT_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "COPILOT_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest the markdown corpus and report counts
    Ingest(IngestCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// Answer questions read line by line from stdin
    Chat(ChatCommand),

    /// Run keyword evaluation cases against the corpus
    Eval(EvalCommand),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Ingest(_) => "ingest",
            Commands::Ask(_) => "ask",
            Commands::Chat(_) => "chat",
            Commands::Eval(_) => "eval",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), "Command failed: {}", e);
            eprintln!("{}", commands::render_error(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    // Workspace and config file decide which YAML gets merged
    let config = AppConfig::load_from(cli.workspace, cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    logging::init_logging(config.log_level.as_deref(), config.no_color, format)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(config).await,
        Commands::Ask(cmd) => cmd.execute(config).await,
        Commands::Chat(cmd) => cmd.execute(config).await,
        Commands::Eval(cmd) => cmd.execute(config).await,
    };

    if result.is_ok() {
        tracing::info!("Command completed successfully");
    }

    result
}
