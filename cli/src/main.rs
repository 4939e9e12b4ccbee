//! # TechBuddy Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file is the entry point for the `techbuddy` binary. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command (`serve`, `chat`, `llama`) is a variant of `Commands`
//! - Commands map to handler functions in their respective modules
//! - All errors are propagated to this level for consistent reporting
//!
//! ## Examples
//!
//! ```bash
//! # Run the HTTP endpoint for the web frontend
//! techbuddy serve
//!
//! # Chat in the terminal, with debug logs on stderr
//! techbuddy -vv chat
//!
//! # Talk to a local Ollama model
//! techbuddy llama --model llama3
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // serve, chat, llama
mod common; // Shared session loop and Ollama client
mod core; // Config, errors, and the question-answering pipeline

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "techbuddy",
    about = "🤖 TechBuddy: a friendly tech Q&A assistant for kids",
    long_about = "Answers kids' questions about AI, Scratch, web development, robotics,\n\
                  EA Sports and MIT App Inventor over HTTP or in the terminal,\n\
                  or chats with a locally hosted LLM.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Serve the chat API over HTTP (POST /api/chat).
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Chat with TechBuddy in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Chat with a local Ollama model in the terminal.
    #[command(alias = "l")]
    Llama(commands::llama::LlamaArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Llama(args) => commands::llama::handle_llama(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
