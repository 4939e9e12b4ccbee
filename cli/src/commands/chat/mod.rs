//! # TechBuddy Terminal Chat
//!
//! File: cli/src/commands/chat/mod.rs
//!
//! ## Overview
//!
//! `techbuddy chat` runs the same gatekeeper as the HTTP server, but as an
//! interactive loop on standard input/output:
//!
//! ```text
//! Hi! I'm TechBuddy. Ask me about AI, Scratch, web development, ...
//! You: What is Scratch?
//! TechBuddy: Scratch is a fun way to make games and animations ...
//! You: quit
//! TechBuddy: Goodbye! Thanks for chatting with TechBuddy. Have a great day!
//! ```
//!
//! The loop ends on an exit phrase, at end of input, or on Ctrl+C.
//!
use crate::common::session::{self, SessionEnd, SessionHandler, SessionStyle, Turn};
use crate::core::{self, config, error::Result, gatekeeper::{Gatekeeper, Verdict}};
use async_trait::async_trait;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;

/// Arguments for `techbuddy chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// TOML knowledge file replacing the built-in question/answer pairs.
    #[arg(long, short)]
    pub knowledge: Option<PathBuf>,
}

/// Feeds each line through the gatekeeper.
struct GatekeeperSession {
    gatekeeper: Gatekeeper,
}

#[async_trait]
impl SessionHandler for GatekeeperSession {
    async fn handle(&mut self, line: &str) -> Result<Turn> {
        Ok(match self.gatekeeper.decide(line)? {
            Verdict::Farewell(text) => Turn::Farewell(text),
            Verdict::Answer(text) | Verdict::Fallback(text) => Turn::Reply(text),
        })
    }
}

/// # Handle Chat Command (`handle_chat`)
///
/// Trains the gatekeeper and runs the interactive loop on stdin/stdout.
pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);

    let cfg = config::load_config()?;
    let knowledge = args.knowledge.or_else(|| cfg.bot.knowledge_path());
    let gatekeeper = core::build_gatekeeper(&cfg.bot, knowledge.as_deref())?;

    let style = SessionStyle {
        greeting: cfg.bot.greeting.clone(),
        speaker: cfg.bot.name.clone(),
    };
    let mut handler = GatekeeperSession { gatekeeper };

    let end = session::run_session(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &style,
        &mut handler,
        session::ctrl_c(),
    )
    .await?;
    info!("Chat session ended: {:?}", end);

    if end == SessionEnd::Interrupted {
        // The blocking stdin read cannot be cancelled; exit instead of waiting on it.
        std::process::exit(0);
    }
    Ok(())
}
