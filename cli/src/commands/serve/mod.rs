//! # TechBuddy HTTP Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `techbuddy serve` exposes the gatekeeper over HTTP for the web frontend.
//! It supports:
//! - CORS (enabled by default, `--no-cors` to disable)
//! - Port binding with automatic fallback if the port is in use
//! - Host interface binding
//! - A custom knowledge file (`--knowledge`)
//!
//! ## Architecture
//!
//! - `config.rs`: merges CLI arguments with the `[server]` configuration section
//! - `server_logic.rs`: the Axum router, handlers, and server loop
//!
//! ## Examples
//!
//! ```bash
//! # Serve the built-in corpus on 127.0.0.1:5000
//! techbuddy serve
//!
//! # Listen on all interfaces with a custom knowledge file
//! techbuddy serve --host 0.0.0.0 --port 8080 --knowledge ./robots.toml
//!
//! # Ask a question
//! curl -X POST localhost:5000/api/chat -H 'Content-Type: application/json' -d '{"text": "What is AI?"}'
//! ```
//!
use crate::core::{self, config as core_config, error::Result};
use tracing::info;

pub use config::ServeArgs;

/// Merges CLI arguments with the server section of the configuration.
pub mod config;

/// Axum router, chat handler, and server loop.
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Loads configuration, trains the gatekeeper, and runs the HTTP server
/// until shutdown.
///
/// ## Errors
///
/// Returns an error if configuration or the knowledge base fails to load,
/// or if the server cannot start.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let cfg = core_config::load_config()?;
    let server_config = config::load_and_merge_config(args, &cfg)?;
    let gatekeeper = core::build_gatekeeper(&cfg.bot, server_config.knowledge.as_deref())?;

    server_logic::run_server(server_config, gatekeeper).await
}
