//! # TechBuddy HTTP Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! This module merges the settings for `techbuddy serve`:
//! 1. Command-line arguments (highest priority, when changed from their defaults)
//! 2. The `[server]` section of the loaded configuration
//! 3. Default values (lowest priority)
//!
//! ## Examples
//!
//! ```toml
//! [server]
//! port = 9000
//! host = "0.0.0.0"
//! enable_cors = false
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let server_config = load_and_merge_config(args, &cfg)?;
//! println!("Listening on: {}:{}", server_config.host, server_config.port);
//! ```
//!
use crate::core::config::Config;
use crate::core::error::{Result, TechBuddyError};
use anyhow::anyhow;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tracing::{debug, info};

/// Default port, matching the address the web frontend talks to.
const DEFAULT_PORT: u16 = 5000;

/// # Serve Command Arguments (`ServeArgs`)
///
/// Command-line arguments accepted by `techbuddy serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Network port to listen on. If busy, the next free port is used.
    #[arg(long, short, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// IP address to bind to. Use `0.0.0.0` to accept connections from other machines.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Disables Cross-Origin Resource Sharing (CORS) headers.
    #[arg(long)]
    pub no_cors: bool,

    /// TOML knowledge file replacing the built-in question/answer pairs.
    #[arg(long, short)]
    pub knowledge: Option<PathBuf>,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// The consolidated settings the server runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
    /// Knowledge file to train on; `None` means the built-in corpus.
    pub knowledge: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            enable_cors: true,
            knowledge: None,
        }
    }
}

impl ServerConfig {
    /// Configuration derived from the arguments alone.
    fn from_args(args: &ServeArgs) -> Self {
        Self {
            port: args.port,
            host: args.host,
            enable_cors: !args.no_cors,
            knowledge: args.knowledge.clone(),
        }
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Starts from the arguments, then lets the `[server]` section fill in every
/// setting whose argument was left at its default. `--no-cors` and
/// `--knowledge` always win when given.
///
/// ## Errors
///
/// Returns an error if the configured `server.host` is not a valid IP address.
pub fn load_and_merge_config(args: ServeArgs, config: &Config) -> Result<ServerConfig> {
    let mut effective = ServerConfig::from_args(&args);
    let cli_defaults = ServeArgs::parse_from([""]);
    let section = &config.server;

    if args.port == cli_defaults.port {
        if let Some(port) = section.port {
            debug!("Using port {} from configuration file", port);
            effective.port = port;
        }
    }
    if args.host == cli_defaults.host {
        if let Some(host) = &section.host {
            effective.host = host.parse().map_err(|e| {
                anyhow!(TechBuddyError::Config(format!(
                    "Invalid server.host '{}': {}",
                    host, e
                )))
            })?;
        }
    }
    if !args.no_cors {
        if let Some(enable_cors) = section.enable_cors {
            effective.enable_cors = enable_cors;
        }
    }
    if effective.knowledge.is_none() {
        effective.knowledge = config.bot.knowledge_path();
    }

    info!("Effective server config: {:?}", effective);
    Ok(effective)
}
