//! # TechBuddy Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for TechBuddy, handling
//! loading, merging, validation, and access to configuration data. It combines
//! defaults, user settings, and project-specific overrides.
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.techbuddy.toml` in current directory or ancestors
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/techbuddy/config.toml` on Linux)
//! 3. Default values defined in the code
//!
//! Command-line flags are applied on top by the individual commands.
//!
//! ## Examples
//!
//! ```toml
//! [bot]
//! name = "TechBuddy"
//! knowledge_file = "~/techbuddy/knowledge.toml"
//!
//! [server]
//! port = 8080
//!
//! [llm]
//! model = "llama3"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let gatekeeper = core::build_gatekeeper(&cfg.bot, cfg.bot.knowledge_file.as_deref().map(Path::new))?;
//! ```
//!
use crate::core::error::{Result, TechBuddyError};
use crate::core::gatekeeper::{DEFAULT_FALLBACK, DEFAULT_GOODBYE};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Identity, canned replies and knowledge source of the trained bot.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name used as the speaker label in the chat loop.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Printed once when the chat loop starts.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Reply to an exit phrase.
    #[serde(default = "default_goodbye")]
    pub goodbye: String,
    /// Reply to an unknown question.
    #[serde(default = "default_fallback")]
    pub fallback: String,
    /// Optional TOML knowledge file replacing the built-in corpus (can use ~).
    pub knowledge_file: Option<String>,
}

/// Optional overrides for `techbuddy serve`. Unset fields fall back to the
/// command's own defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub port: Option<u16>,
    /// Read as string; parsed and validated by the serve command.
    pub host: Option<String>,
    pub enable_cors: Option<bool>,
}

/// Settings for the local LLM loop (`techbuddy llama`).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,
    /// Model name passed to `/api/generate`.
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Request timeout in seconds; no timeout when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            greeting: default_greeting(),
            goodbye: default_goodbye(),
            fallback: default_fallback(),
            knowledge_file: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            timeout_secs: None,
        }
    }
}

fn default_bot_name() -> String {
    "TechBuddy".to_string()
}
fn default_greeting() -> String {
    "Hi! I'm TechBuddy. Ask me about AI, Scratch, web development, robotics, EA Sports, or app making with MIT App Inventor!".to_string()
}
fn default_goodbye() -> String {
    DEFAULT_GOODBYE.to_string()
}
fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}
pub fn default_llm_endpoint() -> String {
    "http://127.0.0.1:11434".to_string()
}
pub fn default_llm_model() -> String {
    "llama3".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".techbuddy.toml";

impl BotConfig {
    /// The knowledge file as a path, if one is configured.
    pub fn knowledge_path(&self) -> Option<PathBuf> {
        self.knowledge_file.as_ref().map(PathBuf::from)
    }
}

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "TechBuddy", "techbuddy") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!(
            "No project configuration file (.techbuddy.toml) found in current directory or ancestors."
        );
        Ok(None)
    }
}

/// Walks up from `start` looking for `.techbuddy.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();

    merged.bot.name = pick(project_cfg.bot.name, user.bot.name, default_bot_name());
    merged.bot.greeting = pick(
        project_cfg.bot.greeting,
        user.bot.greeting,
        default_greeting(),
    );
    merged.bot.goodbye = pick(project_cfg.bot.goodbye, user.bot.goodbye, default_goodbye());
    merged.bot.fallback = pick(
        project_cfg.bot.fallback,
        user.bot.fallback,
        default_fallback(),
    );
    merged.bot.knowledge_file = project_cfg.bot.knowledge_file.or(user.bot.knowledge_file);

    merged.server.port = project_cfg.server.port.or(user.server.port);
    merged.server.host = project_cfg.server.host.or(user.server.host);
    merged.server.enable_cors = project_cfg.server.enable_cors.or(user.server.enable_cors);

    merged.llm.endpoint = pick(
        project_cfg.llm.endpoint,
        user.llm.endpoint,
        default_llm_endpoint(),
    );
    merged.llm.model = pick(project_cfg.llm.model, user.llm.model, default_llm_model());
    merged.llm.timeout_secs = project_cfg.llm.timeout_secs.or(user.llm.timeout_secs);
    merged
}

fn pick(project: String, user: String, default: String) -> String {
    if project != default {
        project
    } else {
        user
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(file) = config.bot.knowledge_file.as_mut() {
        *file = shellexpand::tilde(file).into_owned();
        debug!("Expanded knowledge file path: {}", file);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    for (field, value) in [
        ("bot.name", &config.bot.name),
        ("bot.greeting", &config.bot.greeting),
        ("bot.goodbye", &config.bot.goodbye),
        ("bot.fallback", &config.bot.fallback),
        ("llm.model", &config.llm.model),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow!(TechBuddyError::Config(format!(
                "'{}' cannot be empty.",
                field
            ))));
        }
    }
    if let Some(file) = &config.bot.knowledge_file {
        let path = Path::new(file);
        if !path.is_file() {
            return Err(anyhow!(TechBuddyError::Config(format!(
                "Configured knowledge file '{}' does not exist or is not a file.",
                path.display()
            ))));
        }
    }
    validate_llm_settings(&config.llm.endpoint, config.llm.timeout_secs)?;
    info!("Configuration validation successful.");
    Ok(())
}

/// Checks an LLM endpoint and timeout, whether they came from a file or from flags.
///
/// ## Errors
///
/// Returns `TechBuddyError::Config` if `endpoint` is not an http(s) URL or
/// `timeout_secs` is zero.
pub fn validate_llm_settings(endpoint: &str, timeout_secs: Option<u64>) -> Result<()> {
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(anyhow!(TechBuddyError::Config(format!(
            "Invalid LLM endpoint '{}'. Expected an http:// or https:// URL.",
            endpoint
        ))));
    }
    if timeout_secs == Some(0) {
        return Err(anyhow!(TechBuddyError::Config(
            "'llm.timeout_secs' must be greater than zero.".to_string()
        )));
    }
    Ok(())
}
