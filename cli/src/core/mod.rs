//! # TechBuddy Core
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the components shared by every TechBuddy command:
//! configuration, errors, and the question-answering pipeline itself.
//!
//! ## Architecture
//!
//! - `config`: configuration loading, merging, and validation
//! - `error`: error types and the `Result` alias
//! - `normalize`: text normalization for allow-list lookup
//! - `gatekeeper`: exit / known-question / fallback decision
//! - `responder`: the `Responder` trait and the list-trained implementation
//! - `knowledge`: built-in and file-based question/answer pairs
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{TechBuddyError, Result}; // For error handling
//! use crate::core::gatekeeper::{Gatekeeper, Verdict}; // For answering utterances
//! ```
//!
pub mod config;
pub mod error;
pub mod gatekeeper;
pub mod knowledge;
pub mod normalize;
pub mod responder;

use anyhow::Context;
use gatekeeper::{Gatekeeper, Replies};
use knowledge::Knowledge;
use responder::ListTrainedResponder;
use std::path::Path;
use tracing::info;

/// # Build Gatekeeper (`build_gatekeeper`)
///
/// Loads the knowledge base (the file at `knowledge_path`, or the built-in
/// corpus), trains a `ListTrainedResponder` on it, and wraps the responder in
/// a `Gatekeeper` whose allow-list is derived from the same questions.
///
/// ## Errors
///
/// Returns an error if the knowledge file cannot be read, parsed, or validated.
pub fn build_gatekeeper(
    bot: &config::BotConfig,
    knowledge_path: Option<&Path>,
) -> error::Result<Gatekeeper> {
    let knowledge = Knowledge::load(knowledge_path).context("Failed to load knowledge base")?;

    let mut responder = ListTrainedResponder::new(bot.name.clone());
    responder.train(&knowledge.conversation());
    info!(
        "Trained {} on {} question/answer pairs",
        responder.name(),
        knowledge.len()
    );

    let replies = Replies {
        goodbye: bot.goodbye.clone(),
        fallback: bot.fallback.clone(),
    };
    Ok(Gatekeeper::new(
        responder,
        knowledge.known_questions(),
        replies,
    ))
}
