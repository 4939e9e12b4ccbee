//! # TechBuddy Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the TechBuddy
//! application. Domain failures get a dedicated variant on `TechBuddyError`;
//! everything is propagated as `anyhow::Error` so call sites can attach
//! context with `.context(...)` / `.with_context(...)`.
//!
//! ## Architecture
//!
//! - `TechBuddyError`: a `thiserror` enum covering configuration, knowledge
//!   base, responder and local LLM failures.
//! - `Result<T>`: an alias for `anyhow::Result<T>`.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if pairs.is_empty() {
//!     return Err(TechBuddyError::Knowledge("no question/answer pairs".into()))?;
//! }
//!
//! // Inspect an error further up the stack
//! match gatekeeper.decide(text) {
//!     Err(e) if e.downcast_ref::<TechBuddyError>().is_some_and(|te| matches!(te, TechBuddyError::Untrained)) => {
//!         // ...
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the TechBuddy application.
#[derive(Error, Debug)]
pub enum TechBuddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("Responder has not been trained on any statements.")]
    Untrained,

    #[error("Local LLM request failed: {0}")]
    Llm(String),

    #[error("Local LLM endpoint unreachable: {source}")]
    LlmTransport {
        #[from]
        source: reqwest::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
