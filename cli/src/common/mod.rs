//! # TechBuddy Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities used by more than one command, kept apart from
//! command-specific logic (`commands::`) and the question-answering core
//! (`core::`).
//!
//! - **`session`**: the interactive terminal loop used by `chat` and `llama`.
//! - **`ollama`**: HTTP client for a locally hosted Ollama server.
//!

/// Interactive read-eval-print loop over async input/output streams.
pub mod session;
/// Client for the Ollama `/api/generate` endpoint.
pub mod ollama;
