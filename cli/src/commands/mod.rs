//! # TechBuddy Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the `techbuddy` binary.
//! Each command defines its own arguments struct and an async handler that
//! `main.rs` dispatches to.
//!
//! ## Commands
//!
//! - `serve`: HTTP chat endpoint in front of the gatekeeper
//! - `chat`: the same gatekeeper as an interactive terminal loop
//! - `llama`: interactive loop backed by a local Ollama model
//!

/// Terminal chat with the trained TechBuddy gatekeeper.
pub mod chat;
/// Terminal chat with a locally hosted LLM.
pub mod llama;
/// HTTP server exposing `POST /api/chat`.
pub mod serve;
