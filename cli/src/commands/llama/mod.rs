//! # TechBuddy Local LLM Chat
//!
//! File: cli/src/commands/llama/mod.rs
//!
//! ## Overview
//!
//! `techbuddy llama` pipes each line typed by the user to a locally hosted
//! Ollama model and prints the generated reply. There is no allow-list here:
//! every line except an exit phrase goes to the model.
//!
//! ## Examples
//!
//! ```bash
//! # Default: llama3 on http://127.0.0.1:11434
//! techbuddy llama
//!
//! # Another model, with a request timeout
//! techbuddy llama --model mistral --timeout 60
//! ```
//!
use crate::common::ollama::OllamaClient;
use crate::common::session::{self, SessionEnd, SessionHandler, SessionStyle, Turn};
use crate::core::{config, error::Result, gatekeeper::ExitPhrase};
use async_trait::async_trait;
use clap::Parser;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{debug, info};

const GREETING: &str = "Hi! I'm your local AI assistant. Ask me anything about tech!";
const SPEAKER: &str = "AI";

/// Arguments for `techbuddy llama`.
#[derive(Parser, Debug)]
pub struct LlamaArgs {
    /// Model to run (overrides `llm.model`).
    #[arg(long, short)]
    pub model: Option<String>,

    /// Base URL of the Ollama server (overrides `llm.endpoint`).
    #[arg(long, short, env = "TECHBUDDY_LLM_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds (overrides `llm.timeout_secs`).
    #[arg(long, short, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

/// Sends every line to the model; exit phrases end the session silently.
struct LlmSession {
    client: OllamaClient,
}

#[async_trait]
impl SessionHandler for LlmSession {
    async fn handle(&mut self, line: &str) -> Result<Turn> {
        if let Some(phrase) = ExitPhrase::detect(line) {
            debug!("Exit phrase '{}' received", phrase);
            return Ok(Turn::End);
        }
        let reply = self.client.generate(line).await?;
        Ok(Turn::Reply(reply.trim().to_string()))
    }
}

/// # Handle Llama Command (`handle_llama`)
///
/// Builds an Ollama client from configuration and flags, then runs the
/// interactive loop on stdin/stdout. A failed request ends the session with
/// an error.
///
/// ## Errors
///
/// Returns a configuration error if the effective endpoint is not an
/// http(s) URL, before anything is read from stdin.
pub async fn handle_llama(args: LlamaArgs) -> Result<()> {
    info!("Handling llama command with args: {:?}", args);

    let cfg = config::load_config()?;
    let endpoint = args.endpoint.unwrap_or(cfg.llm.endpoint);
    let model = args.model.unwrap_or(cfg.llm.model);
    let timeout_secs = args.timeout.or(cfg.llm.timeout_secs);
    config::validate_llm_settings(&endpoint, timeout_secs)?;

    let client = OllamaClient::new(&endpoint, &model, timeout_secs.map(Duration::from_secs))?;
    info!("Using model '{}' at {}", client.model(), client.endpoint());

    let style = SessionStyle {
        greeting: GREETING.to_string(),
        speaker: SPEAKER.to_string(),
    };
    let mut handler = LlmSession { client };

    let end = session::run_session(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        &style,
        &mut handler,
        session::ctrl_c(),
    )
    .await?;
    info!("LLM session ended: {:?}", end);

    if end == SessionEnd::Interrupted {
        // The blocking stdin read cannot be cancelled; exit instead of waiting on it.
        std::process::exit(0);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_llm_session_replies_then_exits_without_calling_model() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body(json!({"model": "llama3", "prompt": "What is a CPU?", "stream": false}));
            then.status(200)
                .json_body(json!({"response": "  The brain of a computer.\n"}));
        });

        let client = OllamaClient::new(&server.base_url(), "llama3", None).unwrap();
        let mut handler = LlmSession { client };
        let style = SessionStyle {
            greeting: GREETING.into(),
            speaker: SPEAKER.into(),
        };
        let mut out = Vec::new();
        let end = session::run_session(
            "What is a CPU?\nBye\nWhat is a GPU?\n".as_bytes(),
            &mut out,
            &style,
            &mut handler,
            std::future::pending(),
        )
        .await
        .unwrap();

        mock.assert_hits(1);
        assert_eq!(end, SessionEnd::Farewell);
        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            format!("{}\nYou: AI: The brain of a computer.\nYou: ", GREETING)
        );
    }

    #[tokio::test]
    async fn test_llm_session_surfaces_model_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(500).body("boom");
        });

        let client = OllamaClient::new(&server.base_url(), "llama3", None).unwrap();
        let mut handler = LlmSession { client };
        assert!(handler.handle("hello").await.is_err());
    }

    #[test]
    fn test_zero_timeout_flag_rejected() {
        assert!(LlamaArgs::try_parse_from(["llama", "--timeout", "0"]).is_err());
        let args = LlamaArgs::try_parse_from(["llama", "--timeout", "30"]).unwrap();
        assert_eq!(args.timeout, Some(30));
    }
}
