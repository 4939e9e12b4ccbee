//! # TechBuddy Ollama Client
//!
//! File: cli/src/common/ollama.rs
//!
//! ## Overview
//!
//! Minimal client for a locally hosted Ollama server. Only the non-streaming
//! `/api/generate` call is used: the prompt goes out as
//! `{"model", "prompt", "stream": false}` and the `response` field of the
//! reply is returned as-is.
//!
use crate::core::error::{Result, TechBuddyError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client bound to one Ollama endpoint and model.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    /// Builds a client; `timeout` of `None` means requests never time out.
    pub fn new(endpoint: &str, model: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `prompt` to `/api/generate` and returns the generated text.
    ///
    /// ## Errors
    ///
    /// - `TechBuddyError::LlmTransport` if the server cannot be reached.
    /// - `TechBuddyError::Llm` on a non-success status or a body without `response`.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        debug!("POST {} (model {})", url, self.model);

        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await
            .map_err(TechBuddyError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TechBuddyError::Llm(format!(
                "Ollama returned {}: {}",
                status,
                body.trim()
            ))
            .into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            TechBuddyError::Llm(format!("Unexpected response from Ollama: {}", e))
        })?;
        Ok(body.response)
    }
}
