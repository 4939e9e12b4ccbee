//! # TechBuddy HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! The HTTP face of the gatekeeper, built on Axum:
//!
//! - `POST /api/chat` with `{"text": "..."}` answers with plain text, or with
//!   `{"response": "...", "end_session": bool}` when the client accepts JSON.
//! - `OPTIONS /api/chat` is a preflight no-op (`200`, empty body).
//!
//! Status codes:
//! - `200` for answers, fallbacks, and goodbyes alike;
//! - `400` with a generic message when the body is not the expected JSON;
//! - `413` when the body is larger than 4 KiB;
//! - `500` with a generic message when the responder fails. The underlying
//!   error is logged, never sent to the client.
//!
//! ## Architecture
//!
//! 1. Find an available port, starting at the configured one
//! 2. Build the router with tracing and (optional) permissive CORS middleware
//! 3. Serve until Ctrl+C or SIGTERM, then shut down gracefully
//!
use super::config::ServerConfig;
use crate::core::error::Result;
use crate::core::gatekeeper::Gatekeeper;
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// Path of the chat endpoint.
pub const CHAT_PATH: &str = "/api/chat";

const BAD_REQUEST_MESSAGE: &str =
    "Sorry, I couldn't read that message. Please send JSON like {\"text\": \"What is AI?\"}.";
const INTERNAL_ERROR_MESSAGE: &str = "Sorry, something went wrong on my side. Please try again.";
const TOO_LARGE_MESSAGE: &str = "Sorry, that message is too long. Please ask a shorter question.";

/// Largest accepted request body. Questions are a sentence or two.
const MAX_CHAT_BODY_BYTES: usize = 4 * 1024;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
struct AppState {
    gatekeeper: Arc<Gatekeeper>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct ChatReply {
    response: String,
    end_session: bool,
}

/// Errors surfaced to HTTP clients with generic messages.
#[derive(Debug)]
enum ApiError {
    BadRequest(JsonRejection),
    Responder(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                warn!("Rejected oversized chat request: {}", rejection.body_text());
                (StatusCode::PAYLOAD_TOO_LARGE, TOO_LARGE_MESSAGE).into_response()
            }
            ApiError::BadRequest(rejection) => {
                warn!("Rejected malformed chat request: {}", rejection.body_text());
                (StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE).into_response()
            }
            ApiError::Responder(e) => {
                error!("Responder failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
            }
        }
    }
}

/// # Run HTTP Server (`run_server`)
///
/// Binds to the first free port at or after `config.port` and serves the
/// chat API until a shutdown signal arrives.
///
/// ## Errors
///
/// Returns an error if no port can be bound within 10 attempts, or if the
/// server fails while running.
pub async fn run_server(config: ServerConfig, gatekeeper: Gatekeeper) -> Result<()> {
    let max_port_attempts = 10;
    let addr = find_available_port(config.host, config.port, max_port_attempts).await?;
    let known = gatekeeper.known_questions().len();

    let app = create_app(Arc::new(gatekeeper), &config);

    println!("\n=================================================================");
    println!("🤖 TechBuddy is listening!");
    println!("🌐 Chat endpoint:     http://{}{}", addr, CHAT_PATH);
    println!("📚 Known questions:   {}", known);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");
    println!("Server starting! Press Ctrl+C to stop.");
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// # Create Axum Application (`create_app`)
///
/// Builds the router for the chat API with request tracing and CORS
/// middleware (permissive when enabled).
fn create_app(gatekeeper: Arc<Gatekeeper>, config: &ServerConfig) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new() // Allows no origins, so no CORS headers are granted.
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route(CHAT_PATH, post(chat).options(preflight))
        .layer(DefaultBodyLimit::max(MAX_CHAT_BODY_BYTES))
        .with_state(AppState { gatekeeper })
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer),
        )
}

/// `POST /api/chat`
///
/// Matching scales with the length of the utterance, so `decide` runs on the
/// blocking pool instead of a runtime worker.
async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> std::result::Result<Response, ApiError> {
    let Json(request) = payload.map_err(ApiError::BadRequest)?;
    let gatekeeper = Arc::clone(&state.gatekeeper);
    let verdict = tokio::task::spawn_blocking(move || gatekeeper.decide(request.text.trim()))
        .await
        .map_err(|e| ApiError::Responder(e.into()))?
        .map_err(ApiError::Responder)?;

    if accepts_json(&headers) {
        let end_session = verdict.ends_session();
        return Ok(Json(ChatReply {
            response: verdict.into_text(),
            end_session,
        })
        .into_response());
    }
    Ok(verdict.into_text().into_response())
}

/// `OPTIONS /api/chat` when no CORS layer answers the preflight.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Resolves on Ctrl+C, or on SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        crate::common::session::ctrl_c().await;
        info!("Received Ctrl+C, initiating graceful shutdown...");
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Tries `start_port`, `start_port + 1`, ... and returns the first bindable address.
async fn find_available_port(host: IpAddr, start_port: u16, max_attempts: u8) -> Result<SocketAddr> {
    for offset in 0..u16::from(max_attempts) {
        let Some(port) = start_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(host, port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if offset > 0 {
                    info!("Port {} was busy, using {} instead.", start_port, port);
                }
                return Ok(addr);
            }
            Err(e) => warn!("Port {} on {} is unavailable ({}).", port, host, e),
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        host,
        start_port,
        max_attempts
    )
}
