//! # TechBuddy Terminal Session Loop
//!
//! File: cli/src/common/session.rs
//!
//! ## Overview
//!
//! The read-eval-print loop shared by `techbuddy chat` and `techbuddy llama`.
//! It prints a greeting, then repeatedly prompts with `You: `, reads one line,
//! hands it to a `SessionHandler`, and prints the reply as `{speaker}: {reply}`.
//!
//! The loop ends when the handler says so, when input is exhausted, or when
//! the interrupt future (Ctrl+C in production) resolves.
//!
//! Input and output are generic async streams so tests can drive a session
//! with an in-memory script and capture the transcript.
//!
use crate::core::error::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// What the handler wants done with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Print the reply and keep going.
    Reply(String),
    /// Print the reply, then end the session.
    Farewell(String),
    /// End the session without printing anything.
    End,
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Farewell,
    EndOfInput,
    Interrupted,
}

/// Produces a `Turn` for each non-blank input line.
#[async_trait]
pub trait SessionHandler: Send {
    async fn handle(&mut self, line: &str) -> Result<Turn>;
}

/// Greeting and speaker label for a session.
#[derive(Debug, Clone)]
pub struct SessionStyle {
    pub greeting: String,
    pub speaker: String,
}

/// # Run Session (`run_session`)
///
/// Drives one interactive conversation until farewell, end of input, or
/// interrupt. Blank lines re-prompt without reaching the handler.
///
/// ## Errors
///
/// Returns an error if reading input or writing output fails, or if the
/// handler fails. Handler errors are not retried.
pub async fn run_session<R, W, H, I>(
    input: R,
    mut output: W,
    style: &SessionStyle,
    handler: &mut H,
    interrupt: I,
) -> Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    H: SessionHandler,
    I: Future<Output = ()>,
{
    let mut lines = input.lines();
    tokio::pin!(interrupt);

    write_line(&mut output, &style.greeting).await?;

    loop {
        output
            .write_all(b"You: ")
            .await
            .context("Failed to write prompt")?;
        output.flush().await.context("Failed to flush output")?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input line")?,
            _ = &mut interrupt => {
                info!("Session interrupted");
                write_line(&mut output, "").await?;
                return Ok(SessionEnd::Interrupted);
            }
        };

        let Some(line) = line else {
            debug!("End of input reached");
            write_line(&mut output, "").await?;
            return Ok(SessionEnd::EndOfInput);
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match handler.handle(line).await? {
            Turn::Reply(text) => {
                write_line(&mut output, &format!("{}: {}", style.speaker, text)).await?;
            }
            Turn::Farewell(text) => {
                write_line(&mut output, &format!("{}: {}", style.speaker, text)).await?;
                return Ok(SessionEnd::Farewell);
            }
            Turn::End => return Ok(SessionEnd::Farewell),
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(format!("{}\n", text).as_bytes())
        .await
        .context("Failed to write output")?;
    output.flush().await.context("Failed to flush output")?;
    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TechBuddyError;
    use std::future::pending;

    /// Echoes input, says goodbye on "stop", ends silently on "end".
    #[derive(Default)]
    struct EchoHandler {
        seen: Vec<String>,
    }

    #[async_trait]
    impl SessionHandler for EchoHandler {
        async fn handle(&mut self, line: &str) -> Result<Turn> {
            self.seen.push(line.to_string());
            Ok(match line {
                "stop" => Turn::Farewell("later!".into()),
                "end" => Turn::End,
                other => Turn::Reply(other.to_uppercase()),
            })
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl SessionHandler for FailingHandler {
        async fn handle(&mut self, _line: &str) -> Result<Turn> {
            Err(TechBuddyError::Untrained.into())
        }
    }

    fn style() -> SessionStyle {
        SessionStyle {
            greeting: "Hello there!".into(),
            speaker: "Bot".into(),
        }
    }

    async fn drive<H: SessionHandler>(script: &str, handler: &mut H) -> (Result<SessionEnd>, String) {
        let mut transcript = Vec::new();
        let result = run_session(script.as_bytes(), &mut transcript, &style(), handler, pending()).await;
        (result, String::from_utf8(transcript).unwrap())
    }

    #[tokio::test]
    async fn test_session_replies_until_farewell() {
        let mut handler = EchoHandler::default();
        let (result, transcript) = drive("hi\nstop\nnever read\n", &mut handler).await;

        assert_eq!(result.unwrap(), SessionEnd::Farewell);
        assert_eq!(handler.seen, vec!["hi", "stop"]);
        assert_eq!(
            transcript,
            "Hello there!\nYou: Bot: HI\nYou: Bot: later!\n"
        );
    }

    #[tokio::test]
    async fn test_session_end_is_silent() {
        let mut handler = EchoHandler::default();
        let (result, transcript) = drive("end\n", &mut handler).await;

        assert_eq!(result.unwrap(), SessionEnd::Farewell);
        assert_eq!(transcript, "Hello there!\nYou: ");
    }

    #[tokio::test]
    async fn test_session_stops_at_end_of_input() {
        let mut handler = EchoHandler::default();
        let (result, transcript) = drive("one\ntwo", &mut handler).await;

        assert_eq!(result.unwrap(), SessionEnd::EndOfInput);
        assert_eq!(handler.seen, vec!["one", "two"]);
        assert!(transcript.ends_with("Bot: TWO\nYou: \n"));
    }

    #[tokio::test]
    async fn test_session_skips_blank_lines_and_trims() {
        let mut handler = EchoHandler::default();
        let (result, _) = drive("\n   \n  padded  \n", &mut handler).await;

        assert_eq!(result.unwrap(), SessionEnd::EndOfInput);
        assert_eq!(handler.seen, vec!["padded"]);
    }

    #[tokio::test]
    async fn test_session_interrupt() {
        let mut handler = EchoHandler::default();
        let mut transcript = Vec::new();
        // `pending_input` never yields a line, so only the interrupt can end the session.
        let (_writer, pending_input) = tokio::io::duplex(64);
        let result = run_session(
            tokio::io::BufReader::new(pending_input),
            &mut transcript,
            &style(),
            &mut handler,
            async {},
        )
        .await;

        assert_eq!(result.unwrap(), SessionEnd::Interrupted);
        assert!(handler.seen.is_empty());
    }

    #[tokio::test]
    async fn test_session_propagates_handler_error() {
        let mut handler = FailingHandler;
        let (result, _) = drive("What is AI?\n", &mut handler).await;
        assert!(result.is_err());
    }
}
