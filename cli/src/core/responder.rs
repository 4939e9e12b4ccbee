//! # TechBuddy Responder
//!
//! File: cli/src/core/responder.rs
//!
//! ## Overview
//!
//! The responder is the collaborator that turns a (known) question into a
//! natural-language reply. The gatekeeper only sees the `Responder` trait, so
//! the trained implementation below can be swapped for a test double.
//!
//! ## List Training
//!
//! `ListTrainedResponder` is trained with a conversation: every statement is
//! recorded as the response to the statement before it. Training the
//! knowledge base therefore feeds `q1, a1, q2, a2, ...`, which maps each
//! question to its answer (and, as a side effect, each answer to the next
//! question, mirroring how a flat conversation is learned).
//!
//! Lookup picks the trained statement most similar to the utterance using a
//! case-insensitive normalized Levenshtein score and returns its response.
//!
use super::error::{Result, TechBuddyError};
use tracing::debug;

/// A collaborator that produces a reply for an utterance.
pub trait Responder: Send + Sync {
    /// Returns the reply for `utterance`.
    fn respond(&self, utterance: &str) -> Result<String>;
}

/// A statement learned during training, with the statement that followed it.
#[derive(Debug, Clone)]
struct Exchange {
    statement: String,
    folded: Vec<char>,
    response: String,
}

/// Responder trained on flat conversations; answers with the response to the
/// closest known statement.
#[derive(Debug, Default)]
pub struct ListTrainedResponder {
    name: String,
    exchanges: Vec<Exchange>,
}

impl ListTrainedResponder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exchanges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Learns `conversation`, where each statement answers the previous one.
    ///
    /// A statement seen again keeps its first learned response.
    pub fn train<S: AsRef<str>>(&mut self, conversation: &[S]) {
        for pair in conversation.windows(2) {
            let statement = pair[0].as_ref();
            let response = pair[1].as_ref();
            if self.exchanges.iter().any(|e| e.statement == statement) {
                continue;
            }
            self.exchanges.push(Exchange {
                statement: statement.to_string(),
                folded: statement.to_lowercase().chars().collect(),
                response: response.to_string(),
            });
        }
        debug!(
            "{} trained on {} statements ({} total)",
            self.name,
            conversation.len(),
            self.exchanges.len()
        );
    }

    /// Returns the closest exchange and its similarity score.
    fn closest(&self, utterance: &str) -> Option<(&Exchange, f64)> {
        let folded: Vec<char> = utterance.to_lowercase().chars().collect();
        let mut best: Option<(&Exchange, f64)> = None;
        for exchange in &self.exchanges {
            let score = similarity(&folded, &exchange.folded);
            // Strictly greater, so the first trained statement wins ties.
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((exchange, score));
            }
        }
        best
    }
}

impl Responder for ListTrainedResponder {
    fn respond(&self, utterance: &str) -> Result<String> {
        let (exchange, score) = self
            .closest(utterance)
            .ok_or(TechBuddyError::Untrained)?;
        debug!(
            "Closest statement to {:?} is {:?} (confidence {:.2})",
            utterance, exchange.statement, score
        );
        Ok(exchange.response.clone())
    }
}

/// Similarity in `[0, 1]`: `1 - distance / longest length`.
fn similarity(a: &[char], b: &[char]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Edit distance with a single rolling row.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = usize::from(ca != cb);
            row[j + 1] = (above + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }
    row[b.len()]
}
