//! # TechBuddy Gatekeeper
//!
//! File: cli/src/core/gatekeeper.rs
//!
//! ## Overview
//!
//! The gatekeeper sits in front of the responder and decides, per utterance,
//! between three outcomes:
//!
//! 1. the utterance normalizes to an exit phrase (`quit`, `exit`, `bye`):
//!    say goodbye without consulting the responder;
//! 2. the utterance normalizes to a known question: forward the *original*
//!    text to the responder and return its reply;
//! 3. anything else: return the fixed fallback message.
//!
//! Matching is exact set membership after normalization. `"What is AI"` and
//! `"what is ai?!"` match the known question `"What is AI?"`; `"What iz AI?"`
//! does not.
//!
//! ## Usage
//!
//! ```rust
//! let knowledge = Knowledge::builtin();
//! let mut responder = ListTrainedResponder::new("TechBuddy");
//! responder.train(&knowledge.conversation());
//!
//! let gatekeeper = Gatekeeper::new(responder, knowledge.known_questions(), Replies::default());
//! match gatekeeper.decide("What is AI?")? {
//!     Verdict::Answer(text) => println!("{}", text),
//!     other => println!("{}", other.into_text()),
//! }
//! ```
//!
use super::error::Result;
use super::normalize::normalize;
use super::responder::Responder;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Default reply to an exit phrase.
pub const DEFAULT_GOODBYE: &str = "Goodbye! Thanks for chatting with TechBuddy. Have a great day!";

/// Default reply when the utterance is not a known question.
pub const DEFAULT_FALLBACK: &str =
    "Sorry, I don't know the answer to that. Try searching online or asking an expert!";

/// Phrases that end a conversation instead of being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPhrase {
    Quit,
    Exit,
    Bye,
}

impl ExitPhrase {
    pub const ALL: [ExitPhrase; 3] = [ExitPhrase::Quit, ExitPhrase::Exit, ExitPhrase::Bye];

    pub fn as_str(self) -> &'static str {
        match self {
            ExitPhrase::Quit => "quit",
            ExitPhrase::Exit => "exit",
            ExitPhrase::Bye => "bye",
        }
    }

    /// Matches an already-normalized utterance.
    pub fn from_normalized(normalized: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == normalized)
    }

    /// Normalizes `utterance` and matches it.
    pub fn detect(utterance: &str) -> Option<Self> {
        Self::from_normalized(&normalize(utterance))
    }
}

impl fmt::Display for ExitPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable allow-list of normalized questions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownQuestionSet {
    questions: HashSet<String>,
}

impl KnownQuestionSet {
    /// True if the already-normalized `question` is in the set.
    pub fn contains_normalized(&self, question: &str) -> bool {
        self.questions.contains(question)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

/// Questions are normalized on the way in.
impl<'a> FromIterator<&'a str> for KnownQuestionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            questions: iter.into_iter().map(normalize).collect(),
        }
    }
}

/// The fixed texts the gatekeeper answers with on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replies {
    pub goodbye: String,
    pub fallback: String,
}

impl Default for Replies {
    fn default() -> Self {
        Self {
            goodbye: DEFAULT_GOODBYE.to_string(),
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

/// Outcome of gating one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Exit phrase; the session should end.
    Farewell(String),
    /// Known question; the responder's reply.
    Answer(String),
    /// Unknown question.
    Fallback(String),
}

impl Verdict {
    pub fn into_text(self) -> String {
        match self {
            Verdict::Farewell(t) | Verdict::Answer(t) | Verdict::Fallback(t) => t,
        }
    }

    pub fn ends_session(&self) -> bool {
        matches!(self, Verdict::Farewell(_))
    }
}

/// Allow-list gate in front of an injected responder.
pub struct Gatekeeper {
    responder: Box<dyn Responder>,
    known: KnownQuestionSet,
    replies: Replies,
}

impl Gatekeeper {
    pub fn new(
        responder: impl Responder + 'static,
        known: KnownQuestionSet,
        replies: Replies,
    ) -> Self {
        info!("Gatekeeper ready with {} known questions", known.len());
        Self {
            responder: Box::new(responder),
            known,
            replies,
        }
    }

    pub fn known_questions(&self) -> &KnownQuestionSet {
        &self.known
    }

    /// Decides how to answer `utterance`.
    ///
    /// ## Errors
    ///
    /// Propagates the responder's error unchanged when a known question
    /// could not be answered.
    pub fn decide(&self, utterance: &str) -> Result<Verdict> {
        let normalized = normalize(utterance);

        if let Some(phrase) = ExitPhrase::from_normalized(&normalized) {
            debug!("Exit phrase '{}' received", phrase);
            return Ok(Verdict::Farewell(self.replies.goodbye.clone()));
        }

        if self.known.contains_normalized(&normalized) {
            debug!("Known question {:?}, asking responder", normalized);
            let reply = self.responder.respond(utterance)?;
            return Ok(Verdict::Answer(reply));
        }

        debug!("Unknown question {:?}, using fallback", normalized);
        Ok(Verdict::Fallback(self.replies.fallback.clone()))
    }
}

impl fmt::Debug for Gatekeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("known", &self.known.len())
            .field("replies", &self.replies)
            .finish_non_exhaustive()
    }
}
