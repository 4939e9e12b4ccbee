//! # TechBuddy Text Normalization
//!
//! File: cli/src/core/normalize.rs
//!
//! ## Overview
//!
//! Utterances are compared against the known-question allow-list only after
//! normalization: lowercase, keep `[a-z0-9]` and whitespace, trim the ends.
//! Inner whitespace is kept as-is, so `"what  is ai"` (two spaces) does not
//! normalize to `"what is ai"`.
//!

/// Normalizes `text` for allow-list lookup.
///
/// Total and deterministic; the empty string maps to the empty string, and
/// applying it twice gives the same result as applying it once.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_question() {
        assert_eq!(normalize("What is AI?"), "what is ai");
        assert_eq!(normalize("  Can AI play games?!  "), "can ai play games");
        assert_eq!(normalize("What are HTML and CSS?"), "what are html and css");
    }

    #[test]
    fn test_normalize_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!..."), "");
        assert_eq!(normalize("   \t\n"), "");
    }

    #[test]
    fn test_normalize_drops_non_ascii() {
        assert_eq!(normalize("Qué es AI? 🤖"), "qu es ai");
        assert_eq!(normalize("MIT App Inventor 2"), "mit app inventor 2");
    }

    #[test]
    fn test_normalize_keeps_inner_whitespace() {
        assert_eq!(normalize("what  is\tai"), "what  is\tai");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "What is AI?",
            "Quit!!",
            "  How do I make a sprite move in Scratch?  ",
            "İstanbul ÅNGSTRÖM",
            "tabs\tand\nnewlines ",
            "123 -- 456",
            "What iz AI?",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_normalize_output_alphabet() {
        let out = normalize("Héllo, Wörld! <script>alert(1)</script>");
        assert!(out
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace()));
        assert_eq!(out, out.trim());
    }
}
