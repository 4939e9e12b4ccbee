//! # TechBuddy CLI Chat Integration Tests
//!
//! File: cli/tests/chat.rs
//!
//! ## Overview
//!
//! Drives `techbuddy chat` through piped stdin and checks the transcript on
//! stdout. Covers the built-in knowledge base, custom knowledge files, and
//! project configuration picked up from the working directory.
//!

mod common;
use common::*;
use predicates::prelude::*;

const GOODBYE: &str = "Goodbye! Thanks for chatting with TechBuddy. Have a great day!";
const FALLBACK: &str =
    "Sorry, I don't know the answer to that. Try searching online or asking an expert!";

#[test]
fn test_chat_answers_known_question_and_says_goodbye() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("chat")
        .write_stdin("What is AI?\nquit\nWhat is Scratch?\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Hi! I'm TechBuddy."))
        .stdout(predicate::str::contains(
            "TechBuddy: AI stands for Artificial Intelligence.",
        ))
        .stdout(predicate::str::contains(format!("TechBuddy: {}", GOODBYE)))
        .stdout(predicate::str::contains("Scratch is a fun way").not());
}

#[test]
fn test_chat_normalizes_and_falls_back() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("c")
        .write_stdin("  WHAT is Scratch??  \nHow do volcanoes work?\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("TechBuddy: Scratch is a fun way"))
        .stdout(predicate::str::contains(format!("TechBuddy: {}", FALLBACK)));
}

#[test]
fn test_chat_ends_cleanly_at_end_of_input() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("chat")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains(GOODBYE).not());
}

#[test]
fn test_chat_with_custom_knowledge_file() {
    let sandbox = Sandbox::new();
    let kb = sandbox.write(
        "kb.toml",
        r#"
[[pairs]]
question = "Who is Ferris?"
answer = "Ferris is the friendly crab mascot of Rust!"
"#,
    );

    sandbox
        .cmd()
        .args(["chat", "--knowledge"])
        .arg(&kb)
        .write_stdin("who is ferris\nWhat is AI?\nbye\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "TechBuddy: Ferris is the friendly crab mascot of Rust!",
        ))
        .stdout(predicate::str::contains(format!("TechBuddy: {}", FALLBACK)))
        .stdout(predicate::str::contains(GOODBYE));
}

#[test]
fn test_chat_missing_knowledge_file_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["chat", "--knowledge", "nope.toml"])
        .write_stdin("What is AI?\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read knowledge file"));
}

#[test]
fn test_chat_uses_project_config() {
    let sandbox = Sandbox::new();
    sandbox.write(
        ".techbuddy.toml",
        r#"
[bot]
name = "RoboPal"
greeting = "Beep boop!"
fallback = "No idea, sorry."
"#,
    );

    sandbox
        .cmd()
        .arg("chat")
        .write_stdin("What is a robot?\nwhat is love\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Beep boop!"))
        .stdout(predicate::str::contains("RoboPal: A robot is a machine"))
        .stdout(predicate::str::contains("RoboPal: No idea, sorry."));
}

#[test]
fn test_chat_rejects_invalid_project_config() {
    let sandbox = Sandbox::new();
    sandbox.write(".techbuddy.toml", "[bot]\nname = \"\"\n");

    sandbox
        .cmd()
        .arg("chat")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'bot.name' cannot be empty."));
}
