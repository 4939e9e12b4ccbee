//! # TechBuddy CLI Llama Integration Tests
//!
//! File: cli/tests/llama.rs
//!
//! ## Overview
//!
//! Runs `techbuddy llama` against a mocked Ollama server.
//!

mod common;
use common::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_llama_replies_and_exits_on_exit_phrase() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body(json!({"model": "tinyllama", "prompt": "What is a GPU?", "stream": false}));
        then.status(200)
            .json_body(json!({"response": "A GPU draws pictures really fast."}));
    });

    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["llama", "--model", "tinyllama", "--endpoint"])
        .arg(server.base_url())
        .write_stdin("What is a GPU?\nEXIT\nWhat is a CPU?\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Hi! I'm your local AI assistant."))
        .stdout(predicate::str::contains("AI: A GPU draws pictures really fast."));

    mock.assert_hits(1);
}

#[test]
fn test_llama_reports_server_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(404).body("model 'llama3' not found");
    });

    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["llama", "--endpoint"])
        .arg(server.base_url())
        .write_stdin("hello\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("model 'llama3' not found"));
}

#[test]
fn test_llama_rejects_endpoint_without_scheme() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["llama", "--endpoint", "localhost:11434"])
        .write_stdin("hello\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Invalid LLM endpoint 'localhost:11434'",
        ))
        .stdout(predicate::str::contains("AI:").not());
}

#[test]
fn test_llama_rejects_zero_timeout() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["llama", "--timeout", "0"])
        .assert()
        .failure()
        .code(2);
}
