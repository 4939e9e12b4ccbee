//! # TechBuddy CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and builds commands through `techbuddy_cmd()`.
//!
//! Every command runs inside a fresh temporary directory with `HOME` and
//! `XDG_CONFIG_HOME` pointing into it, so a developer's own
//! `~/.config/techbuddy/config.toml` or `.techbuddy.toml` never leaks into
//! a test run.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// An isolated `techbuddy` invocation plus the directory it runs in.
///
/// Keep the value alive for the duration of the test; dropping it removes
/// the temporary directory.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create sandbox directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// # Get TechBuddy Command (`cmd`)
    ///
    /// An `assert_cmd::Command` for the compiled `techbuddy` binary, running
    /// in the sandbox with user configuration isolated.
    pub fn cmd(&self) -> Command {
        let mut cmd = techbuddy_cmd();
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join(".config"))
            .env_remove("TECHBUDDY_LLM_ENDPOINT")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Writes `contents` to `name` inside the sandbox and returns its path.
    pub fn write(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write sandbox file");
        path
    }
}

/// # Get TechBuddy Command (`techbuddy_cmd`)
///
/// A bare `assert_cmd::Command` for the compiled `techbuddy` binary.
///
/// ## Panics
/// Panics if the `techbuddy` binary cannot be found via `Command::cargo_bin`.
pub fn techbuddy_cmd() -> Command {
    Command::cargo_bin("techbuddy").expect("Failed to find techbuddy binary for testing")
}
