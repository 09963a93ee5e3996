//! Common test utilities for stylepipe CLI tests.
//!
//! This module provides:
//! - `TestProject`: isolated project directory with a `stylepipe.toml`
//! - `TestResult`: captured output of one CLI invocation
//! - Fixtures: reusable SCSS content

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;

use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};

use tempfile::TempDir;

/// Result of running the stylepipe binary
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse every stdout line as a JSON event.
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("bad event line {l:?}: {e}"))
            })
            .collect()
    }
}

/// Isolated project: `src/sass/` sources, `dist/css/` output, and a
/// project config that targets an old Safari so prefixes are observable.
pub struct TestProject {
    pub root: TempDir,
    home: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let project = Self {
            root: tempfile::tempdir().expect("Failed to create project dir"),
            home: tempfile::tempdir().expect("Failed to create home dir"),
        };
        project.write("stylepipe.toml", PROJECT_CONFIG);
        project
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) {
        let full = self.path(relative);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full, content).expect("Failed to write file");
    }

    pub fn write_scss(&self, relative: &str, content: &str) {
        self.write(&format!("src/sass/{relative}"), content);
    }

    pub fn read_css(&self, relative: &str) -> String {
        let full = self.path(&format!("dist/css/{relative}"));
        std::fs::read_to_string(&full)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", full.display(), e))
    }

    pub fn css_exists(&self, relative: &str) -> bool {
        self.path(&format!("dist/css/{relative}")).exists()
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = self
            .command(args)
            .output()
            .expect("Failed to execute stylepipe");
        to_result(output)
    }

    /// Start the binary with piped stdio; the caller owns the child.
    pub fn spawn(&self, args: &[&str]) -> Child {
        self.command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start stylepipe")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_stylepipe"));
        cmd.current_dir(self.root.path())
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("NO_COLOR", "1")
            .env("LANG", "C")
            .env_remove("RUST_LOG");
        for key in [
            "STYLEPIPE_SOURCE",
            "STYLEPIPE_DEST",
            "STYLEPIPE_BROWSERS",
            "STYLEPIPE_DEBOUNCE_MS",
            "STYLEPIPE_POLL",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }
}

pub fn to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
