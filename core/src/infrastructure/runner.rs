//! Command runner abstraction for executing shell commands.
//!
//! `CommandRunner` is the trait the tmux adapter uses to execute system
//! commands. `ShellRunner` is the production implementation that spawns
//! `sh -c`. `MockRunner` is the test double that records calls and returns
//! preset responses.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::Command;

/// Trait for executing shell command strings.
pub trait CommandRunner: Send {
    fn run(&self, cmd: &str) -> Result<String, String>;
}

/// Production runner that spawns `sh -c <cmd>`.
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, cmd: &str) -> Result<String, String> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .output()
            .map_err(|e| format!("Failed to execute: {}", e))?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }
}

/// Test-double runner that records commands and replays preset responses
/// in order. Once the queue is empty it answers with empty output.
pub struct MockRunner {
    responses: RefCell<VecDeque<Result<String, String>>>,
    commands: RefCell<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner {
            responses: RefCell::new(VecDeque::new()),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<Result<String, String>>) -> Self {
        MockRunner {
            responses: RefCell::new(responses.into()),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, cmd: &str) -> Result<String, String> {
        self.commands.borrow_mut().push(cmd.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}
