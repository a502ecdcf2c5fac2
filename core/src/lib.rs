//! agentdeck-core — supervision engine for coding agents in tmux.
//!
//! The engine polls every monitored `{session, window}` target, sanitizes
//! its recent pane output, classifies it into one of five health states,
//! tracks transitions across polls, and dispatches approvals back into
//! the panes. The `adk` binary and the dashboard are thin shells over
//! this crate.

pub mod cli;
pub mod command;
pub mod data;
pub mod dispatch;
pub mod help;
pub mod infrastructure;
pub mod monitor;
pub mod output;
pub mod types;
