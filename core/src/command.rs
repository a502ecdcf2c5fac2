//! Command — the typed interface for all supervisor operations.
//!
//! Every operation the `adk` binary can perform is a variant of the
//! `Command` enum. The serde `tag = "command"` attribute produces
//! internally-tagged JSON (`{"command": "approve", "target": "work:1"}`)
//! so commands can be logged and replayed as data.

use serde::{Deserialize, Serialize};

/// A typed supervisor command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    /// One poll pass, printed as a table (or JSON with `format: "json"`).
    #[serde(rename = "status")]
    Status {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
    },

    /// List monitored sessions and their windows.
    #[serde(rename = "sessions")]
    Sessions,

    /// Full-screen dashboard, polling continuously.
    #[serde(rename = "watch")]
    Watch,

    /// Headless poll loop that prints health transitions as they happen.
    #[serde(rename = "monitor")]
    Monitor,

    /// Answer one target's decision prompt.
    #[serde(rename = "approve")]
    Approve {
        /// `"session:window"` key of the target.
        target: String,
        /// One-based option number to pick.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        option: Option<usize>,
        /// Literal text to type instead of an option number.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },

    /// Answer every non-destructive Waiting target.
    #[serde(rename = "approve.all")]
    ApproveAll,

    /// Show usage, optionally for one topic.
    #[serde(rename = "help")]
    Help {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
    },
}
