use serde::{Deserialize, Serialize};

/// An interactive menu an agent printed while awaiting a human choice.
///
/// A prompt only exists when both a question and at least one option were
/// found in the sanitized output; anything less is not a decision prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecisionPrompt {
    /// The question line, e.g. `"Do you want to delete old.py?"`.
    pub question: String,
    /// Option labels in the order the agent listed them.
    pub options: Vec<String>,
    /// 0-based index of the option the agent's cursor rests on.
    pub selected_index: usize,
    /// Whether the question matched the destructive keyword set. Bulk
    /// approval skips destructive prompts; explicit single-target dispatch
    /// may override.
    pub destructive: bool,
}

/// Cleaned and parsed output from one pane capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedOutput {
    /// Raw capture lines, untouched.
    pub raw_lines: Vec<String>,
    /// Sanitized display lines, capped, most recent last. When a prompt was
    /// detected these start at the question line so the actionable part is
    /// never scrolled out by preceding noise.
    pub clean_lines: Vec<String>,
    /// The decision prompt, if one was detected.
    pub prompt: Option<DecisionPrompt>,
}
