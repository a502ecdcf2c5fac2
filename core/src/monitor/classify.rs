//! Health classifier — maps liveness plus recent output to one of the five
//! supervision states.
//!
//! Decision order, first match wins:
//! 1. not alive            -> Exited
//! 2. activity marker seen -> Active (even if error keywords co-occur: an
//!    agent mid-recovery legitimately prints "error" while still working,
//!    and Active means no supervision is needed)
//! 3. input prompt pattern -> Waiting
//! 4. error keyword        -> Error
//! 5. otherwise            -> Idle, with a warning once the output has been
//!    unchanged past the idle threshold

use crate::output::sanitize::truncate_line;
use crate::types::config::Settings;
use crate::types::health::Health;

/// How many of the most recent lines participate in pattern checks.
const RECENT_LINES: usize = 20;

/// Summaries are cut to one short line.
const SUMMARY_MAX: usize = 60;

/// Patterns that indicate the agent is waiting for input. Matched
/// case-insensitively against each recent line.
const INPUT_PATTERNS: &[&str] = &[
    "? ",
    "[y/n]",
    "press enter",
    "do you want",
    "would you like",
    "continue?",
    "proceed?",
    "❯",
];

/// Keywords that indicate an error surfaced in the output.
const ERROR_KEYWORDS: &[&str] = &["error", "failed", "exception", "traceback"];

/// The classifier's verdict for one target.
#[derive(Debug, Clone)]
pub struct Classification {
    pub health: Health,
    pub summary: String,
    pub warnings: Vec<String>,
}

/// Classify one target from its liveness flag, sanitized recent output,
/// and seconds since the output last changed.
pub fn classify(
    alive: bool,
    lines: &[String],
    last_output_age: u64,
    settings: &Settings,
) -> Classification {
    if !alive {
        return Classification {
            health: Health::Exited,
            summary: "exited".into(),
            warnings: vec!["target not found".into()],
        };
    }

    let start = lines.len().saturating_sub(RECENT_LINES);
    let recent = &lines[start..];
    let joined_lower = recent.join("\n").to_lowercase();

    if joined_lower.contains(&settings.activity_marker.to_lowercase()) {
        return Classification {
            health: Health::Active,
            summary: active_summary(&joined_lower, recent),
            warnings: Vec::new(),
        };
    }

    if let Some(matched) = find_input_prompt_line(recent) {
        return Classification {
            health: Health::Waiting,
            summary: truncate_line(matched.trim(), SUMMARY_MAX),
            warnings: vec!["detected input prompt".into()],
        };
    }

    if ERROR_KEYWORDS.iter().any(|k| joined_lower.contains(k)) {
        return Classification {
            health: Health::Error,
            summary: "Error detected".into(),
            warnings: vec!["error detected in output".into()],
        };
    }

    let mut warnings = Vec::new();
    if last_output_age >= settings.idle_threshold_secs {
        warnings.push(format!("no output for {}s", last_output_age));
    }
    Classification {
        health: Health::Idle,
        summary: last_nonempty(recent)
            .map(|l| truncate_line(l.trim(), SUMMARY_MAX))
            .unwrap_or_else(|| "(no output)".into()),
        warnings,
    }
}

/// Content heuristics for a one-line Active summary.
fn active_summary(joined_lower: &str, recent: &[String]) -> String {
    if joined_lower.contains("test") || joined_lower.contains("pytest") {
        return "Running tests...".into();
    }
    if joined_lower.contains("build") || joined_lower.contains("compil") {
        return "Building...".into();
    }
    if joined_lower.contains("review") || joined_lower.contains("diff") {
        return "Reviewing...".into();
    }
    last_nonempty(recent)
        .map(|l| truncate_line(l.trim(), SUMMARY_MAX))
        .unwrap_or_else(|| "Working...".into())
}

/// Most recent line matching an input-prompt pattern.
fn find_input_prompt_line(lines: &[String]) -> Option<&String> {
    lines.iter().rev().find(|line| {
        let lower = line.to_lowercase();
        INPUT_PATTERNS.iter().any(|p| lower.contains(p))
    })
}

fn last_nonempty(lines: &[String]) -> Option<&String> {
    lines.iter().rev().find(|l| !l.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
