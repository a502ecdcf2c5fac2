//! Prompt extractor — detects decision prompts in sanitized output.
//!
//! A decision prompt is a question line (first line ending in `?`) followed
//! by numbered options (`1. Yes`, `2. No`). A cursor glyph (`>` or `❯`) in
//! front of an option marks the agent's current default. No question or no
//! options means no prompt; malformed output is never an error.

use crate::output::sanitize::{sanitize_lines, truncate_line};
use crate::types::output::{DecisionPrompt, ParsedOutput};

/// Option labels longer than this are truncated with an ellipsis.
const OPTION_LABEL_MAX: usize = 50;

/// A detected prompt plus the index of its question line in the sanitized
/// buffer, so display can anchor at the question instead of the tail.
#[derive(Debug, Clone)]
pub struct PromptMatch {
    pub prompt: DecisionPrompt,
    pub question_line: usize,
}

/// One parsed option line.
struct OptionLine {
    label: String,
    has_cursor: bool,
}

/// Scan sanitized lines for a decision prompt.
///
/// The earliest question line wins. Option-shaped lines before any question
/// are ignored. Blank lines between the question and its options are
/// skipped; once options start, the first non-option, non-blank line ends
/// collection.
pub fn extract_prompt(lines: &[String], destructive_keywords: &[String]) -> Option<PromptMatch> {
    let question_line = lines
        .iter()
        .position(|l| is_question_line(l))?;
    let question = lines[question_line].trim().to_string();

    let mut options = Vec::new();
    let mut selected_index = 0;

    for line in &lines[question_line + 1..] {
        if line.trim().is_empty() {
            if options.is_empty() {
                continue;
            }
            break;
        }
        match parse_option_line(line) {
            Some(opt) => {
                if opt.has_cursor {
                    selected_index = options.len();
                }
                options.push(opt.label);
            }
            None => {
                if options.is_empty() {
                    // Explanation text between question and options.
                    continue;
                }
                break;
            }
        }
    }

    if options.is_empty() {
        return None;
    }

    let destructive = is_destructive(&question, destructive_keywords);
    Some(PromptMatch {
        prompt: DecisionPrompt {
            question,
            options,
            selected_index,
            destructive,
        },
        question_line,
    })
}

/// Sanitize a raw capture and extract its prompt in one step.
///
/// `display_cap` bounds `clean_lines`. When a prompt was found the display
/// window starts at the question line so the actionable part is never
/// scrolled out by preceding noise; otherwise it is the buffer tail.
pub fn parse_output(
    raw: &str,
    display_cap: usize,
    destructive_keywords: &[String],
) -> ParsedOutput {
    let raw_lines: Vec<String> = raw.split('\n').map(|l| l.to_string()).collect();
    let clean = sanitize_lines(raw);
    let matched = extract_prompt(&clean, destructive_keywords);

    let clean_lines = match &matched {
        Some(m) => {
            let end = (m.question_line + display_cap).min(clean.len());
            clean[m.question_line..end].to_vec()
        }
        None => {
            if clean.len() > display_cap {
                clean[clean.len() - display_cap..].to_vec()
            } else {
                clean.clone()
            }
        }
    };

    ParsedOutput {
        raw_lines,
        clean_lines,
        prompt: matched.map(|m| m.prompt),
    }
}

/// Whether the question text matches the destructive keyword set.
pub fn is_destructive(question: &str, keywords: &[String]) -> bool {
    let lower = question.to_lowercase();
    keywords.iter().any(|k| lower.contains(&k.to_lowercase()))
}

/// A question line is any non-option line whose trimmed text ends in `?`.
fn is_question_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with('?') && trimmed.len() > 1 && parse_option_line(line).is_none()
}

/// Parse `"<k>. <label>"`, optionally prefixed by a cursor glyph.
fn parse_option_line(line: &str) -> Option<OptionLine> {
    let mut rest = line.trim_start();
    let mut has_cursor = false;

    if let Some(stripped) = rest.strip_prefix('❯').or_else(|| rest.strip_prefix('>')) {
        has_cursor = true;
        rest = stripped.trim_start();
    }

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    rest = &rest[digits.len()..];
    let rest = rest.strip_prefix('.')?;
    let label = rest.trim();
    if label.is_empty() {
        return None;
    }

    Some(OptionLine {
        label: truncate_line(label, OPTION_LABEL_MAX),
        has_cursor,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
