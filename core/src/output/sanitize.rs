//! Line sanitizer — turns raw pane captures into clean display lines.
//!
//! Raw tmux captures are noisy: color codes, cursor movement, OSC title
//! sequences, spinner redraw fragments. This module strips all of that,
//! right-trims each line, collapses runs of blank lines, and drops
//! trailing blanks. It has no failure mode: unrecognized sequences are
//! silently discarded and partial sequences at the end of a capture are
//! dropped rather than passed through.

/// Remove escape and control sequences from text.
///
/// Handles CSI (`ESC [ ... <final>`), OSC (`ESC ] ... BEL` or `ESC \`),
/// charset designation (`ESC ( X` / `ESC ) X`), and bare two-byte escapes.
/// C0 control characters other than `\n` and `\t` are dropped too, so
/// carriage-return overdraw and stray bells never reach the display.
pub fn strip_control_sequences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            match chars.next() {
                // CSI: parameters and intermediates, then one final byte.
                Some('[') => {
                    for next in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&next) {
                            break;
                        }
                    }
                }
                // OSC: runs to BEL or to ESC \ (string terminator).
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == '\u{07}' {
                            break;
                        }
                        if next == '\u{1b}' {
                            // Consume the terminator's second half if present.
                            chars.next();
                            break;
                        }
                    }
                }
                // Charset designation consumes exactly one more character.
                Some('(') | Some(')') => {
                    chars.next();
                }
                // Any other two-byte escape: drop both.
                Some(_) => {}
                None => {}
            }
            continue;
        }
        if c == '\n' || c == '\t' {
            out.push(c);
            continue;
        }
        if c.is_control() {
            continue;
        }
        out.push(c);
    }

    out
}

/// Sanitize a raw capture into display lines.
///
/// Each line is right-trimmed, runs of two or more blank lines collapse to
/// one, and trailing blank lines are dropped. Chronological order is
/// preserved: most recent output last.
pub fn sanitize_lines(text: &str) -> Vec<String> {
    let stripped = strip_control_sequences(text);
    let mut lines: Vec<String> = Vec::new();
    let mut prev_blank = false;

    for raw in stripped.split('\n') {
        let line = raw.trim_end().to_string();
        let blank = line.is_empty();
        if blank && prev_blank {
            continue;
        }
        prev_blank = blank;
        lines.push(line);
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
}

/// Truncate a line to at most `max` characters, ellipsis included.
///
/// Counts characters, not bytes, so multibyte output never panics a slice.
pub fn truncate_line(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let head: String = s.chars().take(keep).collect();
    format!("{}...", head)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_color_codes() {
        assert_eq!(
            strip_control_sequences("\x1b[32mgreen text\x1b[0m"),
            "green text"
        );
    }

    #[test]
    fn removes_cursor_movement() {
        assert_eq!(strip_control_sequences("\x1b[2J\x1b[H Hello"), " Hello");
    }

    #[test]
    fn removes_osc_title_sequence() {
        assert_eq!(
            strip_control_sequences("\x1b]0;my title\x07prompt"),
            "prompt"
        );
    }

    #[test]
    fn removes_osc_with_st_terminator() {
        assert_eq!(
            strip_control_sequences("\x1b]2;title\x1b\\after"),
            "after"
        );
    }

    #[test]
    fn removes_charset_designation() {
        assert_eq!(strip_control_sequences("\x1b(Bplain"), "plain");
    }

    #[test]
    fn preserves_plain_text() {
        let text = "plain text without codes";
        assert_eq!(strip_control_sequences(text), text);
    }

    #[test]
    fn handles_multiple_codes() {
        assert_eq!(
            strip_control_sequences("\x1b[1m\x1b[31mbold red\x1b[0m normal"),
            "bold red normal"
        );
    }

    #[test]
    fn drops_partial_sequence_at_end() {
        assert_eq!(strip_control_sequences("done\x1b[3"), "done");
        assert_eq!(strip_control_sequences("done\x1b"), "done");
    }

    #[test]
    fn drops_carriage_returns_and_bells() {
        assert_eq!(strip_control_sequences("spin\r\x07ner"), "spinner");
    }

    #[test]
    fn keeps_tabs_and_newlines() {
        assert_eq!(strip_control_sequences("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn sanitize_collapses_blank_runs() {
        let lines = sanitize_lines("a\n\n\n\nb");
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn sanitize_keeps_single_blank() {
        let lines = sanitize_lines("a\n\nb");
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn sanitize_drops_trailing_blanks() {
        let lines = sanitize_lines("a\nb\n\n\n");
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn sanitize_right_trims() {
        let lines = sanitize_lines("keep left   \n   keep indent  ");
        assert_eq!(lines, vec!["keep left", "   keep indent"]);
    }

    #[test]
    fn sanitize_whitespace_only_is_blank() {
        let lines = sanitize_lines("a\n   \n\t\nb");
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn sanitize_empty_input() {
        assert!(sanitize_lines("").is_empty());
        assert!(sanitize_lines("\n\n\n").is_empty());
    }

    #[test]
    fn sanitize_is_idempotent() {
        let first = sanitize_lines("\x1b[32mA\x1b[0m\n\n\nB  \n\n");
        let again = sanitize_lines(&first.join("\n"));
        assert_eq!(first, again);
    }

    #[test]
    fn wrapped_content_equals_plain_content() {
        let plain = "Building\nRunning tests\nok";
        let wrapped = "\x1b[1mBuilding\x1b[0m\n\x1b[33mRunning tests\x1b[0m\nok\n";
        assert_eq!(sanitize_lines(wrapped), sanitize_lines(plain));
    }

    #[test]
    fn truncate_short_line_untouched() {
        assert_eq!(truncate_line("short", 10), "short");
    }

    #[test]
    fn truncate_long_line_gets_ellipsis() {
        let long = "x".repeat(80);
        let cut = truncate_line(&long, 60);
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn truncate_multibyte_safe() {
        let long = "é".repeat(80);
        let cut = truncate_line(&long, 20);
        assert_eq!(cut.chars().count(), 20);
    }

    #[test]
    fn scenario_building_prompt() {
        let raw = "\x1b[32mBuilding\x1b[0m\n\n\nDo you want to delete old.py?\n > 1. Yes\n   2. No\n";
        let lines = sanitize_lines(raw);
        assert_eq!(
            lines,
            vec![
                "Building",
                "",
                "Do you want to delete old.py?",
                " > 1. Yes",
                "   2. No"
            ]
        );
    }
}
