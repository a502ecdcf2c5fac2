//! Help system — generates usage text for all adk commands.

/// Generate help text for a given topic.
///
/// - `None` → overview of all commands
/// - `Some("approve")` → detailed help for approve
pub fn help_text(topic: Option<&str>) -> String {
    match topic {
        None => overview(),
        Some(t) => match command_help(t) {
            Some(text) => text,
            None => format!(
                "Unknown help topic: '{}'. Run 'adk help' for a list of commands.",
                t
            ),
        },
    }
}

/// Top-level overview of all commands.
fn overview() -> String {
    "\
adk — supervisor for coding agents running in tmux

Usage: adk <command> [args...]

Commands:
  status [--json]                         One poll pass, as a table or JSON
  sessions                                List monitored sessions and windows
  watch                                   Full-screen dashboard (TUI)
  monitor                                 Headless loop printing transitions
  approve <session:window> [<option>]     Answer a target's prompt
  approve-all                             Answer every waiting target
  help [topic]                            Show help

Run 'adk help <command>' for details on one command.
"
    .to_string()
}

/// Detailed help for one command.
fn command_help(topic: &str) -> Option<String> {
    let text = match topic {
        "status" => {
            "\
adk status [--json]

Run one poll pass over every monitored target and print the result,
sorted so targets needing attention come first. --json emits the
records as a JSON array instead of a table.
"
        }
        "sessions" => {
            "\
adk sessions

List every monitored session and its windows. Sessions are filtered
by the session_prefix setting; an empty prefix matches everything.
"
        }
        "watch" => {
            "\
adk watch

Open the full-screen dashboard. Keys: j/k select, a approve the
selected target, 1-9 pick an option, A approve all, i ignore the
current notification, r force a poll, q quit.
"
        }
        "monitor" => {
            "\
adk monitor

Poll continuously and print one line per health transition. Useful
for piping into a log. Ctrl-C to stop.
"
        }
        "approve" => {
            "\
adk approve <session:window> [<option>] [--text <input>]

Answer the decision prompt of one waiting target. With no argument
the prompt's currently selected option is accepted. <option> is the
one-based number shown in the menu. --text types literal input
instead. Refused when the target is not WAITING in the latest poll.
"
        }
        "approve-all" => {
            "\
adk approve-all

Answer every WAITING target with its currently selected option.
Prompts whose question matches a destructive keyword (delete,
remove, overwrite, ...) are skipped; approve them individually.
"
        }
        "help" => {
            "\
adk help [topic]

Show the command overview, or detailed help for one command.
"
        }
        _ => return None,
    };
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_lists_every_command() {
        let text = help_text(None);
        for cmd in ["status", "sessions", "watch", "monitor", "approve", "approve-all", "help"] {
            assert!(text.contains(cmd), "overview missing '{}'", cmd);
        }
    }

    #[test]
    fn command_topics_resolve() {
        assert!(help_text(Some("approve")).contains("session:window"));
        assert!(help_text(Some("approve-all")).contains("destructive"));
    }

    #[test]
    fn unknown_topic_is_reported() {
        assert!(help_text(Some("bogus")).contains("Unknown help topic"));
    }
}
