//! Tmux command builder, output parsers, and the production `Multiplexer`.
//!
//! `TmuxCommandBuilder` turns operations into tmux CLI strings without
//! executing them; `TmuxMultiplexer` executes them through a
//! `CommandRunner`. Keeping building and running separate keeps the
//! command grammar testable without a tmux server.

use crate::types::target::WindowInfo;

use super::runner::CommandRunner;
use super::Multiplexer;

// ---------------------------------------------------------------------------
// Command builder
// ---------------------------------------------------------------------------

/// Builds tmux CLI command strings without executing them.
pub struct TmuxCommandBuilder;

impl TmuxCommandBuilder {
    pub fn new() -> Self {
        TmuxCommandBuilder
    }

    /// `tmux list-sessions -F '#{session_name}'`
    pub fn list_sessions(&self) -> String {
        "tmux list-sessions -F '#{session_name}'".to_string()
    }

    /// `tmux list-windows -t <session> -F '#{window_index}:#{window_name}:#{window_panes}'`
    pub fn list_windows(&self, session: &str) -> String {
        format!(
            "tmux list-windows -t {} -F '#{{window_index}}:#{{window_name}}:#{{window_panes}}'",
            shell_escape(session)
        )
    }

    /// `tmux capture-pane -t <session>:<window> -p -S -<lines>`
    ///
    /// `-S -N` starts the capture N lines back in the scrollback; `-p`
    /// prints to stdout.
    pub fn capture_pane(&self, session: &str, window: u32, lines: u32) -> String {
        format!(
            "tmux capture-pane -t {} -p -S -{}",
            shell_escape(&format!("{}:{}", session, window)),
            lines
        )
    }

    /// `tmux send-keys -t <session>:<window> <text> Enter`
    pub fn send_keys(&self, session: &str, window: u32, text: &str) -> String {
        format!(
            "tmux send-keys -t {} {} Enter",
            shell_escape(&format!("{}:{}", session, window)),
            shell_escape(text)
        )
    }
}

impl Default for TmuxCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Output parsers
// ---------------------------------------------------------------------------

/// Parse the output of `list_sessions` into session name strings.
pub fn parse_list_sessions(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Parse the output of `list_windows` into `WindowInfo` structs.
///
/// Expected line format: `index:name:pane_count`. Malformed lines are
/// skipped.
pub fn parse_list_windows(output: &str) -> Vec<WindowInfo> {
    let mut windows = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.splitn(3, ':').collect();
        if parts.len() < 3 {
            continue;
        }
        let index = match parts[0].parse::<u32>() {
            Ok(i) => i,
            Err(_) => continue,
        };
        windows.push(WindowInfo {
            index,
            name: parts[1].to_string(),
            pane_count: parts[2].parse::<u32>().unwrap_or(1),
        });
    }
    windows
}

// ---------------------------------------------------------------------------
// Shell escaping
// ---------------------------------------------------------------------------

/// Escape a string for safe use in a shell command.
///
/// Wraps the value in single quotes and escapes any embedded single quotes
/// using the `'\''` idiom.
pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(|c| {
        c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '/' || c == ':'
    }) {
        return s.to_string();
    }
    let escaped = s.replace('\'', "'\\''");
    format!("'{}'", escaped)
}

// ---------------------------------------------------------------------------
// Production multiplexer
// ---------------------------------------------------------------------------

/// Whether a tmux stderr message means the addressed thing is gone rather
/// than the command having failed.
fn is_missing_target(err: &str) -> bool {
    let lower = err.to_lowercase();
    lower.contains("can't find") || lower.contains("no server running")
}

/// `Multiplexer` backed by a real tmux server via a `CommandRunner`.
pub struct TmuxMultiplexer<R: CommandRunner> {
    runner: R,
    builder: TmuxCommandBuilder,
}

impl<R: CommandRunner> TmuxMultiplexer<R> {
    pub fn new(runner: R) -> Self {
        TmuxMultiplexer {
            runner,
            builder: TmuxCommandBuilder::new(),
        }
    }
}

impl<R: CommandRunner> Multiplexer for TmuxMultiplexer<R> {
    fn list_sessions(&self) -> Result<Vec<String>, String> {
        match self.runner.run(&self.builder.list_sessions()) {
            Ok(out) => Ok(parse_list_sessions(&out)),
            // No server means no sessions, not a failed poll.
            Err(e) if is_missing_target(&e) => Ok(Vec::new()),
            Err(e) => Err(format!("tmux list-sessions failed: {}", e)),
        }
    }

    fn list_windows(&self, session: &str) -> Result<Vec<WindowInfo>, String> {
        match self.runner.run(&self.builder.list_windows(session)) {
            Ok(out) => Ok(parse_list_windows(&out)),
            Err(e) if is_missing_target(&e) => Ok(Vec::new()),
            Err(e) => Err(format!("tmux list-windows failed for '{}': {}", session, e)),
        }
    }

    fn capture_pane(
        &self,
        session: &str,
        window: u32,
        lines: u32,
    ) -> Result<Option<String>, String> {
        match self.runner.run(&self.builder.capture_pane(session, window, lines)) {
            Ok(out) => Ok(Some(out)),
            Err(e) if is_missing_target(&e) => Ok(None),
            Err(e) => Err(format!(
                "tmux capture-pane failed for '{}:{}': {}",
                session, window, e
            )),
        }
    }

    fn send_keys(&mut self, session: &str, window: u32, text: &str) -> Result<(), String> {
        self.runner
            .run(&self.builder.send_keys(session, window, text))
            .map(|_| ())
            .map_err(|e| format!("tmux send-keys failed for '{}:{}': {}", session, window, e))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::runner::MockRunner;

    #[test]
    fn cmd_list_sessions() {
        let b = TmuxCommandBuilder::new();
        assert_eq!(b.list_sessions(), "tmux list-sessions -F '#{session_name}'");
    }

    #[test]
    fn cmd_list_windows() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.list_windows("work");
        assert!(cmd.contains("list-windows -t work"));
        assert!(cmd.contains("window_index"));
        assert!(cmd.contains("window_panes"));
    }

    #[test]
    fn cmd_capture_pane_scrollback_depth() {
        let b = TmuxCommandBuilder::new();
        assert_eq!(
            b.capture_pane("work", 2, 100),
            "tmux capture-pane -t work:2 -p -S -100"
        );
    }

    #[test]
    fn cmd_send_keys_appends_enter() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.send_keys("work", 0, "1");
        assert_eq!(cmd, "tmux send-keys -t work:0 1 Enter");
    }

    #[test]
    fn cmd_send_keys_escapes_text() {
        let b = TmuxCommandBuilder::new();
        let cmd = b.send_keys("work", 0, "yes please");
        assert!(cmd.contains("'yes please'"));
        assert!(cmd.ends_with("Enter"));
    }

    // -- Parser tests --

    #[test]
    fn parse_sessions_basic() {
        let output = "agent-RRA-0082\nwork\n";
        assert_eq!(parse_list_sessions(output), vec!["agent-RRA-0082", "work"]);
    }

    #[test]
    fn parse_sessions_empty() {
        assert!(parse_list_sessions("").is_empty());
        assert!(parse_list_sessions("  \n \n").is_empty());
    }

    #[test]
    fn parse_windows_basic() {
        let output = "0:main:1\n2:agent:2\n";
        let windows = parse_list_windows(output);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].index, 0);
        assert_eq!(windows[0].name, "main");
        assert_eq!(windows[1].index, 2);
        assert_eq!(windows[1].pane_count, 2);
    }

    #[test]
    fn parse_windows_name_with_colon() {
        let windows = parse_list_windows("1:build:watch:1\n");
        assert_eq!(windows.len(), 1);
        // splitn(3) leaves the remainder in the count slot; count falls back.
        assert_eq!(windows[0].index, 1);
        assert_eq!(windows[0].name, "build");
    }

    #[test]
    fn parse_windows_skips_malformed() {
        let windows = parse_list_windows("garbage\nx:y:z\n0:ok:1\n");
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].name, "ok");
    }

    // -- Shell escape tests --

    #[test]
    fn escape_simple() {
        assert_eq!(shell_escape("work:0"), "work:0");
    }

    #[test]
    fn escape_with_space() {
        assert_eq!(shell_escape("my session"), "'my session'");
    }

    #[test]
    fn escape_with_single_quote() {
        assert_eq!(shell_escape("it's"), "'it'\\''s'");
    }

    #[test]
    fn escape_empty() {
        assert_eq!(shell_escape(""), "''");
    }

    // -- Multiplexer behavior --

    #[test]
    fn no_server_means_no_sessions() {
        let runner =
            MockRunner::with_responses(vec![Err("no server running on /tmp/tmux-0".into())]);
        let mux = TmuxMultiplexer::new(runner);
        assert_eq!(mux.list_sessions().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn list_sessions_other_errors_propagate() {
        let runner = MockRunner::with_responses(vec![Err("permission denied".into())]);
        let mux = TmuxMultiplexer::new(runner);
        assert!(mux.list_sessions().is_err());
    }

    #[test]
    fn vanished_window_capture_is_none() {
        let runner =
            MockRunner::with_responses(vec![Err("can't find window: work:7".into())]);
        let mux = TmuxMultiplexer::new(runner);
        assert_eq!(mux.capture_pane("work", 7, 100).unwrap(), None);
    }

    #[test]
    fn capture_infrastructure_error_propagates() {
        let runner = MockRunner::with_responses(vec![Err("server exited unexpectedly".into())]);
        let mux = TmuxMultiplexer::new(runner);
        assert!(mux.capture_pane("work", 0, 100).is_err());
    }

    #[test]
    fn capture_success_returns_text() {
        let runner = MockRunner::with_responses(vec![Ok("line 1\nline 2\n".into())]);
        let mux = TmuxMultiplexer::new(runner);
        assert_eq!(
            mux.capture_pane("work", 0, 100).unwrap().unwrap(),
            "line 1\nline 2\n"
        );
    }

    #[test]
    fn send_keys_runs_expected_command() {
        let runner = MockRunner::new();
        let mut mux = TmuxMultiplexer::new(runner);
        mux.send_keys("work", 3, "2").unwrap();
    }
}
