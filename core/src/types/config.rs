use serde::{Deserialize, Serialize};

/// Supervision settings, loaded from `~/.agentdeck/settings.yaml`.
///
/// Every field has a default so a missing or partial file still yields a
/// working configuration. Unknown keys in the file are ignored for
/// forward-compatibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub version: String,
    /// Poll scheduler interval. Ticks are single-flight: an overrunning
    /// pass skips the missed tick rather than queueing it.
    pub poll_interval_ms: u64,
    /// Scrollback lines requested per pane capture.
    pub capture_lines: u32,
    /// Cap on compact display lines per target.
    pub display_lines: usize,
    /// Seconds of unchanged output before an idle warning is raised.
    pub idle_threshold_secs: u64,
    /// Literal an agent prints while actively computing; the strongest
    /// positive "still working" signal. Matched case-insensitively.
    pub activity_marker: String,
    /// Only sessions whose name starts with this prefix are monitored.
    /// Empty means every session.
    pub session_prefix: String,
    /// Keywords that flag a prompt's question as destructive. A blunt
    /// heuristic, not a safety boundary: bulk approval skips matches,
    /// explicit single-target dispatch may override.
    pub destructive_keywords: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: "0.1.0".into(),
            poll_interval_ms: 2000,
            capture_lines: 100,
            display_lines: 3,
            idle_threshold_secs: 60,
            activity_marker: "esc to interrupt".into(),
            session_prefix: String::new(),
            destructive_keywords: vec![
                "delete".into(),
                "remove".into(),
                "overwrite".into(),
                "destroy".into(),
                "drop".into(),
                "truncate".into(),
                "wipe".into(),
            ],
        }
    }
}
