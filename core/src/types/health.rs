use serde::{Deserialize, Serialize};

use super::output::DecisionPrompt;
use super::target::Target;

/// The five supervision states. Recomputed from scratch every poll; any
/// state is reportable at any time. Transition semantics live in the
/// tracker, not here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    /// The agent's activity marker is present — it is computing.
    Active,
    /// Alive but no activity signal in recent output.
    Idle,
    /// Blocked on a human decision (input prompt detected).
    Waiting,
    /// The session or window is gone.
    Exited,
    /// An error keyword surfaced without an activity signal.
    Error,
}

impl Health {
    /// Short display icon. Closed mapping over the five states.
    pub fn icon(&self) -> &'static str {
        match self {
            Health::Active => "🟢",
            Health::Idle => "🟡",
            Health::Waiting => "🟠",
            Health::Exited => "🔴",
            Health::Error => "⚠️",
        }
    }

    /// Uppercase label for table output.
    pub fn label(&self) -> &'static str {
        match self {
            Health::Active => "ACTIVE",
            Health::Idle => "IDLE",
            Health::Waiting => "WAITING",
            Health::Exited => "EXITED",
            Health::Error => "ERROR",
        }
    }

    /// Sort weight: states needing operator attention come first.
    pub fn priority(&self) -> u8 {
        match self {
            Health::Error => 0,
            Health::Waiting => 1,
            Health::Idle => 2,
            Health::Active => 3,
            Health::Exited => 4,
        }
    }
}

/// One target's status for one poll pass. Recomputed fresh every pass and
/// discarded after comparison; never accumulated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRecord {
    pub target: Target,
    pub health: Health,
    /// Seconds since the pane's output last changed.
    pub last_output_age: u64,
    /// One-line description of what the agent appears to be doing.
    pub summary: String,
    /// Per-target degradation notes (capture failure, idle overrun, ...).
    pub warnings: Vec<String>,
    /// The decision prompt this target is blocked on, if any.
    pub prompt: Option<DecisionPrompt>,
    /// Compact sanitized output lines for display.
    pub lines: Vec<String>,
}

/// Emitted when a target's health differs from the previously remembered
/// state. First observations seed memory silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub target: Target,
    pub previous_health: Health,
    pub new_health: Health,
    pub summary: String,
    /// Milliseconds since the epoch at comparison time.
    pub timestamp_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Health::Waiting).unwrap(), "\"waiting\"");
        let back: Health = serde_json::from_str("\"exited\"").unwrap();
        assert_eq!(back, Health::Exited);
    }

    #[test]
    fn priority_orders_attention_first() {
        let mut states = [
            Health::Active,
            Health::Exited,
            Health::Error,
            Health::Idle,
            Health::Waiting,
        ];
        states.sort_by_key(|h| h.priority());
        assert_eq!(states[0], Health::Error);
        assert_eq!(states[1], Health::Waiting);
        assert_eq!(states[4], Health::Exited);
    }

    #[test]
    fn record_serde_round_trip() {
        let record = HealthRecord {
            target: Target::new("work", 0),
            health: Health::Waiting,
            last_output_age: 12,
            summary: "Do you want to proceed?".into(),
            warnings: vec![],
            prompt: None,
            lines: vec!["Do you want to proceed?".into()],
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: HealthRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.health, Health::Waiting);
        assert_eq!(back.target.key(), "work:0");
    }

    #[test]
    fn transition_event_serde() {
        let event = TransitionEvent {
            target: Target::new("work", 1),
            previous_health: Health::Active,
            new_health: Health::Exited,
            summary: "session gone".into(),
            timestamp_ms: 1700000000000,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"previous_health\":\"active\""));
        assert!(json.contains("\"new_health\":\"exited\""));
    }
}
