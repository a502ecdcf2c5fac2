//! Session aggregator — one poll pass over every monitored target.
//!
//! Discovery asks the multiplexer for sessions (filtered by the configured
//! prefix) and their windows, each target's pane is captured and
//! classified, and the pass is assembled into a priority-sorted batch.
//! Failures degrade per target; a bad capture never aborts the pass.

use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::infrastructure::Multiplexer;
use crate::output::prompt::parse_output;
use crate::output::sanitize::sanitize_lines;
use crate::types::config::Settings;
use crate::types::health::{Health, HealthRecord};
use crate::types::target::Target;

use super::classify::classify;

// ---------------------------------------------------------------------------
// Output change tracking
// ---------------------------------------------------------------------------

struct OutputMemory {
    fingerprint: u64,
    changed_at_ms: u64,
}

/// Remembers a fingerprint of each target's sanitized output so the
/// classifier can tell how long a pane has been silent. Keys that stop
/// being discovered are pruned alongside the transition tracker's.
#[derive(Default)]
pub struct OutputTracker {
    memory: HashMap<String, OutputMemory>,
}

impl OutputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current output and return seconds since it last changed.
    pub fn observe(&mut self, key: &str, output: &str, now_ms: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        output.hash(&mut hasher);
        let fingerprint = hasher.finish();

        match self.memory.get_mut(key) {
            Some(mem) if mem.fingerprint == fingerprint => {
                (now_ms.saturating_sub(mem.changed_at_ms)) / 1000
            }
            Some(mem) => {
                mem.fingerprint = fingerprint;
                mem.changed_at_ms = now_ms;
                0
            }
            None => {
                self.memory.insert(
                    key.to_string(),
                    OutputMemory {
                        fingerprint,
                        changed_at_ms: now_ms,
                    },
                );
                0
            }
        }
    }

    /// Forget every key not in `live`.
    pub fn prune(&mut self, live: &HashSet<String>) {
        self.memory.retain(|k, _| live.contains(k));
    }
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// A target found by the discovery scan, with any degradation note
/// attached along the way.
pub struct DiscoveredTarget {
    pub target: Target,
    pub warning: Option<String>,
}

/// Enumerate every monitored target from live multiplexer state.
///
/// Sessions are filtered by `session_prefix`. A session whose window
/// listing fails degrades to a single window-0 target carrying a warning
/// instead of dropping the session from the pass.
pub fn discover_targets(
    mux: &dyn Multiplexer,
    settings: &Settings,
) -> Result<Vec<DiscoveredTarget>, String> {
    let mut discovered = Vec::new();
    for session in mux.list_sessions()? {
        if !session.starts_with(&settings.session_prefix) {
            continue;
        }
        match mux.list_windows(&session) {
            Ok(windows) => {
                for w in windows {
                    discovered.push(DiscoveredTarget {
                        target: Target::new(&session, w.index),
                        warning: None,
                    });
                }
            }
            Err(e) => {
                discovered.push(DiscoveredTarget {
                    target: Target::new(&session, 0),
                    warning: Some(format!("window listing failed: {}", e)),
                });
            }
        }
    }
    Ok(discovered)
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Capture and classify one target.
pub fn assess_target(
    mux: &dyn Multiplexer,
    discovered: &DiscoveredTarget,
    output_tracker: &mut OutputTracker,
    settings: &Settings,
    now_ms: u64,
) -> HealthRecord {
    let target = discovered.target.clone();
    let key = target.key();
    let mut extra_warnings: Vec<String> = discovered.warning.iter().cloned().collect();

    let raw = match mux.capture_pane(&target.session, target.window, settings.capture_lines) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            let c = classify(false, &[], 0, settings);
            return HealthRecord {
                target,
                health: c.health,
                last_output_age: 0,
                summary: c.summary,
                warnings: merge_warnings(extra_warnings, c.warnings),
                prompt: None,
                lines: Vec::new(),
            };
        }
        Err(e) => {
            // Capture failure is a blind spot, not a death certificate.
            extra_warnings.push(format!("capture failed: {}", e));
            return HealthRecord {
                target,
                health: Health::Idle,
                last_output_age: 0,
                summary: "(capture unavailable)".into(),
                warnings: extra_warnings,
                prompt: None,
                lines: Vec::new(),
            };
        }
    };

    // Classification and aging read the whole sanitized buffer; the
    // parsed view is the compact display slice anchored at the prompt.
    let clean = sanitize_lines(&raw);
    let age = output_tracker.observe(&key, &clean.join("\n"), now_ms);
    let c = classify(true, &clean, age, settings);

    let parsed = parse_output(&raw, settings.display_lines, &settings.destructive_keywords);

    // A stale menu above fresh activity output is not a live decision.
    let prompt = match c.health {
        Health::Waiting => parsed.prompt,
        _ => None,
    };

    HealthRecord {
        target,
        health: c.health,
        last_output_age: age,
        summary: c.summary,
        warnings: merge_warnings(extra_warnings, c.warnings),
        prompt,
        lines: parsed.clean_lines,
    }
}

fn merge_warnings(mut base: Vec<String>, extra: Vec<String>) -> Vec<String> {
    base.extend(extra);
    base
}

// ---------------------------------------------------------------------------
// Pass assembly
// ---------------------------------------------------------------------------

/// Run one full pass: discover, assess, synthesize Exited records for
/// targets that were known last pass but are gone now, prune output
/// memory, and sort by attention priority.
pub fn collect_records(
    mux: &dyn Multiplexer,
    output_tracker: &mut OutputTracker,
    known_keys: &[String],
    settings: &Settings,
    now_ms: u64,
) -> Result<Vec<HealthRecord>, String> {
    let discovered = discover_targets(mux, settings)?;
    let live_keys: HashSet<String> = discovered.iter().map(|d| d.target.key()).collect();

    let mut records: Vec<HealthRecord> = discovered
        .iter()
        .map(|d| assess_target(mux, d, output_tracker, settings, now_ms))
        .collect();

    for key in known_keys {
        if !live_keys.contains(key) {
            if let Ok(target) = Target::parse_key(key) {
                let c = classify(false, &[], 0, settings);
                records.push(HealthRecord {
                    target,
                    health: c.health,
                    last_output_age: 0,
                    summary: c.summary,
                    warnings: c.warnings,
                    prompt: None,
                    lines: Vec::new(),
                });
            }
        }
    }

    output_tracker.prune(&live_keys);
    records.sort_by(|a, b| {
        (a.health.priority(), a.target.key()).cmp(&(b.health.priority(), b.target.key()))
    });
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
