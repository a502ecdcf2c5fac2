//! Transition tracker — the only state that survives across poll passes.
//!
//! Remembers each target's last health keyed by `"session:window"` and
//! emits an event exactly when the recomputed health differs. First
//! observations seed memory silently so startup never floods the event
//! stream. Keys absent from a pass are pruned, and a target reported
//! Exited is dropped after its event so a dead target surfaces once
//! instead of every pass.

use std::collections::HashMap;

use crate::types::health::{Health, HealthRecord, TransitionEvent};

#[derive(Default)]
pub struct TransitionTracker {
    previous: HashMap<String, Health>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently remembered, in no particular order.
    pub fn known_keys(&self) -> Vec<String> {
        self.previous.keys().cloned().collect()
    }

    pub fn last_health(&self, key: &str) -> Option<Health> {
        self.previous.get(key).copied()
    }

    /// Compare one full pass against memory.
    ///
    /// Returns the transitions and replaces memory with exactly this
    /// batch's keys (minus Exited ones), so anything not observed again
    /// is forgotten.
    pub fn observe_batch(
        &mut self,
        records: &[HealthRecord],
        timestamp_ms: u64,
    ) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        let mut next = HashMap::with_capacity(records.len());

        for record in records {
            let key = record.target.key();
            if let Some(&prev) = self.previous.get(&key) {
                if prev != record.health {
                    events.push(TransitionEvent {
                        target: record.target.clone(),
                        previous_health: prev,
                        new_health: record.health,
                        summary: record.summary.clone(),
                        timestamp_ms,
                    });
                }
            }
            if record.health != Health::Exited {
                next.insert(key, record.health);
            }
        }

        self.previous = next;
        events
    }
}
