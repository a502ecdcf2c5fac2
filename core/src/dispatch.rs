//! Approval dispatcher — answers decision prompts through the multiplexer.
//!
//! Dispatch always addresses the window recorded at classification time
//! and fails closed: a target whose recorded health is not Waiting is
//! refused, because the prompt the operator saw may no longer be on
//! screen. Bulk approval additionally skips prompts flagged destructive;
//! an explicit single-target approval may override that flag.

use crate::infrastructure::Multiplexer;
use crate::types::health::{Health, HealthRecord};
use crate::types::target::Target;

/// What to send in answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Approval {
    /// Pick a numbered option by zero-based index; the digit `index + 1`
    /// is typed into the pane.
    Option(usize),
    /// Type literal text.
    Text(String),
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub target: Target,
    /// The text that was typed into the pane.
    pub sent: String,
}

/// Result of a bulk approval sweep.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub approved: Vec<DispatchOutcome>,
    /// Targets passed over, with the reason.
    pub skipped: Vec<(Target, String)>,
}

/// Answer one target's prompt.
///
/// The record must come from the latest completed poll pass; its health
/// must be Waiting. `Approval::Option` is validated against the recorded
/// prompt's option list. Destructive prompts are allowed here: naming a
/// single target is an explicit operator decision.
pub fn dispatch_approval(
    mux: &mut dyn Multiplexer,
    record: &HealthRecord,
    approval: &Approval,
) -> Result<DispatchOutcome, String> {
    if record.health != Health::Waiting {
        return Err(format!(
            "target '{}' is {}, not WAITING; refusing to send input",
            record.target.key(),
            record.health.label()
        ));
    }

    let text = match approval {
        Approval::Option(index) => {
            match &record.prompt {
                Some(prompt) => {
                    if *index >= prompt.options.len() {
                        return Err(format!(
                            "target '{}' has {} options, option {} does not exist",
                            record.target.key(),
                            prompt.options.len(),
                            index + 1
                        ));
                    }
                }
                None => {
                    return Err(format!(
                        "target '{}' has no numbered options; pass literal text instead",
                        record.target.key()
                    ));
                }
            }
            (index + 1).to_string()
        }
        Approval::Text(text) => text.clone(),
    };

    mux.send_keys(&record.target.session, record.target.window, &text)?;
    Ok(DispatchOutcome {
        target: record.target.clone(),
        sent: text,
    })
}

/// Answer every Waiting target in one sweep.
///
/// Each target gets its prompt's currently selected option, or `"y"` when
/// it is waiting without a numbered menu. Destructive prompts are skipped.
/// A failed send is recorded and the sweep continues.
pub fn bulk_approve_waiting(mux: &mut dyn Multiplexer, records: &[HealthRecord]) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();

    for record in records {
        if record.health != Health::Waiting {
            continue;
        }
        if record.prompt.as_ref().is_some_and(|p| p.destructive) {
            outcome
                .skipped
                .push((record.target.clone(), "destructive prompt".into()));
            continue;
        }
        let approval = match &record.prompt {
            Some(prompt) => Approval::Option(prompt.selected_index),
            None => Approval::Text("y".into()),
        };
        match dispatch_approval(mux, record, &approval) {
            Ok(done) => outcome.approved.push(done),
            Err(e) => outcome.skipped.push((record.target.clone(), e)),
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
