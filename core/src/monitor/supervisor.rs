//! Supervisor — owns the multiplexer, the poll loop, and the cross-poll
//! trackers.
//!
//! The loop is single-threaded for state mutation. External threads talk
//! to it through an mpsc channel via `SupervisorHandle`; the loop is the
//! single consumer. Ticks are single-flight: when a pass overruns the
//! interval the missed tick is skipped, never queued, so passes can
//! never stack up behind a slow tmux server.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use crate::dispatch::{bulk_approve_waiting, dispatch_approval, Approval, BulkOutcome, DispatchOutcome};
use crate::infrastructure::Multiplexer;
use crate::types::config::Settings;
use crate::types::health::{HealthRecord, TransitionEvent};

use super::aggregate::{collect_records, OutputTracker};
use super::tracker::TransitionTracker;

/// Events that can be sent to the supervisor's loop via the channel.
#[derive(Debug)]
pub enum SupervisorEvent {
    /// Answer one target's prompt.
    Approve { key: String, approval: Approval },
    /// Answer every non-destructive Waiting target.
    ApproveAll,
    /// Stop the loop after the current tick.
    Shutdown,
}

/// Handle for sending events to a running supervisor loop.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorEvent>,
}

impl SupervisorHandle {
    pub fn approve(&self, key: &str, approval: Approval) -> Result<(), String> {
        self.sender
            .send(SupervisorEvent::Approve {
                key: key.to_string(),
                approval,
            })
            .map_err(|e| format!("Channel send failed: {}", e))
    }

    pub fn approve_all(&self) -> Result<(), String> {
        self.sender
            .send(SupervisorEvent::ApproveAll)
            .map_err(|e| format!("Channel send failed: {}", e))
    }

    pub fn shutdown(&self) -> Result<(), String> {
        self.sender
            .send(SupervisorEvent::Shutdown)
            .map_err(|e| format!("Channel send failed: {}", e))
    }
}

/// One completed poll pass: the priority-sorted records plus the
/// transitions observed against the previous pass.
#[derive(Debug, Clone)]
pub struct PollBatch {
    pub records: Vec<HealthRecord>,
    pub events: Vec<TransitionEvent>,
    pub timestamp_ms: u64,
}

pub struct Supervisor {
    mux: Box<dyn Multiplexer>,
    settings: Settings,
    transitions: TransitionTracker,
    outputs: OutputTracker,
    last_batch: Option<PollBatch>,
    receiver: mpsc::Receiver<SupervisorEvent>,
    handle: SupervisorHandle,
}

impl Supervisor {
    pub fn new(mux: Box<dyn Multiplexer>, settings: Settings) -> Self {
        let (sender, receiver) = mpsc::channel();
        Supervisor {
            mux,
            settings,
            transitions: TransitionTracker::new(),
            outputs: OutputTracker::new(),
            last_batch: None,
            receiver,
            handle: SupervisorHandle { sender },
        }
    }

    /// Get a handle for sending events to this supervisor.
    pub fn handle(&self) -> SupervisorHandle {
        self.handle.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The most recently completed pass, if any.
    pub fn last_batch(&self) -> Option<&PollBatch> {
        self.last_batch.as_ref()
    }

    /// Run one poll pass and remember it as the last completed batch.
    pub fn poll(&mut self) -> Result<&PollBatch, String> {
        let now = now_ms();
        let records = collect_records(
            self.mux.as_ref(),
            &mut self.outputs,
            &self.transitions.known_keys(),
            &self.settings,
            now,
        )?;
        let events = self.transitions.observe_batch(&records, now);
        Ok(self.last_batch.insert(PollBatch {
            records,
            events,
            timestamp_ms: now,
        }))
    }

    /// Answer one target's prompt, judged against the last completed pass.
    pub fn approve(&mut self, key: &str, approval: &Approval) -> Result<DispatchOutcome, String> {
        let batch = self
            .last_batch
            .as_ref()
            .ok_or_else(|| "no poll pass has completed yet".to_string())?;
        let record = batch
            .records
            .iter()
            .find(|r| r.target.key() == key)
            .ok_or_else(|| format!("target '{}' was not seen in the last poll", key))?;
        dispatch_approval(self.mux.as_mut(), record, approval)
    }

    /// Answer every non-destructive Waiting target from the last pass.
    pub fn approve_all(&mut self) -> BulkOutcome {
        match &self.last_batch {
            Some(batch) => bulk_approve_waiting(self.mux.as_mut(), &batch.records),
            None => BulkOutcome::default(),
        }
    }

    /// Run the poll loop, invoking `on_batch` after every completed pass.
    /// Blocks until a Shutdown event arrives.
    pub fn run<F: FnMut(&PollBatch)>(&mut self, mut on_batch: F) -> Result<(), String> {
        let interval = Duration::from_millis(self.settings.poll_interval_ms.max(1));
        loop {
            let started = Instant::now();
            match self.poll() {
                Ok(batch) => on_batch(batch),
                Err(e) => eprintln!("adk: poll failed: {}", e),
            }
            if self.wait_for_tick(started + interval) {
                return Ok(());
            }
        }
    }

    /// Drain events until the deadline. Returns true on shutdown. A pass
    /// that overran its interval falls straight through to the next one.
    fn wait_for_tick(&mut self, deadline: Instant) -> bool {
        loop {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            match self.receiver.recv_timeout(deadline - now) {
                Ok(SupervisorEvent::Approve { key, approval }) => {
                    match self.approve(&key, &approval) {
                        Ok(done) => eprintln!("adk: sent '{}' to {}", done.sent, done.target.key()),
                        Err(e) => eprintln!("adk: approval failed: {}", e),
                    }
                }
                Ok(SupervisorEvent::ApproveAll) => {
                    let outcome = self.approve_all();
                    eprintln!(
                        "adk: approved {} target(s), skipped {}",
                        outcome.approved.len(),
                        outcome.skipped.len()
                    );
                }
                Ok(SupervisorEvent::Shutdown) => return true,
                Err(mpsc::RecvTimeoutError::Timeout) => return false,
                // The supervisor holds a sender itself, so this is unreachable
                // in practice; treat it as shutdown.
                Err(mpsc::RecvTimeoutError::Disconnected) => return true,
            }
        }
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MockMultiplexer;
    use crate::types::health::Health;

    fn supervisor_with(mux: MockMultiplexer) -> Supervisor {
        supervisor_with_boxed(Box::new(mux))
    }

    fn supervisor_with_boxed(mux: Box<dyn Multiplexer>) -> Supervisor {
        let mut settings = Settings::default();
        settings.poll_interval_ms = 5;
        Supervisor::new(mux, settings)
    }

    #[test]
    fn first_poll_seeds_without_events() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        mux.set_capture("work", 0, "esc to interrupt\n");
        let mut sup = supervisor_with(mux);
        let batch = sup.poll().unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].health, Health::Active);
        assert!(batch.events.is_empty());
    }

    /// Mock wrapper that stays mutable from the test after the
    /// supervisor takes ownership.
    struct SharedMock(std::sync::Arc<std::sync::Mutex<MockMultiplexer>>);

    impl Multiplexer for SharedMock {
        fn list_sessions(&self) -> Result<Vec<String>, String> {
            self.0.lock().unwrap().list_sessions()
        }
        fn list_windows(
            &self,
            session: &str,
        ) -> Result<Vec<crate::types::target::WindowInfo>, String> {
            self.0.lock().unwrap().list_windows(session)
        }
        fn capture_pane(
            &self,
            session: &str,
            window: u32,
            lines: u32,
        ) -> Result<Option<String>, String> {
            self.0.lock().unwrap().capture_pane(session, window, lines)
        }
        fn send_keys(&mut self, session: &str, window: u32, text: &str) -> Result<(), String> {
            self.0.lock().unwrap().send_keys(session, window, text)
        }
    }

    #[test]
    fn second_poll_reports_transition() {
        let shared = std::sync::Arc::new(std::sync::Mutex::new(MockMultiplexer::new()));
        {
            let mut mux = shared.lock().unwrap();
            mux.add_session("work", &[(0, "main")]);
            mux.set_capture("work", 0, "esc to interrupt\n");
        }
        let mut sup = supervisor_with_boxed(Box::new(SharedMock(shared.clone())));
        sup.poll().unwrap();

        shared
            .lock()
            .unwrap()
            .set_capture("work", 0, "Continue? [Y/n]\n");
        let batch = sup.poll().unwrap();
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.events[0].previous_health, Health::Active);
        assert_eq!(batch.events[0].new_health, Health::Waiting);
    }

    #[test]
    fn killed_session_surfaces_exited_once() {
        let shared = std::sync::Arc::new(std::sync::Mutex::new(MockMultiplexer::new()));
        {
            let mut mux = shared.lock().unwrap();
            mux.add_session("work", &[(0, "main")]);
            mux.set_capture("work", 0, "esc to interrupt\n");
        }
        let mut sup = supervisor_with_boxed(Box::new(SharedMock(shared.clone())));
        sup.poll().unwrap();

        shared.lock().unwrap().remove_session("work");
        let batch = sup.poll().unwrap();
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.records[0].health, Health::Exited);
        assert_eq!(batch.events.len(), 1);
        assert_eq!(batch.events[0].new_health, Health::Exited);

        // Third pass: the dead target is gone, not reported again.
        let batch = sup.poll().unwrap();
        assert!(batch.records.is_empty());
        assert!(batch.events.is_empty());
    }

    #[test]
    fn approve_requires_a_completed_poll() {
        let sup_err = supervisor_with(MockMultiplexer::new())
            .approve("work:0", &Approval::Option(0))
            .unwrap_err();
        assert!(sup_err.contains("no poll pass"));
    }

    #[test]
    fn approve_unknown_target_fails() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        let mut sup = supervisor_with(mux);
        sup.poll().unwrap();
        let err = sup.approve("other:3", &Approval::Option(0)).unwrap_err();
        assert!(err.contains("not seen in the last poll"));
    }

    #[test]
    fn approve_waiting_target_sends_digit() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(1, "agent")]);
        mux.set_capture("work", 1, "Do you want to apply the patch?\n > 1. Yes\n   2. No\n");
        let mut sup = supervisor_with(mux);
        sup.poll().unwrap();
        let done = sup.approve("work:1", &Approval::Option(0)).unwrap();
        assert_eq!(done.sent, "1");
    }

    #[test]
    fn approve_all_acts_on_last_batch() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "safe"), (1, "danger")]);
        mux.set_capture("work", 0, "Do you want to apply the patch?\n > 1. Yes\n   2. No\n");
        mux.set_capture("work", 1, "Do you want to delete old.py?\n > 1. Yes\n   2. No\n");
        let mut sup = supervisor_with(mux);
        sup.poll().unwrap();
        let outcome = sup.approve_all();
        assert_eq!(outcome.approved.len(), 1);
        assert_eq!(outcome.approved[0].target.key(), "work:0");
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].1, "destructive prompt");
    }

    #[test]
    fn approve_all_without_poll_is_empty() {
        let mut sup = supervisor_with(MockMultiplexer::new());
        let outcome = sup.approve_all();
        assert!(outcome.approved.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn run_stops_on_shutdown() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        let mut sup = supervisor_with(mux);
        let handle = sup.handle();
        handle.shutdown().unwrap();

        let mut batches = 0;
        sup.run(|_| batches += 1).unwrap();
        assert!(batches >= 1, "at least one pass should complete");
    }

    #[test]
    fn handle_approval_processed_between_ticks() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        mux.set_capture("work", 0, "Continue? [Y/n]\n");
        let mut sup = supervisor_with(mux);
        let handle = sup.handle();
        handle
            .approve("work:0", Approval::Text("y".into()))
            .unwrap();
        handle.shutdown().unwrap();
        sup.run(|_| {}).unwrap();
        // The approval was queued before shutdown and the loop drains in
        // order, so the send went through before exit.
    }
}
