//! In-memory `Multiplexer` for tests.
//!
//! Holds preset sessions, windows, and pane captures, records every
//! `send_keys`, and can inject failures per target. Used by the engine's
//! unit tests and the scenario tests.

use std::collections::{HashMap, HashSet};

use crate::types::target::WindowInfo;

use super::Multiplexer;

/// One recorded `send_keys` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentKeys {
    pub session: String,
    pub window: u32,
    pub text: String,
}

#[derive(Default)]
pub struct MockMultiplexer {
    sessions: Vec<String>,
    windows: HashMap<String, Vec<WindowInfo>>,
    captures: HashMap<String, String>,
    capture_failures: HashSet<String>,
    send_failures: HashSet<String>,
    sent: Vec<SentKeys>,
}

impl MockMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session with the given `(index, name)` windows.
    pub fn add_session(&mut self, name: &str, windows: &[(u32, &str)]) {
        if !self.sessions.iter().any(|s| s == name) {
            self.sessions.push(name.to_string());
        }
        let infos = windows
            .iter()
            .map(|(index, wname)| WindowInfo {
                index: *index,
                name: wname.to_string(),
                pane_count: 1,
            })
            .collect();
        self.windows.insert(name.to_string(), infos);
    }

    /// Set the capture text served for one target.
    pub fn set_capture(&mut self, session: &str, window: u32, text: &str) {
        self.captures
            .insert(key(session, window), text.to_string());
    }

    /// Drop a whole session, as if it was killed between polls.
    pub fn remove_session(&mut self, name: &str) {
        self.sessions.retain(|s| s != name);
        self.windows.remove(name);
        self.captures.retain(|k, _| !k.starts_with(&format!("{}:", name)));
    }

    /// Make the next and every later capture of one target fail.
    pub fn fail_capture(&mut self, session: &str, window: u32) {
        self.capture_failures.insert(key(session, window));
    }

    /// Make `send_keys` to one target fail.
    pub fn fail_send(&mut self, session: &str, window: u32) {
        self.send_failures.insert(key(session, window));
    }

    /// Every `send_keys` call so far, in order.
    pub fn sent_keys(&self) -> &[SentKeys] {
        &self.sent
    }

    fn target_exists(&self, session: &str, window: u32) -> bool {
        self.windows
            .get(session)
            .is_some_and(|ws| ws.iter().any(|w| w.index == window))
    }
}

fn key(session: &str, window: u32) -> String {
    format!("{}:{}", session, window)
}

impl Multiplexer for MockMultiplexer {
    fn list_sessions(&self) -> Result<Vec<String>, String> {
        Ok(self.sessions.clone())
    }

    fn list_windows(&self, session: &str) -> Result<Vec<WindowInfo>, String> {
        Ok(self.windows.get(session).cloned().unwrap_or_default())
    }

    fn capture_pane(
        &self,
        session: &str,
        window: u32,
        _lines: u32,
    ) -> Result<Option<String>, String> {
        let k = key(session, window);
        if self.capture_failures.contains(&k) {
            return Err(format!("capture failed for '{}'", k));
        }
        if !self.target_exists(session, window) {
            return Ok(None);
        }
        Ok(Some(self.captures.get(&k).cloned().unwrap_or_default()))
    }

    fn send_keys(&mut self, session: &str, window: u32, text: &str) -> Result<(), String> {
        let k = key(session, window);
        if self.send_failures.contains(&k) {
            return Err(format!("send-keys failed for '{}'", k));
        }
        self.sent.push(SentKeys {
            session: session.to_string(),
            window,
            text: text.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_registered_state() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main"), (1, "agent")]);
        mux.set_capture("work", 1, "hello\n");

        assert_eq!(mux.list_sessions().unwrap(), vec!["work"]);
        assert_eq!(mux.list_windows("work").unwrap().len(), 2);
        assert_eq!(
            mux.capture_pane("work", 1, 100).unwrap().unwrap(),
            "hello\n"
        );
    }

    #[test]
    fn missing_target_captures_as_none() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        assert_eq!(mux.capture_pane("work", 9, 100).unwrap(), None);
        assert_eq!(mux.capture_pane("gone", 0, 100).unwrap(), None);
    }

    #[test]
    fn existing_target_without_preset_capture_is_empty() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        assert_eq!(mux.capture_pane("work", 0, 100).unwrap().unwrap(), "");
    }

    #[test]
    fn injected_capture_failure() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        mux.fail_capture("work", 0);
        assert!(mux.capture_pane("work", 0, 100).is_err());
    }

    #[test]
    fn records_sends_in_order() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        mux.send_keys("work", 0, "1").unwrap();
        mux.send_keys("work", 0, "y").unwrap();
        let sent = mux.sent_keys();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].text, "1");
        assert_eq!(sent[1].text, "y");
    }

    #[test]
    fn remove_session_clears_everything() {
        let mut mux = MockMultiplexer::new();
        mux.add_session("work", &[(0, "main")]);
        mux.set_capture("work", 0, "x");
        mux.remove_session("work");
        assert!(mux.list_sessions().unwrap().is_empty());
        assert_eq!(mux.capture_pane("work", 0, 100).unwrap(), None);
    }
}
