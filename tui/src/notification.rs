//! Notification center — transient banners for transitions and dispatch
//! results.
//!
//! Notifications expire on their own after a time-to-live, or sooner when
//! the operator dismisses them. The center keeps a bounded backlog so a
//! noisy fleet cannot grow memory without limit.

use agentdeck_core::types::health::{Health, TransitionEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationType,
    pub message: String,
    pub created_ms: u64,
    /// None means the notification stays until dismissed.
    pub ttl_ms: Option<u64>,
}

impl Notification {
    fn expired(&self, now_ms: u64) -> bool {
        match self.ttl_ms {
            Some(ttl) => now_ms.saturating_sub(self.created_ms) >= ttl,
            None => false,
        }
    }
}

pub struct NotificationCenter {
    items: Vec<Notification>,
    capacity: usize,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        NotificationCenter {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, kind: NotificationType, message: &str, now_ms: u64, ttl_ms: Option<u64>) {
        self.items.push(Notification {
            kind,
            message: message.to_string(),
            created_ms: now_ms,
            ttl_ms,
        });
        if self.items.len() > self.capacity {
            let overflow = self.items.len() - self.capacity;
            self.items.drain(..overflow);
        }
    }

    /// Record one health transition as a banner. Transitions into states
    /// needing attention get warning/error weight.
    pub fn push_transition(&mut self, event: &TransitionEvent, now_ms: u64) {
        let kind = match event.new_health {
            Health::Error | Health::Exited => NotificationType::Error,
            Health::Waiting => NotificationType::Warning,
            Health::Active | Health::Idle => NotificationType::Info,
        };
        let message = format!(
            "{} {}: {} -> {}  {}",
            event.new_health.icon(),
            event.target.key(),
            event.previous_health.label(),
            event.new_health.label(),
            event.summary
        );
        self.push(kind, &message, now_ms, Some(8000));
    }

    /// Drop everything past its time-to-live.
    pub fn expire(&mut self, now_ms: u64) {
        self.items.retain(|n| !n.expired(now_ms));
    }

    /// The newest live notification, for the banner line.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Dismiss the newest notification.
    pub fn dismiss_latest(&mut self) {
        self.items.pop();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
