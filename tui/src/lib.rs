//! adk-tui — full-screen dashboard for agentdeck.
//!
//! Renders the supervision engine's poll batches as a ratatui dashboard:
//! a priority-sorted target table, a detail pane for the selected target,
//! transition banners, and one-key approval dispatch.
//!
//! # Modules
//!
//! - [`app`] — cursor state machine and key-to-action mapping
//! - [`dashboard`] — target table, detail pane, fleet summary
//! - [`notification`] — transient transition and dispatch banners
//! - [`theme`] — health-state color mapping
//! - [`tui`] — terminal setup and the event loop

pub mod app;
pub mod dashboard;
pub mod notification;
pub mod theme;
pub mod tui;
