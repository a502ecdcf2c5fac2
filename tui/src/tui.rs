//! TUI runner — ratatui event loop with terminal setup and cleanup.
//!
//! The [`Tui`] owns the terminal, the cursor state machine ([`App`]), the
//! notification center, and the supervisor itself: the dashboard polls in
//! the same thread between keyboard events, so a pass can never race a
//! dispatch.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;

use agentdeck_core::dispatch::Approval;
use agentdeck_core::monitor::Supervisor;
use agentdeck_core::types::health::HealthRecord;

use crate::app::{App, AppAction, Key};
use crate::dashboard;
use crate::notification::{NotificationCenter, NotificationType};
use crate::theme::Theme;

pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    app: App,
    supervisor: Supervisor,
    theme: Theme,
    notifications: NotificationCenter,
    poll_interval: Duration,
    last_poll: Instant,
}

impl Tui {
    /// Create a new TUI, entering raw mode and the alternate screen.
    pub fn new(supervisor: Supervisor) -> Result<Self, String> {
        terminal::enable_raw_mode().map_err(|e| format!("Failed to enter raw mode: {}", e))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal =
            Terminal::new(backend).map_err(|e| format!("Failed to create terminal: {}", e))?;

        let poll_interval = Duration::from_millis(supervisor.settings().poll_interval_ms.max(100));
        Ok(Self {
            terminal,
            app: App::new(),
            supervisor,
            theme: Theme::default(),
            notifications: NotificationCenter::new(50),
            poll_interval,
            last_poll: Instant::now(),
        })
    }

    /// Run the event loop until quit is requested. The terminal is
    /// restored before returning, whichever way the loop ends.
    pub fn run(&mut self) -> Result<(), String> {
        let outcome = self.event_loop();
        let restored = self.shutdown();
        outcome.and(restored)
    }

    fn event_loop(&mut self) -> Result<(), String> {
        self.do_poll();

        loop {
            self.notifications.expire(now_ms());
            let records = self.current_records();
            self.draw(&records)?;

            let timeout = self
                .poll_interval
                .checked_sub(self.last_poll.elapsed())
                .unwrap_or(Duration::ZERO);

            let has_event =
                event::poll(timeout).map_err(|e| format!("Event poll failed: {}", e))?;
            if has_event {
                let ev = event::read().map_err(|e| format!("Event read failed: {}", e))?;
                if let Event::Key(key_event) = ev {
                    if key_event.code == KeyCode::Char('c')
                        && key_event.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        break;
                    }
                    let key = crossterm_to_key(key_event.code);
                    if let Some(action) = self.app.handle_key(key, records.len()) {
                        if self.handle_action(action, &records) {
                            break;
                        }
                    }
                }
            }

            if self.last_poll.elapsed() >= self.poll_interval {
                self.do_poll();
            }
        }

        Ok(())
    }

    fn draw(&mut self, records: &[HealthRecord]) -> Result<(), String> {
        let theme = &self.theme;
        let app = &self.app;
        let notifications = &self.notifications;
        self.terminal
            .draw(|frame| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(5), Constraint::Length(1)])
                    .split(frame.area());

                dashboard::render_dashboard(frame, chunks[0], records, app.selected, theme);

                let banner = match notifications.latest() {
                    Some(n) => {
                        let style = match n.kind {
                            NotificationType::Info => theme.dim,
                            NotificationType::Warning => theme.waiting,
                            NotificationType::Error => theme.error,
                        };
                        Paragraph::new(n.message.clone()).style(style)
                    }
                    None => Paragraph::new(
                        "j/k select  a approve  1-9 option  A approve all  r refresh  q quit",
                    )
                    .style(theme.dim),
                };
                frame.render_widget(banner, chunks[1]);
            })
            .map_err(|e| format!("Draw failed: {}", e))?;
        Ok(())
    }

    /// Handle an action from the state machine. Returns true on quit.
    fn handle_action(&mut self, action: AppAction, records: &[HealthRecord]) -> bool {
        match action {
            AppAction::Quit => return true,
            AppAction::Refresh => self.do_poll(),
            AppAction::DismissNotification => self.notifications.dismiss_latest(),
            AppAction::ApproveSelected => {
                if let Some(record) = records.get(self.app.selected) {
                    let approval = match &record.prompt {
                        Some(prompt) => Approval::Option(prompt.selected_index),
                        None => Approval::Text("y".into()),
                    };
                    self.approve(&record.target.key(), approval);
                }
            }
            AppAction::ApproveOption(index) => {
                if let Some(record) = records.get(self.app.selected) {
                    self.approve(&record.target.key(), Approval::Option(index));
                }
            }
            AppAction::ApproveAll => {
                let outcome = self.supervisor.approve_all();
                let message = format!(
                    "approved {} target(s), skipped {}",
                    outcome.approved.len(),
                    outcome.skipped.len()
                );
                let kind = if outcome.skipped.is_empty() {
                    NotificationType::Info
                } else {
                    NotificationType::Warning
                };
                self.notifications.push(kind, &message, now_ms(), Some(5000));
                self.do_poll();
            }
        }
        false
    }

    fn approve(&mut self, key: &str, approval: Approval) {
        match self.supervisor.approve(key, &approval) {
            Ok(done) => {
                self.notifications.push(
                    NotificationType::Info,
                    &format!("sent '{}' to {}", done.sent, done.target.key()),
                    now_ms(),
                    Some(5000),
                );
                self.do_poll();
            }
            Err(e) => {
                self.notifications
                    .push(NotificationType::Error, &e, now_ms(), Some(8000));
            }
        }
    }

    fn do_poll(&mut self) {
        self.last_poll = Instant::now();
        match self.supervisor.poll() {
            Ok(batch) => {
                let events = batch.events.clone();
                let count = batch.records.len();
                let now = now_ms();
                for event in &events {
                    self.notifications.push_transition(event, now);
                }
                self.app.clamp_selection(count);
            }
            Err(e) => {
                self.notifications.push(
                    NotificationType::Error,
                    &format!("poll failed: {}", e),
                    now_ms(),
                    Some(8000),
                );
            }
        }
    }

    fn current_records(&self) -> Vec<HealthRecord> {
        self.supervisor
            .last_batch()
            .map(|b| b.records.clone())
            .unwrap_or_default()
    }

    /// Leave the alternate screen and restore the terminal.
    fn shutdown(&mut self) -> Result<(), String> {
        terminal::disable_raw_mode().map_err(|e| format!("Failed to leave raw mode: {}", e))?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;
        self.terminal
            .show_cursor()
            .map_err(|e| format!("Failed to restore cursor: {}", e))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
    }
}

fn crossterm_to_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Esc => Key::Esc,
        _ => Key::Other,
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
