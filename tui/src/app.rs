//! Application state machine for the dashboard.
//!
//! Keeps the cursor and translates keys into actions; it never touches
//! the terminal or the supervisor, so every transition is unit-testable.

/// Abstracted key input, decoupled from crossterm's event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Esc,
    Other,
}

/// Action the runner should take in response to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    /// Force a poll pass now.
    Refresh,
    /// Approve the selected target with its prompt's selected option.
    ApproveSelected,
    /// Approve the selected target with a zero-based option index.
    ApproveOption(usize),
    ApproveAll,
    DismissNotification,
}

pub struct App {
    /// Cursor row into the current record batch.
    pub selected: usize,
}

impl App {
    pub fn new() -> Self {
        App { selected: 0 }
    }

    /// Handle one key against a batch of `row_count` records.
    ///
    /// Selection movement is handled internally and returns `None`;
    /// everything else becomes an action for the runner.
    pub fn handle_key(&mut self, key: Key, row_count: usize) -> Option<AppAction> {
        match key {
            Key::Char('q') => Some(AppAction::Quit),
            Key::Char('r') => Some(AppAction::Refresh),
            Key::Char('a') => Some(AppAction::ApproveSelected),
            Key::Char('A') => Some(AppAction::ApproveAll),
            Key::Char('i') | Key::Esc => Some(AppAction::DismissNotification),
            Key::Char(c) if c.is_ascii_digit() && c != '0' => {
                Some(AppAction::ApproveOption(c as usize - '1' as usize))
            }
            Key::Char('j') | Key::Down => {
                if row_count > 0 && self.selected + 1 < row_count {
                    self.selected += 1;
                }
                None
            }
            Key::Char('k') | Key::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            _ => None,
        }
    }

    /// Keep the cursor inside a batch that may have shrunk.
    pub fn clamp_selection(&mut self, row_count: usize) {
        if row_count == 0 {
            self.selected = 0;
        } else if self.selected >= row_count {
            self.selected = row_count - 1;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
