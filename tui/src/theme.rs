//! Color theme — one place mapping health states to ratatui styles.

use ratatui::prelude::*;

use agentdeck_core::types::health::Health;

/// Style set used by the dashboard.
pub struct Theme {
    pub active: Style,
    pub idle: Style,
    pub waiting: Style,
    pub exited: Style,
    pub error: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            active: Style::default().fg(Color::Green),
            idle: Style::default().fg(Color::Yellow),
            waiting: Style::default().fg(Color::Magenta).bold(),
            exited: Style::default().fg(Color::Red),
            error: Style::default().fg(Color::Red).bold(),
            selected: Style::default().bg(Color::DarkGray),
            header: Style::default().bold(),
            dim: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// Style for one health state. Closed mapping over the five states.
    pub fn health_style(&self, health: Health) -> Style {
        match health {
            Health::Active => self.active,
            Health::Idle => self.idle,
            Health::Waiting => self.waiting,
            Health::Exited => self.exited,
            Health::Error => self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waiting_stands_out() {
        let theme = Theme::default();
        let style = theme.health_style(Health::Waiting);
        assert_eq!(style.fg, Some(Color::Magenta));
    }

    #[test]
    fn every_state_has_a_style() {
        let theme = Theme::default();
        for h in [
            Health::Active,
            Health::Idle,
            Health::Waiting,
            Health::Exited,
            Health::Error,
        ] {
            let _ = theme.health_style(h);
        }
    }
}
