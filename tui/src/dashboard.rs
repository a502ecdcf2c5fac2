//! Dashboard view — the target table, the detail pane for the selected
//! target, and the fleet summary line.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use agentdeck_core::types::health::{Health, HealthRecord};

use crate::theme::Theme;

/// Render the full dashboard into `area`.
pub fn render_dashboard(
    frame: &mut Frame,
    area: Rect,
    records: &[HealthRecord],
    selected: usize,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // target table
            Constraint::Length(8), // detail pane
            Constraint::Length(1), // summary
        ])
        .split(area);

    render_target_table(frame, chunks[0], records, selected, theme);
    render_detail(frame, chunks[1], records.get(selected), theme);
    frame.render_widget(Paragraph::new(summary_line(records)), chunks[2]);
}

/// The target table with a highlighted cursor row.
fn render_target_table(
    frame: &mut Frame,
    area: Rect,
    records: &[HealthRecord],
    selected: usize,
    theme: &Theme,
) {
    let header = Row::new(vec!["", "Target", "State", "Age", "Summary"]).style(theme.header);

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let style = if i == selected {
                theme.selected
            } else {
                theme.health_style(r.health)
            };
            Row::new(vec![
                Cell::from(r.health.icon()),
                Cell::from(r.target.key()),
                Cell::from(r.health.label()),
                Cell::from(format_age(r.last_output_age)),
                Cell::from(r.summary.clone()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(24),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Targets"));

    frame.render_widget(table, area);
}

/// Recent output and prompt options for the selected target.
fn render_detail(frame: &mut Frame, area: Rect, record: Option<&HealthRecord>, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).title("Detail");
    let Some(r) = record else {
        frame.render_widget(Paragraph::new("no target selected").block(block), area);
        return;
    };

    let mut lines: Vec<Line> = r
        .lines
        .iter()
        .map(|l| Line::from(l.clone()))
        .collect();
    if let Some(prompt) = &r.prompt {
        lines.push(Line::from(""));
        let hint = if prompt.destructive {
            "destructive prompt; press the option number to answer"
        } else {
            "press the option number, or 'a' for the selected option"
        };
        lines.push(Line::styled(hint.to_string(), theme.dim));
    }
    for w in &r.warnings {
        lines.push(Line::styled(format!("! {}", w), theme.idle));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One-line fleet summary: counts per state, attention states first.
pub fn summary_line(records: &[HealthRecord]) -> String {
    let count = |h: Health| records.iter().filter(|r| r.health == h).count();
    format!(
        "{} {} error  {} {} waiting  {} {} idle  {} {} active  {} {} exited",
        Health::Error.icon(),
        count(Health::Error),
        Health::Waiting.icon(),
        count(Health::Waiting),
        Health::Idle.icon(),
        count(Health::Idle),
        Health::Active.icon(),
        count(Health::Active),
        Health::Exited.icon(),
        count(Health::Exited),
    )
}

/// Compact age: seconds under a minute, then minutes, then hours.
pub fn format_age(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_core::types::target::Target;

    fn record(health: Health) -> HealthRecord {
        HealthRecord {
            target: Target::new("work", 0),
            health,
            last_output_age: 0,
            summary: String::new(),
            warnings: vec![],
            prompt: None,
            lines: vec![],
        }
    }

    #[test]
    fn format_age_units() {
        assert_eq!(format_age(0), "0s");
        assert_eq!(format_age(59), "59s");
        assert_eq!(format_age(120), "2m");
        assert_eq!(format_age(7200), "2h");
    }

    #[test]
    fn summary_counts_per_state() {
        let records = vec![
            record(Health::Waiting),
            record(Health::Waiting),
            record(Health::Active),
        ];
        let line = summary_line(&records);
        assert!(line.contains("2 waiting"));
        assert!(line.contains("1 active"));
        assert!(line.contains("0 error"));
    }

    #[test]
    fn summary_of_empty_fleet() {
        let line = summary_line(&[]);
        assert!(line.contains("0 waiting"));
    }
}
