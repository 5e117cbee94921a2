// ABOUTME: Stats panel widget: totals and a table of recorded sessions, newest last.
// ABOUTME: Mirrors the generated HTML stats page inside the terminal.

use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row, Table};

use crate::history::report::{display_time, total_minutes};
use crate::history::{HistoryRecord, format_minutes};

/// The two summary lines shown above the table.
pub fn summary_lines(records: &[HistoryRecord]) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    vec![
        Line::from(vec![
            Span::raw("Total number of sessions: "),
            Span::styled(records.len().to_string(), bold),
        ]),
        Line::from(vec![
            Span::raw("Total focused time: "),
            Span::styled(format!("{} min", format_minutes(total_minutes(records))), bold),
        ]),
    ]
}

/// The most recent `rows` records, still oldest first.
pub fn newest(records: &[HistoryRecord], rows: usize) -> &[HistoryRecord] {
    &records[records.len().saturating_sub(rows)..]
}

/// Build the session table.
pub fn stats_table(records: &[HistoryRecord]) -> Table<'static> {
    let header = Row::new(vec!["Workspace", "Duration", "Start", "End"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows = records.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.workspace_name().to_string()),
            Cell::from(format!("{} min", format_minutes(r.duration_minutes()))),
            Cell::from(display_time(r.start_time())),
            Cell::from(display_time(r.end_time())),
        ])
    });

    Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(20),
            Constraint::Length(20),
        ],
    )
    .header(header)
}
