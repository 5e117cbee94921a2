// ABOUTME: Status bar widget: renders workspace name, remaining session time, and key hints.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Parameters for rendering the status bar.
pub struct StatusBarParams<'a> {
    pub workspace_name: &'a str,
    /// Remaining-time text, `None` when no session is running.
    pub remaining: Option<&'a str>,
    pub stats_open: bool,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", params.workspace_name),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("| ", dim),
    ];

    match params.remaining {
        Some(text) => spans.push(Span::styled(
            format!("\u{23f1} {} ", text),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled("idle ", dim)),
    }

    spans.push(Span::styled("| ", dim));
    let hint = if params.stats_open {
        "esc close stats · help "
    } else {
        "help · esc quit "
    };
    spans.push(Span::styled(hint, dim));

    Line::from(spans)
}
