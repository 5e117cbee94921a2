// ABOUTME: Notification log widget: renders info and error notifications with timestamps.
// ABOUTME: Pure function from notifications to styled ratatui Lines.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::host::NotifyLevel;
use crate::tui::state::Notification;

/// Shown when nothing has happened yet.
pub const WELCOME: &str = "Type 'start' for a standard session, 'custom' to pick a length, or 'help'.";

/// Convert the notification log into styled lines for rendering.
pub fn notification_lines(notifications: &[Notification]) -> Vec<Line<'static>> {
    if notifications.is_empty() {
        return vec![Line::from(Span::styled(
            WELCOME,
            Style::default().fg(Color::DarkGray),
        ))];
    }

    notifications
        .iter()
        .map(|n| {
            let (marker, style) = match n.level {
                NotifyLevel::Info => ("\u{2022} ", Style::default().fg(Color::Green)),
                NotifyLevel::Error => (
                    "\u{2717} ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", n.at.format("%H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(marker, style),
                Span::raw(n.message.clone()),
            ])
        })
        .collect()
}
