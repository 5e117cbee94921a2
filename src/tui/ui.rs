// ABOUTME: Main TUI rendering function: assembles header, notifications, stats, prompt, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::history::HistoryRecord;
use crate::tui::state::TuiState;
use crate::tui::widgets::notifications::notification_lines;
use crate::tui::widgets::prompt::prompt_lines;
use crate::tui::widgets::stats::{newest, stats_table, summary_lines};
use crate::tui::widgets::status::{StatusBarParams, status_line};

/// Tallest the stats panel grows to, borders included.
const MAX_STATS_HEIGHT: u16 = 14;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    let has_prompt = state.has_pending_prompt();

    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Min(3),    // Notification log
    ];
    if let Some(ref records) = state.stats {
        // 2 summary lines + table header + rows + 2 borders
        let wanted = u16::try_from(records.len())
            .unwrap_or(u16::MAX)
            .saturating_add(5);
        constraints.push(Constraint::Length(wanted.clamp(6, MAX_STATS_HEIGHT)));
    }
    if has_prompt {
        constraints.push(Constraint::Length(2));
    }
    constraints.push(Constraint::Length(3)); // Input
    constraints.push(Constraint::Length(1)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = 0;
    let mut take = || {
        let chunk = chunks[next];
        next += 1;
        chunk
    };

    // Header
    let header = Line::from(Span::styled(
        " pomo",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header), take());

    // Notification log
    let log_chunk = take();
    let log_paragraph =
        Paragraph::new(notification_lines(&state.notifications)).wrap(Wrap { trim: false });
    let total_lines = log_paragraph.line_count(log_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(log_chunk.height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }
    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(log_paragraph.scroll((scroll, 0)), log_chunk);

    if let Some(ref records) = state.stats {
        render_stats(frame, records, take());
    }

    if let Some(ref prompt) = state.pending_prompt {
        frame.render_widget(Paragraph::new(prompt_lines(prompt)), take());
    }

    // Input area
    let input_chunk = take();
    let border_style = if has_prompt {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default()
    };
    let input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(border_style);

    let placeholder = state
        .pending_prompt
        .as_ref()
        .map(|p| p.placeholder.as_str())
        .filter(|_| state.input.is_empty());
    let input_line = match placeholder {
        Some(text) => Span::styled(text.to_string(), Style::default().fg(Color::DarkGray)),
        None => Span::raw(state.input.clone()),
    };
    frame.render_widget(Paragraph::new(input_line).block(input_block), input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();
        let prefix: String = state.input.chars().take(state.cursor_pos).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());
        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col) as u16);
        // +1 for the top border.
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        workspace_name: &state.workspace_name,
        remaining: state.status.as_deref(),
        stats_open: state.stats.is_some(),
    });
    frame.render_widget(Paragraph::new(status), take());
}

fn render_stats(frame: &mut Frame, records: &[HistoryRecord], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            " Pomodoro Stats ",
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);
    frame.render_widget(Paragraph::new(summary_lines(records)), parts[0]);
    // One line goes to the table header.
    let rows = usize::from(parts[1].height.saturating_sub(1));
    frame.render_widget(stats_table(newest(records, rows)), parts[1]);
}
