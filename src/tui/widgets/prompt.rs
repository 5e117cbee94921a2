// ABOUTME: Prompt widget: renders the question of a pending modal prompt above the input.
// ABOUTME: Shows the prompt text, its placeholder, and the key hints.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::host::{PendingPrompt, PromptKind};

/// Build the lines for a pending prompt.
pub fn prompt_lines(prompt: &PendingPrompt) -> Vec<Line<'static>> {
    let icon = match prompt.kind {
        PromptKind::Text => "? ",
        PromptKind::Folder => "\u{1f4c1} ",
    };
    let mut title = vec![
        Span::styled(
            icon,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            prompt.prompt.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if !prompt.placeholder.is_empty() {
        title.push(Span::styled(
            format!(" ({})", prompt.placeholder),
            Style::default().fg(Color::DarkGray),
        ));
    }

    vec![
        Line::from(title),
        Line::from(Span::styled(
            "  enter to confirm · esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lines_include_text_and_placeholder() {
        let prompt = PendingPrompt {
            kind: PromptKind::Text,
            prompt: "Enter session duration in mins".to_string(),
            placeholder: "e.g. 10".to_string(),
            initial: String::new(),
            responder: None,
        };
        let lines = prompt_lines(&prompt);
        let text: String = lines[0].spans.iter().map(|s| s.content.to_string()).collect();
        assert!(text.contains("Enter session duration in mins"));
        assert!(text.contains("(e.g. 10)"));
    }

    #[test]
    fn folder_prompt_without_placeholder() {
        let prompt = PendingPrompt {
            kind: PromptKind::Folder,
            prompt: "Select folder".to_string(),
            placeholder: String::new(),
            initial: "/tmp".to_string(),
            responder: None,
        };
        let lines = prompt_lines(&prompt);
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[0].content, "\u{1f4c1} ");
    }
}
