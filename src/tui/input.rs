// ABOUTME: Keyboard input handling for the TUI: translates key events into actions.
// ABOUTME: Handles the command input, modal prompts, and dismissing the stats panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::commands::Command;
use crate::host::NotifyLevel;
use crate::tui::state::TuiState;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed.
    None,
    /// User invoked a command.
    Command(Command),
    /// User answered or cancelled the pending prompt.
    PromptResolved,
    /// User dismissed the stats panel.
    CloseStats,
    /// User wants to quit.
    Quit,
}

/// Process a key event against the current TUI state and return the resulting action.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputResult::Quit;
    }

    // PageUp/PageDown always scroll, regardless of mode.
    if handle_scroll_key(state, key.code) {
        return InputResult::None;
    }

    if state.has_pending_prompt() {
        return handle_prompt_key(state, key);
    }

    match key.code {
        KeyCode::Enter => submit_command(state),
        // The panel is hidden once the close request reaches the command loop.
        KeyCode::Esc if state.stats_visible() => InputResult::CloseStats,
        KeyCode::Esc => InputResult::Quit,
        KeyCode::Up => {
            state.scroll_offset = state.scroll_offset.saturating_add(1);
            InputResult::None
        }
        KeyCode::Down => {
            state.scroll_offset = state.scroll_offset.saturating_sub(1);
            InputResult::None
        }
        _ => {
            edit_input(state, key.code);
            InputResult::None
        }
    }
}

fn handle_scroll_key(state: &mut TuiState, key: KeyCode) -> bool {
    match key {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            true
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            true
        }
        _ => false,
    }
}

/// Handle key events while a prompt is waiting for an answer.
fn handle_prompt_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Enter => {
            let answer = state.input.clone();
            state.resolve_prompt(Some(answer));
            InputResult::PromptResolved
        }
        KeyCode::Esc => {
            state.resolve_prompt(None);
            InputResult::PromptResolved
        }
        code => {
            edit_input(state, code);
            InputResult::None
        }
    }
}

/// Turn the submitted input into a command, or explain why it isn't one.
fn submit_command(state: &mut TuiState) -> InputResult {
    let Some(text) = state.submit_input() else {
        return InputResult::None;
    };
    match text.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return InputResult::Quit,
        "help" | "?" => {
            for cmd in Command::ALL {
                state.push_notification(
                    NotifyLevel::Info,
                    format!("{:<7} {}", cmd.name(), cmd.description()),
                );
            }
            return InputResult::None;
        }
        _ => {}
    }
    match Command::parse(&text) {
        Some(cmd) => InputResult::Command(cmd),
        None => {
            state.push_notification(
                NotifyLevel::Error,
                format!("Unknown command '{}'. Type 'help' for the list.", text),
            );
            InputResult::None
        }
    }
}

fn edit_input(state: &mut TuiState, code: KeyCode) {
    match code {
        KeyCode::Char(c) => state.insert_char_at_cursor(c),
        KeyCode::Backspace => state.backspace_char(),
        KeyCode::Delete => state.delete_char_at_cursor(),
        KeyCode::Left => state.move_cursor_left(),
        KeyCode::Right => state.move_cursor_right(),
        KeyCode::Home => state.move_cursor_home(),
        KeyCode::End => state.move_cursor_end(),
        _ => {}
    }
}
