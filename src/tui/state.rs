// ABOUTME: TUI state types: notifications, status text, command input buffer, prompt and stats panel.
// ABOUTME: Applies UiEvents from the command loop and defines the UserEvents sent back to it.

use chrono::{DateTime, Local};

use crate::commands::Command;
use crate::history::HistoryRecord;
use crate::host::{NotifyLevel, PendingPrompt, UiEvent};

/// Events sent from the TUI to the command loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEvent {
    /// Run a command.
    Command(Command),
    /// The user dismissed the stats panel.
    CloseStats,
    /// User requested to quit.
    Quit,
}

/// One line in the notification log.
#[derive(Debug)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    pub at: DateTime<Local>,
}

/// Oldest notifications are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 500;

/// Full TUI application state.
pub struct TuiState {
    pub notifications: Vec<Notification>,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    /// Remaining-time text; `None` while the indicator is hidden.
    pub status: Option<String>,
    pub pending_prompt: Option<PendingPrompt>,
    /// Rows of the stats panel; `None` while the panel is closed.
    pub stats: Option<Vec<HistoryRecord>>,
    pub workspace_name: String,
}

impl TuiState {
    /// Create a new empty TUI state for the given workspace.
    pub fn new(workspace_name: String) -> Self {
        Self {
            notifications: Vec::new(),
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            status: None,
            pending_prompt: None,
            stats: None,
            workspace_name,
        }
    }

    /// Add a notification and reset scroll to bottom.
    pub fn push_notification(&mut self, level: NotifyLevel, message: String) {
        self.notifications.push(Notification {
            level,
            message,
            at: Local::now(),
        });
        if self.notifications.len() > MAX_NOTIFICATIONS {
            let excess = self.notifications.len() - MAX_NOTIFICATIONS;
            self.notifications.drain(..excess);
        }
        self.scroll_offset = 0;
    }

    /// Apply an event from the command loop.
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Status(text) => self.status = text,
            UiEvent::Notify { level, message } => self.push_notification(level, message),
            UiEvent::Prompt(prompt) => {
                // A new prompt replaces anything half-typed at the command input.
                if let Some(mut stale) = self.pending_prompt.take() {
                    stale.resolve(None);
                }
                self.input = prompt.initial.clone();
                self.cursor_pos = self.input_char_len();
                self.pending_prompt = Some(prompt);
            }
            UiEvent::Stats { records, open } => {
                if open || self.stats.is_some() {
                    self.stats = Some(records);
                }
            }
            UiEvent::CloseStats => self.stats = None,
        }
    }

    /// Answer the pending prompt (`None` cancels it) and clear the input.
    pub fn resolve_prompt(&mut self, answer: Option<String>) {
        if let Some(mut prompt) = self.pending_prompt.take() {
            prompt.resolve(answer);
        }
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Submit the current input buffer. Returns the trimmed text if non-empty.
    pub fn submit_input(&mut self) -> Option<String> {
        let trimmed = self.input.trim().to_string();
        if trimmed.is_empty() {
            return None;
        }
        self.input.clear();
        self.cursor_pos = 0;
        Some(trimmed)
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    /// Move cursor one character to the left.
    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    /// Move cursor one character to the right.
    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to start of input.
    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    /// Move cursor to end of input.
    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }

    /// Whether a modal prompt is waiting for an answer.
    pub fn has_pending_prompt(&self) -> bool {
        self.pending_prompt.is_some()
    }

    /// Whether the stats panel is shown.
    pub fn stats_visible(&self) -> bool {
        self.stats.is_some()
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
