// ABOUTME: Host ports: the surfaces the timer core and commands talk to.
// ABOUTME: Status display, notifications, modal prompts, and the stats panel; the TUI bridge implements them.

pub mod channel;

pub use channel::{ChannelHost, NotifyLevel, PendingPrompt, PromptKind, UiEvent};

use std::path::PathBuf;

use async_trait::async_trait;

use crate::history::report::StatsPage;

/// Single-line indicator showing the remaining session time.
pub trait StatusDisplay: Send + Sync {
    fn set_text(&self, text: &str);
    fn hide(&self);
}

/// User-visible notifications.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Modal prompts. Each call suspends the caller until the user answers;
/// `None` means the prompt was cancelled.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn input_box(&self, prompt: &str, placeholder: &str) -> Option<String>;
    async fn pick_folder(&self, title: &str) -> Option<PathBuf>;
}

/// Displays the stats page.
pub trait PanelRenderer: Send + Sync {
    fn render(&self, page: &StatsPage);
    fn close(&self);
}
