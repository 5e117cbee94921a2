// ABOUTME: Channel-backed host: implements every host port by posting UiEvents to the TUI.
// ABOUTME: Prompts carry a oneshot responder the TUI resolves when the user answers or cancels.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use super::{Notifier, PanelRenderer, Prompter, StatusDisplay};
use crate::history::HistoryRecord;
use crate::history::report::StatsPage;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Error,
}

/// What a pending prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Free text, e.g. a duration or file name.
    Text,
    /// A destination directory.
    Folder,
}

/// A modal prompt waiting for the user.
#[derive(Debug)]
pub struct PendingPrompt {
    pub kind: PromptKind,
    pub prompt: String,
    pub placeholder: String,
    /// Text the input starts with.
    pub initial: String,
    /// Sends the answer back; `None` when cancelled.
    pub responder: Option<oneshot::Sender<Option<String>>>,
}

impl PendingPrompt {
    /// Resolve the prompt. Later calls are no-ops.
    pub fn resolve(&mut self, answer: Option<String>) {
        if let Some(tx) = self.responder.take() {
            let _ = tx.send(answer);
        }
    }
}

/// Events sent from the command loop to the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// New status text, or `None` to hide the indicator.
    Status(Option<String>),
    Notify { level: NotifyLevel, message: String },
    Prompt(PendingPrompt),
    /// Stats rows. `open` is set when the panel was just requested; refreshes
    /// only update a panel that is already visible.
    Stats {
        records: Vec<HistoryRecord>,
        open: bool,
    },
    CloseStats,
}

/// Host implementation that forwards everything to the TUI over a channel.
#[derive(Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<UiEvent>,
    stats_html_path: Option<PathBuf>,
    default_folder: PathBuf,
    panel_open: Arc<AtomicBool>,
}

impl ChannelHost {
    pub fn new(tx: mpsc::UnboundedSender<UiEvent>) -> Self {
        Self {
            tx,
            stats_html_path: None,
            default_folder: PathBuf::from("."),
            panel_open: Default::default(),
        }
    }

    /// Also write each rendered stats page to `path`.
    pub fn with_stats_html_path(mut self, path: PathBuf) -> Self {
        self.stats_html_path = Some(path);
        self
    }

    /// Folder the folder prompt starts at.
    pub fn with_default_folder(mut self, folder: PathBuf) -> Self {
        self.default_folder = folder;
        self
    }

    fn send(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("ui channel closed, dropping event");
        }
    }

    async fn ask(
        &self,
        kind: PromptKind,
        prompt: &str,
        placeholder: &str,
        initial: String,
    ) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        self.send(UiEvent::Prompt(PendingPrompt {
            kind,
            prompt: prompt.to_string(),
            placeholder: placeholder.to_string(),
            initial,
            responder: Some(tx),
        }));
        rx.await.ok().flatten()
    }

    fn write_stats_html(&self, html: &str) {
        let Some(ref path) = self.stats_html_path else {
            return;
        };
        let result = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|_| std::fs::write(path, html));
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "failed to write stats page");
        }
    }
}

impl StatusDisplay for ChannelHost {
    fn set_text(&self, text: &str) {
        self.send(UiEvent::Status(Some(text.to_string())));
    }

    fn hide(&self) {
        self.send(UiEvent::Status(None));
    }
}

impl Notifier for ChannelHost {
    fn info(&self, message: &str) {
        tracing::info!(text = message, "notify");
        self.send(UiEvent::Notify {
            level: NotifyLevel::Info,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        tracing::warn!(text = message, "notify error");
        self.send(UiEvent::Notify {
            level: NotifyLevel::Error,
            message: message.to_string(),
        });
    }
}

#[async_trait]
impl Prompter for ChannelHost {
    async fn input_box(&self, prompt: &str, placeholder: &str) -> Option<String> {
        self.ask(PromptKind::Text, prompt, placeholder, String::new()).await
    }

    async fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        let initial = self.default_folder.to_string_lossy().to_string();
        let answer = self
            .ask(PromptKind::Folder, title, "e.g. ~/Documents", initial)
            .await?;
        let trimmed = answer.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(expand_home(trimmed))
    }
}

impl PanelRenderer for ChannelHost {
    fn render(&self, page: &StatsPage) {
        self.write_stats_html(&page.html);
        let open = !self.panel_open.swap(true, Ordering::SeqCst);
        self.send(UiEvent::Stats {
            records: page.records.clone(),
            open,
        });
    }

    fn close(&self) {
        self.panel_open.store(false, Ordering::SeqCst);
        self.send(UiEvent::CloseStats);
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
