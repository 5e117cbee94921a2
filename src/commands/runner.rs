// ABOUTME: Command runner: executes user commands against the session controller and history.
// ABOUTME: Every failure is caught here, shown as a notification, and the command simply returns.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::Command;
use crate::config::Config;
use crate::error::TimerError;
use crate::history::export::{export_path, write_csv};
use crate::history::format_minutes;
use crate::history::report::StatsPage;
use crate::host::{Notifier, PanelRenderer, Prompter};
use crate::session::{EndOutcome, EndReason, SessionController, TimerEvent, session_length};

pub const DURATION_PROMPT: &str = "Enter session duration in mins";
pub const DURATION_PLACEHOLDER: &str = "e.g. 10";
pub const EXPORT_FOLDER_TITLE: &str = "Select folder to export stats to";
pub const EXPORT_NAME_PROMPT: &str = "Enter file name without extension (leave empty for default)";
pub const EXPORT_NAME_PLACEHOLDER: &str = "e.g. pomodoro-stats";

const ALREADY_STARTED: &str =
    "Pomodoro timer already started. Cancel the current session before starting a new one.";
const START_ABORTED: &str = "You need to provide a session duration. Session start cancelled.";
const NOT_STARTED: &str = "Pomodoro timer not started";
const ENDED: &str = "Pomodoro timer ended";
const NO_FOLDER: &str = "No folder selected";
const CLEARED: &str = "Pomodoro stats cleared";

/// Parse a duration typed by the user, in minutes.
pub fn parse_duration(input: &str) -> Result<f64, TimerError> {
    let invalid = || TimerError::InvalidDuration {
        input: input.to_string(),
    };
    let minutes: f64 = input.trim().parse().map_err(|_| invalid())?;
    session_length(minutes).map_err(|_| invalid())?;
    Ok(minutes)
}

/// Dependencies of a [`CommandRunner`].
pub struct RunnerParams {
    pub controller: SessionController,
    pub config: Config,
    pub prompter: Arc<dyn Prompter>,
    pub notifier: Arc<dyn Notifier>,
    pub panel: Arc<dyn PanelRenderer>,
}

/// Runs commands one at a time on behalf of the command loop.
pub struct CommandRunner {
    controller: SessionController,
    config: Config,
    prompter: Arc<dyn Prompter>,
    notifier: Arc<dyn Notifier>,
    panel: Arc<dyn PanelRenderer>,
    stats_open: bool,
}

impl CommandRunner {
    pub fn new(params: RunnerParams) -> Self {
        Self {
            controller: params.controller,
            config: params.config,
            prompter: params.prompter,
            notifier: params.notifier,
            panel: params.panel,
            stats_open: false,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Whether the stats panel is currently shown.
    pub fn stats_open(&self) -> bool {
        self.stats_open
    }

    /// Execute one command to completion.
    pub async fn run(&mut self, command: Command) {
        self.dispatch(command, None).await;
    }

    /// Execute one command, applying timer events from `timers` while it
    /// waits on a prompt.
    pub async fn run_with_timers(
        &mut self,
        command: Command,
        timers: &mut mpsc::UnboundedReceiver<TimerEvent>,
    ) {
        self.dispatch(command, Some(timers)).await;
    }

    async fn dispatch(
        &mut self,
        command: Command,
        timers: Option<&mut mpsc::UnboundedReceiver<TimerEvent>>,
    ) {
        tracing::debug!(command = command.name(), "running command");
        match command {
            Command::StartStandard => self.start_standard(),
            Command::StartCustom => self.start_custom(timers).await,
            Command::Cancel => self.cancel(),
            Command::ShowStats => self.show_stats(),
            Command::ExportStats => self.export_stats(timers).await,
            Command::ClearStats => self.clear_stats(),
        }
    }

    /// Wait for a prompt answer. Timer events that arrive meanwhile are
    /// applied right away so a session can still finish.
    async fn await_prompt<T>(
        &mut self,
        timers: Option<&mut mpsc::UnboundedReceiver<TimerEvent>>,
        answer: impl Future<Output = Option<T>>,
    ) -> Option<T> {
        let Some(timers) = timers else {
            return answer.await;
        };
        tokio::pin!(answer);
        loop {
            tokio::select! {
                reply = &mut answer => return reply,
                Some(event) = timers.recv() => self.handle_timer(event),
            }
        }
    }

    fn start_standard(&mut self) {
        let result = self
            .config
            .default_duration()
            .and_then(|minutes| self.controller.start(minutes).map(|_| minutes));
        match result {
            Ok(minutes) => self.notify_started(minutes),
            Err(TimerError::AlreadyRunning) => self.notifier.error(ALREADY_STARTED),
            Err(e) => self.notifier.error(&e.to_string()),
        }
    }

    async fn start_custom(
        &mut self,
        mut timers: Option<&mut mpsc::UnboundedReceiver<TimerEvent>>,
    ) {
        if self.controller.is_running() {
            self.notifier.error(ALREADY_STARTED);
            return;
        }

        let prompter = Arc::clone(&self.prompter);
        loop {
            let asked = prompter.input_box(DURATION_PROMPT, DURATION_PLACEHOLDER);
            let Some(input) = self.await_prompt(timers.as_deref_mut(), asked).await else {
                self.notifier.error(START_ABORTED);
                return;
            };
            let started = parse_duration(&input)
                .and_then(|minutes| self.controller.start(minutes).map(|_| minutes));
            match started {
                Ok(minutes) => {
                    self.notify_started(minutes);
                    return;
                }
                Err(e @ TimerError::InvalidDuration { .. }) => self.notifier.error(&e.to_string()),
                Err(e) => {
                    self.notifier.error(&e.to_string());
                    return;
                }
            }
        }
    }

    fn notify_started(&self, minutes: f64) {
        self.notifier.info(&format!(
            "Pomodoro timer started ({} min)",
            format_minutes(minutes)
        ));
    }

    fn cancel(&mut self) {
        match self.controller.end(EndReason::Manual) {
            Ok(outcome) => {
                self.notifier.info(ENDED);
                if matches!(outcome, EndOutcome::Recorded(_)) {
                    self.refresh_stats();
                }
            }
            Err(TimerError::NoActiveSession) => self.notifier.error(NOT_STARTED),
            Err(e) => self.notifier.error(&e.to_string()),
        }
    }

    fn show_stats(&mut self) {
        self.stats_open = true;
        self.render_stats();
    }

    /// Regenerate the stats page if the panel is open.
    pub fn refresh_stats(&mut self) {
        if self.stats_open {
            tracing::debug!("regenerating stats page");
            self.render_stats();
        }
    }

    /// Close the stats panel and stop refreshing it.
    pub fn close_stats(&mut self) {
        if self.stats_open {
            self.stats_open = false;
            self.panel.close();
        }
    }

    fn render_stats(&mut self) {
        match self.controller.history().all() {
            Ok(records) => {
                let refresh = Some(self.config.stats.refresh_interval_seconds);
                let page = StatsPage::build(records, refresh);
                self.panel.render(&page);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read history");
                self.notifier.error(&format!("Failed to read stats: {}", e));
            }
        }
    }

    async fn export_stats(
        &mut self,
        mut timers: Option<&mut mpsc::UnboundedReceiver<TimerEvent>>,
    ) {
        let prompter = Arc::clone(&self.prompter);
        let asked = prompter.pick_folder(EXPORT_FOLDER_TITLE);
        let Some(folder) = self.await_prompt(timers.as_deref_mut(), asked).await else {
            self.notifier.error(NO_FOLDER);
            return;
        };
        if !folder.is_dir() {
            self.notifier.error(&format!("Not a folder: {}", folder.display()));
            return;
        }
        let asked = prompter.input_box(EXPORT_NAME_PROMPT, EXPORT_NAME_PLACEHOLDER);
        let name = self.await_prompt(timers, asked).await;
        let path = export_path(&folder, name.as_deref());

        let result = self
            .controller
            .history()
            .all()
            .map_err(anyhow::Error::from)
            .and_then(|records| write_csv(&path, &records).map(|_| records.len()));
        match result {
            Ok(count) => self.notifier.info(&format!(
                "Exported {} sessions to {}",
                count,
                path.display()
            )),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "export failed");
                self.notifier.error(&format!("Failed to export stats: {}", e));
            }
        }
    }

    fn clear_stats(&mut self) {
        match self.controller.history().clear() {
            Ok(()) => {
                self.notifier.info(CLEARED);
                self.refresh_stats();
            }
            Err(e) => self.notifier.error(&format!("Failed to clear stats: {}", e)),
        }
    }

    /// Apply a timer event from the scheduler queue.
    pub fn handle_timer(&mut self, event: TimerEvent) {
        match self.controller.handle_timer(event) {
            Ok(Some(EndOutcome::Recorded(_))) => self.refresh_stats(),
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "failed to finish session");
                self.notifier.error(&e.to_string());
            }
        }
    }

    /// End any running session before the process exits.
    pub fn shutdown(&mut self) {
        match self.controller.shutdown() {
            Ok(Some(outcome)) => tracing::info!(?outcome, "ended session on shutdown"),
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, "failed to end session on shutdown"),
        }
    }
}
