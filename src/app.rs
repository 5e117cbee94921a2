// ABOUTME: App orchestrator: wires together the history store, session controller, command loop, and TUI.
// ABOUTME: Also hosts the headless stats/export/clear entry points used by the CLI subcommands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::commands::{CommandRunner, RunnerParams, run_command_loop};
use crate::config::Config;
use crate::history::export::{export_path, write_csv};
use crate::history::report::{display_time, render_stats_html, total_minutes};
use crate::history::{HistoryLog, format_minutes};
use crate::host::{ChannelHost, UiEvent};
use crate::session::{ControllerParams, SessionController, SystemClock, TokioScheduler};
use crate::store::JsonFileStore;
use crate::tui::{self, TuiChannels, UserEvent};

/// Top-level application that orchestrates all subsystems.
pub struct App {
    config: Config,
    store_path: PathBuf,
    cwd: PathBuf,
}

impl App {
    /// Create a new app with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store_path: Config::store_path(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Use a different history file.
    pub fn with_store_path(mut self, path: PathBuf) -> Self {
        self.store_path = path;
        self
    }

    fn open_history(&self) -> anyhow::Result<HistoryLog> {
        let store = JsonFileStore::open(&self.store_path)?;
        Ok(HistoryLog::new(Arc::new(store)))
    }

    /// Run the interactive application: spawn the command loop and drive the TUI.
    pub async fn run(self) -> anyhow::Result<()> {
        let history = self.open_history()?;
        let workspace_name = self.config.workspace_name(&self.cwd);

        let (user_tx, user_rx) = mpsc::channel::<UserEvent>(16);
        let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
        let (scheduler, timer_rx) = TokioScheduler::new();

        let host = Arc::new(
            ChannelHost::new(ui_tx)
                .with_stats_html_path(Config::stats_page_path())
                .with_default_folder(self.cwd.clone()),
        );

        let controller = SessionController::new(ControllerParams {
            history,
            clock: Arc::new(SystemClock),
            scheduler: Box::new(scheduler),
            status: host.clone(),
            notifier: host.clone(),
            workspace_name: workspace_name.clone(),
            refresh_interval: self.config.refresh_interval(),
        });

        let stats_refresh = self.config.stats_refresh_interval();
        let runner = CommandRunner::new(RunnerParams {
            controller,
            config: self.config,
            prompter: host.clone(),
            notifier: host.clone(),
            panel: host,
        });

        tracing::info!(workspace = %workspace_name, "starting pomo");
        let loop_handle = tokio::spawn(run_command_loop(runner, user_rx, timer_rx, stats_refresh));

        let user_tx_for_quit = user_tx.clone();
        let result = tui::run(workspace_name, TuiChannels { user_tx, ui_rx }).await;

        // Signal the command loop to quit and wait for it to end any session.
        let _ = user_tx_for_quit.send(UserEvent::Quit).await;
        drop(user_tx_for_quit);
        let runner = loop_handle.await?;

        if result.is_ok() {
            print_exit_screen(&runner);
        }
        result.map(|_| ())
    }

    /// Print the history table to stdout, optionally writing the HTML page too.
    pub fn print_stats(&self, html: Option<&Path>) -> anyhow::Result<()> {
        let records = self.open_history()?.all()?;

        println!(
            "{:<20} {:>10}  {:<19}  {:<19}",
            "Workspace", "Duration", "Start", "End"
        );
        for record in &records {
            println!(
                "{:<20} {:>10}  {:<19}  {:<19}",
                record.workspace_name(),
                format!("{} min", format_minutes(record.duration_minutes())),
                display_time(record.start_time()),
                display_time(record.end_time()),
            );
        }
        println!();
        println!("Total number of sessions: {}", records.len());
        println!(
            "Total focused time: {} min",
            format_minutes(total_minutes(&records))
        );

        if let Some(path) = html {
            std::fs::write(path, render_stats_html(&records, None))?;
            println!("Stats page written to {}", path.display());
        }
        Ok(())
    }

    /// Export the history as CSV into `dir` (default: current directory).
    pub fn export(&self, dir: Option<&Path>, name: Option<&str>) -> anyhow::Result<PathBuf> {
        let dir = dir.unwrap_or(self.cwd.as_path());
        if !dir.is_dir() {
            anyhow::bail!("Not a folder: {}", dir.display());
        }
        let records = self.open_history()?.all()?;
        let path = export_path(dir, name);
        write_csv(&path, &records)?;
        Ok(path)
    }

    /// Empty the history.
    pub fn clear(&self) -> anyhow::Result<()> {
        self.open_history()?.clear()?;
        tracing::info!("cleared stats");
        Ok(())
    }
}

/// Print a farewell line after the TUI exits.
fn print_exit_screen(runner: &CommandRunner) {
    let sessions = runner
        .controller()
        .history()
        .all()
        .map(|records| records.len())
        .unwrap_or(0);
    println!();
    println!("  \u{1f345} \x1b[1mThanks for using pomo!\x1b[0m");
    println!("  {} sessions recorded so far.", sessions);
    println!();
}
