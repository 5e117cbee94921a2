// ABOUTME: Integration tests for the command flows: start, custom, cancel, stats, export, and clear.
// ABOUTME: Drives CommandRunner with scripted prompt answers and records what the user would see.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use pomo::commands::{Command, CommandRunner, RunnerParams, run_command_loop};
use pomo::config::Config;
use pomo::history::HistoryLog;
use pomo::history::report::StatsPage;
use pomo::host::{Notifier, PanelRenderer, Prompter, StatusDisplay};
use pomo::session::{
    ControllerParams, ManualClock, Scheduler, SessionController, SessionId, TimerEvent, TimerGuard,
    TokioScheduler,
};
use pomo::store::MemoryStore;
use pomo::tui::UserEvent;
use tokio::sync::mpsc;

/// Prompt answers handed out in order; an exhausted script cancels.
#[derive(Default)]
struct ScriptedPrompter {
    inputs: Mutex<VecDeque<Option<String>>>,
    folders: Mutex<VecDeque<Option<PathBuf>>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    fn with_inputs(inputs: &[Option<&str>]) -> Self {
        let prompter = Self::default();
        *prompter.inputs.lock().unwrap() = inputs.iter().map(|i| i.map(str::to_string)).collect();
        prompter
    }

    fn push_folder(&self, folder: Option<PathBuf>) {
        self.folders.lock().unwrap().push_back(folder);
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn input_box(&self, prompt: &str, _placeholder: &str) -> Option<String> {
        self.asked.lock().unwrap().push(prompt.to_string());
        self.inputs.lock().unwrap().pop_front().flatten()
    }

    async fn pick_folder(&self, title: &str) -> Option<PathBuf> {
        self.asked.lock().unwrap().push(title.to_string());
        self.folders.lock().unwrap().pop_front().flatten()
    }
}

/// Records notifications, status text, and stats panel activity.
#[derive(Default)]
struct Screen {
    status: Mutex<Option<String>>,
    infos: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    pages: Mutex<Vec<StatsPage>>,
    closed: Mutex<usize>,
}

impl Screen {
    fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    fn page_count(&self) -> usize {
        self.pages.lock().unwrap().len()
    }
}

impl StatusDisplay for Screen {
    fn set_text(&self, text: &str) {
        *self.status.lock().unwrap() = Some(text.to_string());
    }

    fn hide(&self) {
        *self.status.lock().unwrap() = None;
    }
}

impl Notifier for Screen {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

impl PanelRenderer for Screen {
    fn render(&self, page: &StatsPage) {
        self.pages.lock().unwrap().push(page.clone());
    }

    fn close(&self) {
        *self.closed.lock().unwrap() += 1;
    }
}

#[derive(Clone, Default)]
struct RecordingScheduler {
    sessions: Arc<Mutex<Vec<SessionId>>>,
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, session: SessionId, _finish: Duration, _refresh: Duration) -> TimerGuard {
        self.sessions.lock().unwrap().push(session);
        TimerGuard::inert()
    }
}

struct Harness {
    runner: CommandRunner,
    screen: Arc<Screen>,
    clock: ManualClock,
    scheduler: RecordingScheduler,
    history: HistoryLog,
}

fn harness(config: Config, prompter: Arc<ScriptedPrompter>) -> Harness {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
    let screen = Arc::new(Screen::default());
    let scheduler = RecordingScheduler::default();
    let history = HistoryLog::new(Arc::new(MemoryStore::new()));
    let controller = SessionController::new(ControllerParams {
        history: history.clone(),
        clock: Arc::new(clock.clone()),
        scheduler: Box::new(scheduler.clone()),
        status: screen.clone(),
        notifier: screen.clone(),
        workspace_name: "alpha".to_string(),
        refresh_interval: Duration::from_secs(10),
    });
    let runner = CommandRunner::new(RunnerParams {
        controller,
        config,
        prompter,
        notifier: screen.clone(),
        panel: screen.clone(),
    });
    Harness {
        runner,
        screen,
        clock,
        scheduler,
        history,
    }
}

fn configured(minutes: f64) -> Config {
    let mut config = Config::default();
    config.timer.default_session_duration = Some(minutes);
    config
}

/// Run a session to its natural end through the timer path.
fn finish_session(h: &mut Harness, minutes: i64) {
    h.clock.advance(chrono::Duration::minutes(minutes));
    let id = *h.scheduler.sessions.lock().unwrap().last().unwrap();
    h.runner.handle_timer(TimerEvent::Finish(id));
}

/// The standard start uses the configured length and reports it.
#[tokio::test]
async fn start_uses_configured_duration() {
    let mut h = harness(configured(25.0), Arc::new(ScriptedPrompter::default()));
    h.runner.run(Command::StartStandard).await;

    assert!(h.runner.controller().is_running());
    assert_eq!(h.screen.infos(), vec!["Pomodoro timer started (25 min)"]);
    assert_eq!(h.screen.status.lock().unwrap().as_deref(), Some("25 min"));
}

/// Without a configured length, start reports the missing setting and stays idle.
#[tokio::test]
async fn start_without_configuration_fails() {
    let mut h = harness(Config::default(), Arc::new(ScriptedPrompter::default()));
    h.runner.run(Command::StartStandard).await;

    assert!(!h.runner.controller().is_running());
    let errors = h.screen.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("timer.default_session_duration"));
}

/// A second start while a session runs is refused without touching the first.
#[tokio::test]
async fn start_while_running_is_refused() {
    let mut h = harness(configured(5.0), Arc::new(ScriptedPrompter::default()));
    h.runner.run(Command::StartStandard).await;
    h.runner.run(Command::StartStandard).await;

    assert_eq!(h.scheduler.sessions.lock().unwrap().len(), 1);
    assert!(h.screen.errors()[0].contains("already started"));
}

/// Invalid custom durations re-prompt until a valid one is entered.
#[tokio::test]
async fn custom_start_reprompts_on_invalid_input() {
    let prompter = Arc::new(ScriptedPrompter::with_inputs(&[
        Some("abc"),
        Some("0"),
        Some("15"),
    ]));
    let mut h = harness(Config::default(), prompter.clone());
    h.runner.run(Command::StartCustom).await;

    assert_eq!(prompter.asked.lock().unwrap().len(), 3);
    let errors = h.screen.errors();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.contains("10, 25, 30")));
    assert_eq!(h.screen.infos(), vec!["Pomodoro timer started (15 min)"]);
    assert_eq!(h.runner.controller().current().unwrap().duration_minutes(), 15.0);
}

/// Cancelling the duration prompt aborts the start.
#[tokio::test]
async fn custom_start_cancelled() {
    let prompter = Arc::new(ScriptedPrompter::with_inputs(&[None]));
    let mut h = harness(Config::default(), prompter);
    h.runner.run(Command::StartCustom).await;

    assert!(!h.runner.controller().is_running());
    assert_eq!(
        h.screen.errors(),
        vec!["You need to provide a session duration. Session start cancelled."]
    );
}

/// Custom start with a session running refuses before prompting.
#[tokio::test]
async fn custom_start_while_running_does_not_prompt() {
    let prompter = Arc::new(ScriptedPrompter::with_inputs(&[Some("10")]));
    let mut h = harness(configured(25.0), prompter.clone());
    h.runner.run(Command::StartStandard).await;
    h.runner.run(Command::StartCustom).await;

    assert!(prompter.asked.lock().unwrap().is_empty());
    assert_eq!(h.screen.errors().len(), 1);
}

/// Cancel ends the running session; cancelling again reports nothing is running.
#[tokio::test]
async fn cancel_flow() {
    let mut h = harness(configured(10.0), Arc::new(ScriptedPrompter::default()));
    h.runner.run(Command::StartStandard).await;
    h.clock.advance(chrono::Duration::minutes(2));
    h.runner.run(Command::Cancel).await;

    assert!(!h.runner.controller().is_running());
    assert!(h.screen.infos().contains(&"Pomodoro timer ended".to_string()));
    assert!(h.history.all().unwrap().is_empty());

    h.runner.run(Command::Cancel).await;
    assert_eq!(h.screen.errors(), vec!["Pomodoro timer not started"]);
}

/// The stats panel renders on open, refreshes while open, and stops after close.
#[tokio::test]
async fn stats_panel_refreshes_only_while_open() {
    let mut h = harness(configured(25.0), Arc::new(ScriptedPrompter::default()));
    h.runner.refresh_stats();
    assert_eq!(h.screen.page_count(), 0);

    h.runner.run(Command::ShowStats).await;
    assert!(h.runner.stats_open());
    assert_eq!(h.screen.page_count(), 1);

    h.runner.run(Command::StartStandard).await;
    finish_session(&mut h, 25);
    assert_eq!(h.screen.page_count(), 2);
    let latest = h.screen.pages.lock().unwrap().last().unwrap().clone();
    assert_eq!(latest.records.len(), 1);
    assert!(latest.html.contains("Total number of sessions: 1"));

    h.runner.close_stats();
    assert_eq!(*h.screen.closed.lock().unwrap(), 1);
    h.runner.refresh_stats();
    assert_eq!(h.screen.page_count(), 2);
}

/// Export writes a CSV named after the entered file name into the chosen folder.
#[tokio::test]
async fn export_writes_csv_to_chosen_folder() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = Arc::new(ScriptedPrompter::with_inputs(&[Some("my-stats")]));
    prompter.push_folder(Some(dir.path().to_path_buf()));
    let mut h = harness(configured(25.0), prompter);

    h.runner.run(Command::StartStandard).await;
    finish_session(&mut h, 25);
    h.runner.run(Command::ExportStats).await;

    let path = dir.path().join("my-stats.csv");
    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("duration,workspaceName,startDateTime,endDateTime")
    );
    assert!(lines.next().unwrap().starts_with("25,alpha,"));
    assert!(h.screen.errors().is_empty());
}

/// An empty file name falls back to the default export file.
#[tokio::test]
async fn export_uses_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let prompter = Arc::new(ScriptedPrompter::with_inputs(&[Some("")]));
    prompter.push_folder(Some(dir.path().to_path_buf()));
    let mut h = harness(Config::default(), prompter);

    h.runner.run(Command::ExportStats).await;
    assert!(dir.path().join("pomodoro-stats.csv").exists());
}

/// Cancelling the folder prompt reports that no folder was selected.
#[tokio::test]
async fn export_without_folder() {
    let prompter = Arc::new(ScriptedPrompter::default());
    prompter.push_folder(None);
    let mut h = harness(Config::default(), prompter);

    h.runner.run(Command::ExportStats).await;
    assert_eq!(h.screen.errors(), vec!["No folder selected"]);
}

/// Clear empties recorded history and confirms it.
#[tokio::test]
async fn clear_empties_history() {
    let mut h = harness(configured(5.0), Arc::new(ScriptedPrompter::default()));
    h.runner.run(Command::StartStandard).await;
    finish_session(&mut h, 5);
    assert_eq!(h.history.all().unwrap().len(), 1);

    h.runner.run(Command::ClearStats).await;
    assert!(h.history.all().unwrap().is_empty());
    assert!(h.screen.infos().contains(&"Pomodoro stats cleared".to_string()));
}

/// Driven through the command loop with real tokio timers, a one-minute
/// session finishes on its own and is recorded before the loop shuts down.
#[tokio::test(start_paused = true)]
async fn command_loop_records_natural_finish() {
    let (scheduler, timer_rx) = TokioScheduler::new();
    let screen = Arc::new(Screen::default());
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
    let controller = SessionController::new(ControllerParams {
        history: HistoryLog::new(Arc::new(MemoryStore::new())),
        clock: Arc::new(clock),
        scheduler: Box::new(scheduler),
        status: screen.clone(),
        notifier: screen.clone(),
        workspace_name: "alpha".to_string(),
        refresh_interval: Duration::from_secs(10),
    });
    let runner = CommandRunner::new(RunnerParams {
        controller,
        config: configured(1.0),
        prompter: Arc::new(ScriptedPrompter::default()),
        notifier: screen.clone(),
        panel: screen.clone(),
    });

    let (user_tx, user_rx) = mpsc::channel(4);
    let handle = tokio::spawn(run_command_loop(
        runner,
        user_rx,
        timer_rx,
        Duration::from_secs(30),
    ));

    user_tx
        .send(UserEvent::Command(Command::StartStandard))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(61)).await;
    user_tx.send(UserEvent::Quit).await.unwrap();

    let runner = handle.await.unwrap();
    assert!(!runner.controller().is_running());
    assert_eq!(runner.controller().history().all().unwrap().len(), 1);
    assert!(
        screen
            .infos()
            .contains(&"Pomodoro session finished!".to_string())
    );
    assert!(screen.status.lock().unwrap().is_none());
}

/// Quitting mid-session ends it without recording anything.
#[tokio::test(start_paused = true)]
async fn command_loop_discards_session_on_quit() {
    let (scheduler, timer_rx) = TokioScheduler::new();
    let screen = Arc::new(Screen::default());
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
    let controller = SessionController::new(ControllerParams {
        history: HistoryLog::new(Arc::new(MemoryStore::new())),
        clock: Arc::new(clock),
        scheduler: Box::new(scheduler),
        status: screen.clone(),
        notifier: screen.clone(),
        workspace_name: "alpha".to_string(),
        refresh_interval: Duration::from_secs(10),
    });
    let runner = CommandRunner::new(RunnerParams {
        controller,
        config: configured(25.0),
        prompter: Arc::new(ScriptedPrompter::default()),
        notifier: screen.clone(),
        panel: screen.clone(),
    });

    let (user_tx, user_rx) = mpsc::channel(4);
    let handle = tokio::spawn(run_command_loop(
        runner,
        user_rx,
        timer_rx,
        Duration::from_secs(30),
    ));

    user_tx
        .send(UserEvent::Command(Command::StartStandard))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;
    drop(user_tx);

    let runner = handle.await.unwrap();
    assert!(!runner.controller().is_running());
    assert!(runner.controller().history().all().unwrap().is_empty());
}

/// Folder prompt that stays open until the test releases it, then cancels.
#[derive(Default)]
struct HeldPrompter {
    release: tokio::sync::Notify,
}

#[async_trait]
impl Prompter for HeldPrompter {
    async fn input_box(&self, _prompt: &str, _placeholder: &str) -> Option<String> {
        self.release.notified().await;
        None
    }

    async fn pick_folder(&self, _title: &str) -> Option<PathBuf> {
        self.release.notified().await;
        None
    }
}

/// A session still finishes on time while the export prompt is left open.
#[tokio::test(start_paused = true)]
async fn session_finishes_while_prompt_is_open() {
    let (scheduler, timer_rx) = TokioScheduler::new();
    let screen = Arc::new(Screen::default());
    let prompter = Arc::new(HeldPrompter::default());
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
    let controller = SessionController::new(ControllerParams {
        history: HistoryLog::new(Arc::new(MemoryStore::new())),
        clock: Arc::new(clock),
        scheduler: Box::new(scheduler),
        status: screen.clone(),
        notifier: screen.clone(),
        workspace_name: "alpha".to_string(),
        refresh_interval: Duration::from_secs(10),
    });
    let runner = CommandRunner::new(RunnerParams {
        controller,
        config: configured(1.0),
        prompter: prompter.clone(),
        notifier: screen.clone(),
        panel: screen.clone(),
    });

    let (user_tx, user_rx) = mpsc::channel(4);
    let handle = tokio::spawn(run_command_loop(
        runner,
        user_rx,
        timer_rx,
        Duration::from_secs(30),
    ));

    user_tx
        .send(UserEvent::Command(Command::StartStandard))
        .await
        .unwrap();
    user_tx
        .send(UserEvent::Command(Command::ExportStats))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(5 * 60)).await;

    assert!(
        screen
            .infos()
            .contains(&"Pomodoro session finished!".to_string())
    );
    assert!(screen.status.lock().unwrap().is_none());

    prompter.release.notify_one();
    user_tx.send(UserEvent::Quit).await.unwrap();

    let runner = handle.await.unwrap();
    assert_eq!(runner.controller().history().all().unwrap().len(), 1);
    assert_eq!(screen.errors(), vec!["No folder selected".to_string()]);
}

/// Numbers too large for a timer are re-prompted like any other bad input.
#[tokio::test]
async fn custom_start_reprompts_on_oversized_duration() {
    let prompter = Arc::new(ScriptedPrompter::with_inputs(&[Some("1e300"), Some("15")]));
    let mut h = harness(Config::default(), prompter.clone());
    h.runner.run(Command::StartCustom).await;

    assert_eq!(prompter.asked.lock().unwrap().len(), 2);
    assert_eq!(h.screen.errors().len(), 1);
    assert!(h.screen.errors()[0].starts_with("You provided an invalid number"));
    assert_eq!(
        h.runner.controller().current().unwrap().duration_minutes(),
        15.0
    );
}
