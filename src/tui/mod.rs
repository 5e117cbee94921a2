// ABOUTME: TUI module: ratatui full-screen interface for pomo.
// ABOUTME: Owns the terminal, drives key input and UiEvents, and forwards commands to the command loop.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;

use std::io::{self, Stdout};

use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::host::{NotifyLevel, UiEvent};
use input::{InputResult, handle_key};

/// Channels connecting the TUI to the command loop.
pub struct TuiChannels {
    pub user_tx: mpsc::Sender<UserEvent>,
    pub ui_rx: mpsc::UnboundedReceiver<UiEvent>,
}

/// Puts the terminal back the way we found it, even on early return.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Run the TUI until the user quits. Returns the final state.
pub async fn run(workspace_name: String, channels: TuiChannels) -> anyhow::Result<TuiState> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut state = TuiState::new(workspace_name);
    let result = event_loop(&mut terminal, &mut state, channels).await;

    // Unblock a command still waiting on an answer.
    state.resolve_prompt(None);
    terminal.show_cursor()?;
    result.map(|()| state)
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &mut TuiState,
    channels: TuiChannels,
) -> anyhow::Result<()> {
    let TuiChannels { user_tx, mut ui_rx } = channels;
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, state))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let user_event = match handle_key(state, key) {
                        InputResult::Quit => return Ok(()),
                        InputResult::Command(command) => UserEvent::Command(command),
                        InputResult::CloseStats => UserEvent::CloseStats,
                        InputResult::PromptResolved | InputResult::None => continue,
                    };
                    if !forward(state, &user_tx, user_event) {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            maybe_ui = ui_rx.recv() => match maybe_ui {
                Some(event) => state.apply(event),
                None => return Ok(()),
            },
        }
    }
}

/// Hand a user event to the command loop without blocking the UI.
///
/// The stats panel is only hidden once its close request is queued, so the
/// UI never disagrees with the loop about whether it is open. Returns false
/// when the command loop has gone away.
fn forward(state: &mut TuiState, user_tx: &mpsc::Sender<UserEvent>, event: UserEvent) -> bool {
    match user_tx.try_send(event) {
        Ok(()) => {
            if event == UserEvent::CloseStats {
                state.stats = None;
            }
            true
        }
        Err(mpsc::error::TrySendError::Full(_)) => {
            state.push_notification(
                NotifyLevel::Error,
                "Still busy with the previous command".to_string(),
            );
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}
