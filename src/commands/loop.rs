// ABOUTME: Command loop: the single task that owns the session controller.
// ABOUTME: Serializes user commands, timer events, and stats refresh ticks; ends the session on quit.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use super::CommandRunner;
use crate::session::TimerEvent;
use crate::tui::state::UserEvent;

/// Run commands and timer events until the user quits or the UI goes away.
///
/// Only one event is handled at a time. A command waiting on a prompt keeps
/// applying timer events, so the status refreshes and sessions finish on time.
pub async fn run_command_loop(
    mut runner: CommandRunner,
    mut user_rx: mpsc::Receiver<UserEvent>,
    mut timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
    stats_refresh: Duration,
) -> CommandRunner {
    let mut stats_ticker = tokio::time::interval_at(Instant::now() + stats_refresh, stats_refresh);
    stats_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            event = user_rx.recv() => match event {
                None | Some(UserEvent::Quit) => break,
                Some(UserEvent::Command(command)) => {
                    runner.run_with_timers(command, &mut timer_rx).await
                }
                Some(UserEvent::CloseStats) => runner.close_stats(),
            },
            Some(event) = timer_rx.recv() => runner.handle_timer(event),
            _ = stats_ticker.tick() => runner.refresh_stats(),
        }
    }

    runner.shutdown();
    runner
}
