// ABOUTME: Session timers: periodic refresh and one-shot auto-finish, delivered as TimerEvents.
// ABOUTME: Timers never call the controller directly; they post into a queue the command loop drains.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one session within a controller's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A timer firing for a particular session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Time to recompute the status display.
    Refresh(SessionId),
    /// The session reached its scheduled end.
    Finish(SessionId),
}

impl TimerEvent {
    pub fn session(&self) -> SessionId {
        match *self {
            TimerEvent::Refresh(id) | TimerEvent::Finish(id) => id,
        }
    }
}

/// Owns the running timer tasks of one session. Dropping it cancels them.
#[derive(Debug, Default)]
pub struct TimerGuard {
    handles: Vec<JoinHandle<()>>,
}

impl TimerGuard {
    pub fn new(handles: Vec<JoinHandle<()>>) -> Self {
        Self { handles }
    }

    /// A guard with nothing to cancel, for schedulers that do not spawn tasks.
    pub fn inert() -> Self {
        Self::default()
    }

    /// Abort every timer task. Aborting an already finished task is a no-op.
    pub fn cancel(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Arranges the refresh and auto-finish timers for a session.
pub trait Scheduler: Send {
    fn schedule(
        &self,
        session: SessionId,
        finish_after: Duration,
        refresh_every: Duration,
    ) -> TimerGuard;
}

/// Scheduler backed by tokio tasks. Must be used from inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<TimerEvent>,
}

impl TokioScheduler {
    /// Create a scheduler and the receiving end of its event queue.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(
        &self,
        session: SessionId,
        finish_after: Duration,
        refresh_every: Duration,
    ) -> TimerGuard {
        let refresh_tx = self.tx.clone();
        let refresh = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + refresh_every;
            let mut ticker = tokio::time::interval_at(start, refresh_every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if refresh_tx.send(TimerEvent::Refresh(session)).is_err() {
                    break;
                }
            }
        });

        let finish_tx = self.tx.clone();
        let finish = tokio::spawn(async move {
            tokio::time::sleep(finish_after).await;
            let _ = finish_tx.send(TimerEvent::Finish(session));
        });

        TimerGuard::new(vec![refresh, finish])
    }
}
