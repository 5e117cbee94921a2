// ABOUTME: Session controller: the single-active-session state machine.
// ABOUTME: Starts sessions, applies timer events, and records naturally finished sessions to history.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use super::clock::Clock;
use super::timers::{Scheduler, SessionId, TimerEvent, TimerGuard};
use crate::error::TimerError;
use crate::history::{HistoryLog, HistoryRecord, format_minutes};
use crate::host::{Notifier, StatusDisplay};

/// Notification shown when a session runs its full course.
pub const FINISHED_MESSAGE: &str = "Pomodoro session finished!";

/// How often the status display is recomputed unless configured otherwise.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// One in-progress session. Its timers are cancelled when it is dropped.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    duration_minutes: f64,
    timers: TimerGuard,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    /// Whole minutes left at `now`, rounded up and never negative.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> i64 {
        let remaining_ms = (self.end_time - now).num_milliseconds();
        let minutes = (remaining_ms as f64 / 60_000.0).ceil() as i64;
        minutes.max(0)
    }
}

/// Why a session is being ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The user cancelled, or the process is shutting down.
    Manual,
    /// The auto-finish timer fired.
    Natural,
}

/// What happened to a session that was ended.
#[derive(Debug, Clone, PartialEq)]
pub enum EndOutcome {
    /// The session had reached its end time and was appended to history.
    Recorded(HistoryRecord),
    /// The session was cut short and left no trace.
    Discarded,
}

/// Dependencies of a [`SessionController`].
pub struct ControllerParams {
    pub history: HistoryLog,
    pub clock: Arc<dyn Clock>,
    pub scheduler: Box<dyn Scheduler>,
    pub status: Arc<dyn StatusDisplay>,
    pub notifier: Arc<dyn Notifier>,
    pub workspace_name: String,
    pub refresh_interval: Duration,
}

/// Owns at most one running session and feeds finished ones to the history log.
pub struct SessionController {
    current: Option<Session>,
    next_id: u64,
    history: HistoryLog,
    clock: Arc<dyn Clock>,
    scheduler: Box<dyn Scheduler>,
    status: Arc<dyn StatusDisplay>,
    notifier: Arc<dyn Notifier>,
    workspace_name: String,
    refresh_interval: Duration,
}

impl SessionController {
    pub fn new(params: ControllerParams) -> Self {
        Self {
            current: None,
            next_id: 1,
            history: params.history,
            clock: params.clock,
            scheduler: params.scheduler,
            status: params.status,
            notifier: params.notifier,
            workspace_name: params.workspace_name,
            refresh_interval: params.refresh_interval,
        }
    }

    /// Whether a session is in progress.
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// The session in progress, if any.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn workspace_name(&self) -> &str {
        &self.workspace_name
    }

    /// Start a session of `duration_minutes`.
    ///
    /// Fails without side effects if a session is already running or the
    /// duration is not a finite positive number.
    pub fn start(&mut self, duration_minutes: f64) -> Result<(), TimerError> {
        if self.current.is_some() {
            return Err(TimerError::AlreadyRunning);
        }
        let length = session_length(duration_minutes)?;
        let start_time = self.clock.now();
        let end_time = start_time
            .checked_add_signed(length)
            .ok_or_else(|| invalid_duration(duration_minutes))?;

        let id = SessionId(self.next_id);
        self.next_id += 1;

        let finish_after = length.to_std().unwrap_or_default();
        let timers = self
            .scheduler
            .schedule(id, finish_after, self.refresh_interval);

        self.status
            .set_text(&format!("{} min", format_minutes(duration_minutes)));
        tracing::info!(session = %id, duration_minutes, %end_time, "session started");

        self.current = Some(Session {
            id,
            start_time,
            end_time,
            duration_minutes,
            timers,
        });
        Ok(())
    }

    /// End the running session.
    ///
    /// The session is recorded when it has reached its end time (always the
    /// case for a natural end); otherwise it is discarded. Timers are
    /// cancelled and the status display hidden either way.
    pub fn end(&mut self, reason: EndReason) -> Result<EndOutcome, TimerError> {
        let Some(mut session) = self.current.take() else {
            return Err(TimerError::NoActiveSession);
        };
        session.timers.cancel();
        self.status.hide();

        let now = self.clock.now();
        let finished = reason == EndReason::Natural || now >= session.end_time;
        if !finished {
            tracing::info!(session = %session.id, ?reason, "session ended early, not recorded");
            return Ok(EndOutcome::Discarded);
        }

        let record = HistoryRecord::new(
            session.duration_minutes,
            self.workspace_name.clone(),
            session.start_time,
            session.end_time,
        );
        self.history.append(record.clone())?;
        tracing::info!(session = %session.id, ?reason, "session recorded");
        Ok(EndOutcome::Recorded(record))
    }

    /// Apply a timer event. Events for anything but the running session are ignored.
    pub fn handle_timer(&mut self, event: TimerEvent) -> Result<Option<EndOutcome>, TimerError> {
        let is_current = self
            .current
            .as_ref()
            .is_some_and(|session| session.id == event.session());
        if !is_current {
            tracing::debug!(?event, "ignoring timer event for inactive session");
            return Ok(None);
        }

        match event {
            TimerEvent::Refresh(_) => {
                self.refresh();
                Ok(None)
            }
            TimerEvent::Finish(_) => {
                let outcome = self.end(EndReason::Natural);
                self.notifier.info(FINISHED_MESSAGE);
                outcome.map(Some)
            }
        }
    }

    /// Recompute the status display from the current time.
    pub fn refresh(&self) {
        let Some(ref session) = self.current else {
            return;
        };
        let remaining = session.remaining_minutes(self.clock.now());
        tracing::debug!(session = %session.id, remaining, "refreshing status");
        self.status.set_text(&format!("{} min", remaining));
    }

    /// End any running session as a manual end, for process teardown.
    pub fn shutdown(&mut self) -> Result<Option<EndOutcome>, TimerError> {
        if self.current.is_none() {
            return Ok(None);
        }
        self.end(EndReason::Manual).map(Some)
    }
}

fn invalid_duration(duration_minutes: f64) -> TimerError {
    TimerError::InvalidDuration {
        input: duration_minutes.to_string(),
    }
}

/// Convert a session length in minutes, rejecting values no timer can hold.
pub fn session_length(duration_minutes: f64) -> Result<TimeDelta, TimerError> {
    if !duration_minutes.is_finite() || duration_minutes <= 0.0 {
        return Err(invalid_duration(duration_minutes));
    }
    let millis = (duration_minutes * 60_000.0).round();
    if millis >= i64::MAX as f64 {
        return Err(invalid_duration(duration_minutes));
    }
    TimeDelta::try_milliseconds(millis as i64).ok_or_else(|| invalid_duration(duration_minutes))
}
