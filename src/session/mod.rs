// ABOUTME: Session module, the timer core: one active session, its timers, and the clock it reads.
// ABOUTME: The controller is driven by commands and by TimerEvents drained from the scheduler queue.

pub mod clock;
pub mod controller;
pub mod timers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{
    ControllerParams, DEFAULT_REFRESH_INTERVAL, EndOutcome, EndReason, FINISHED_MESSAGE, Session,
    SessionController, session_length,
};
pub use timers::{Scheduler, SessionId, TimerEvent, TimerGuard, TokioScheduler};
