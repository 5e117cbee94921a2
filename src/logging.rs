// ABOUTME: Logging setup: tracing to a daily rolling file so the terminal UI stays clean.
// ABOUTME: Filter comes from POMO_LOG (EnvFilter syntax), defaulting to info.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "POMO_LOG";

/// Build the log filter from `POMO_LOG`, falling back to `info`.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a global subscriber writing to `dir/pomo.log.<date>`.
///
/// Returns the writer guard, which must be held for the life of the process
/// so buffered lines are flushed. Returns `None` if the directory cannot be
/// created or a subscriber is already installed.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: failed to create log directory {}: {}", dir.display(), e);
        return None;
    }
    let appender = tracing_appender::rolling::daily(dir, "pomo.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}
