// ABOUTME: TUI widget sub-modules for the notification log, stats panel, prompt, and status bar.
// ABOUTME: Each widget is a pure rendering function over TuiState data.

pub mod notifications;
pub mod prompt;
pub mod stats;
pub mod status;
