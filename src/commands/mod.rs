// ABOUTME: Commands module: the six user commands and the loop that serializes them with timer events.
// ABOUTME: Commands recover their own errors and report them through the notifier.

pub mod r#loop;
pub mod runner;

pub use r#loop::run_command_loop;
pub use runner::{CommandRunner, RunnerParams, parse_duration};

/// A command the user can invoke from the command input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartStandard,
    StartCustom,
    Cancel,
    ShowStats,
    ExportStats,
    ClearStats,
}

impl Command {
    pub const ALL: [Command; 6] = [
        Command::StartStandard,
        Command::StartCustom,
        Command::Cancel,
        Command::ShowStats,
        Command::ExportStats,
        Command::ClearStats,
    ];

    /// Short name typed at the command input.
    pub fn name(self) -> &'static str {
        match self {
            Command::StartStandard => "start",
            Command::StartCustom => "custom",
            Command::Cancel => "cancel",
            Command::ShowStats => "stats",
            Command::ExportStats => "export",
            Command::ClearStats => "clear",
        }
    }

    /// Long form, also accepted at the command input.
    pub fn alias(self) -> &'static str {
        match self {
            Command::StartStandard => "start-standard",
            Command::StartCustom => "start-custom",
            Command::Cancel => "cancel-timer",
            Command::ShowStats => "show-stats",
            Command::ExportStats => "export-stats",
            Command::ClearStats => "clear-stats",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::StartStandard => "start a session of the configured length",
            Command::StartCustom => "start a session of a length you enter",
            Command::Cancel => "end the running session",
            Command::ShowStats => "show finished sessions",
            Command::ExportStats => "export finished sessions as CSV",
            Command::ClearStats => "delete all finished sessions",
        }
    }

    /// Parse typed input. Case-insensitive; a leading `/` or `:` is ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let word = trimmed
            .strip_prefix('/')
            .or_else(|| trimmed.strip_prefix(':'))
            .unwrap_or(trimmed)
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|cmd| cmd.name() == word || cmd.alias() == word)
    }
}
