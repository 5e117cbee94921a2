// ABOUTME: Configuration loading for pomo.
// ABOUTME: Reads ~/.pomo/config.toml and resolves data paths and the workspace label.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::TimerError;
use crate::history::UNKNOWN_WORKSPACE;

/// Config key the standard start command reads its duration from.
pub const DEFAULT_DURATION_KEY: &str = "timer.default_session_duration";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label recorded with each session; defaults to the working directory name.
    pub workspace_name: Option<String>,
    pub timer: TimerConfig,
    pub stats: StatsConfig,
}

/// Session timer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Length used by the standard start command, in minutes.
    pub default_session_duration: Option<f64>,
    pub refresh_interval_seconds: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_session_duration: None,
            refresh_interval_seconds: 10,
        }
    }
}

/// Stats panel settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub refresh_interval_seconds: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            refresh_interval_seconds: 30,
        }
    }
}

impl Config {
    /// Load config from ~/.pomo/config.toml, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// The configured standard session length.
    pub fn default_duration(&self) -> Result<f64, TimerError> {
        match self.timer.default_session_duration {
            None => Err(TimerError::MissingConfiguration {
                key: DEFAULT_DURATION_KEY,
            }),
            Some(minutes) if minutes.is_finite() && minutes > 0.0 => Ok(minutes),
            Some(minutes) => Err(TimerError::InvalidDuration {
                input: minutes.to_string(),
            }),
        }
    }

    /// Interval between status display refreshes (at least one second).
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.timer.refresh_interval_seconds.max(1))
    }

    /// Interval between stats panel refreshes (at least one second).
    pub fn stats_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.stats.refresh_interval_seconds.max(1))
    }

    /// Workspace label: the configured name, else the name of `cwd`, else "unknown".
    pub fn workspace_name(&self, cwd: &Path) -> String {
        self.workspace_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .or_else(|| {
                cwd.file_name()
                    .map(|name| name.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| UNKNOWN_WORKSPACE.to_string())
    }

    /// Root directory for config and data.
    pub fn base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pomo")
    }

    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        Self::base_dir().join("config.toml")
    }

    /// Path to the persisted key-value store holding the history.
    pub fn store_path() -> PathBuf {
        Self::base_dir().join("history.json")
    }

    /// Path the stats page HTML is written to.
    pub fn stats_page_path() -> PathBuf {
        Self::base_dir().join("stats.html")
    }

    /// Directory for log files.
    pub fn logs_dir() -> PathBuf {
        Self::base_dir().join("logs")
    }
}
