// ABOUTME: Entry point for pomo: a terminal pomodoro timer with persisted session history.
// ABOUTME: Parses CLI args, sets up logging, loads config, and launches the app or a headless subcommand.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pomo::app::App;
use pomo::config::Config;
use pomo::logging;

#[derive(Parser)]
#[command(name = "pomo", version, about = "Pomodoro timer with session history")]
struct Cli {
    /// Path to the config file (default: ~/.pomo/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Open the interactive timer (the default).
    Run,
    /// Print recorded sessions.
    Stats {
        /// Also write the HTML stats page to this path.
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Export recorded sessions as CSV.
    Export {
        /// Destination folder (default: current directory).
        #[arg(long)]
        dir: Option<PathBuf>,
        /// File name; ".csv" is appended when missing.
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete all recorded sessions.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(&Config::logs_dir());

    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let app = App::new(config);

    match cli.command.unwrap_or(Cmd::Run) {
        Cmd::Run => app.run().await,
        Cmd::Stats { html } => app.print_stats(html.as_deref()),
        Cmd::Export { dir, name } => {
            let path = app.export(dir.as_deref(), name.as_deref())?;
            println!("Exported stats to {}", path.display());
            Ok(())
        }
        Cmd::Clear => {
            app.clear()?;
            println!("Pomodoro stats cleared");
            Ok(())
        }
    }
}
