mod calc;
mod cmd;
mod data;
mod logging;
mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "energy", about = "track daily energy levels on a calendar")]
struct Cli {
    /// Path to the data directory containing config and entry files (default: ./data)
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default config and an empty entries file
    Init,
    /// Print the entry saved for a date
    Show {
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// Save an entry for a date, replacing any existing one
    Log {
        /// Date as YYYY-MM-DD
        date: String,
        /// Energy level from 1 to 10
        #[arg(short, long)]
        level: u8,
        /// Comma-separated activities
        #[arg(short, long)]
        activities: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Print a month as a text calendar
    Month {
        /// Month as YYYY-MM (default: current month)
        month: Option<String>,
    },
    /// Summarize the entries logged in a month
    Summary {
        /// Month as YYYY-MM (default: current month)
        month: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };

    // Checked before logging starts, since the TUI log file lives in the data directory.
    let needs_init = dir_needs_init(&data_dir);
    logging::init(&data_dir, cli.command.is_none())?;

    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && needs_init {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        info!(dir = %data_dir.display(), "auto-initializing data directory");
        cmd::init::run(&data_dir)?;
    }

    match cli.command {
        None => cmd::root::run(&data_dir),
        Some(Commands::Init) => cmd::init::run(&data_dir),
        Some(Commands::Show { date }) => cmd::show::run(&data_dir, &date),
        Some(Commands::Log {
            date,
            level,
            activities,
            notes,
        }) => cmd::record::run(
            &data_dir,
            &date,
            level,
            activities.as_deref(),
            notes.as_deref(),
        ),
        Some(Commands::Month { month }) => cmd::month::run(&data_dir, month.as_deref()),
        Some(Commands::Summary { month }) => cmd::summary::run(&data_dir, month.as_deref()),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
