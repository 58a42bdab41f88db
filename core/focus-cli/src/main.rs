//! focus-cli: command-line front end for Focus Sentinel study sessions.
//!
//! ## Subcommands
//!
//! - `init`: Create the session log if it doesn't exist
//! - `monitor`: Run a session fed by detector lines on stdin
//! - `stats`: Show aggregate statistics
//! - `history`: List recorded sessions
//! - `clear`: Reset all session data

mod commands;
mod logging;
mod signal;

use clap::{Parser, Subcommand};
use focus_core::{load_config, MonitorConfig, SessionStore, StorageConfig};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "focus-cli")]
#[command(about = "Study focus monitor: tracks face presence and logs session focus scores")]
#[command(version)]
struct Cli {
    /// Session log location (overrides the config file)
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Config file location (default: ~/.focus-sentinel/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session log if it doesn't exist
    Init,

    /// Run a study session, reading one detector result per line from stdin
    Monitor {
        /// Seconds without a face before counting a distraction (5-30)
        #[arg(long, value_name = "SECS")]
        threshold: Option<u64>,
    },

    /// Show aggregate statistics
    Stats,

    /// List recorded sessions
    History {
        /// Only sessions recorded today
        #[arg(long)]
        today: bool,
    },

    /// Delete all recorded sessions
    Clear {
        /// Confirm the irreversible reset
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let storage = StorageConfig::from_home().ok();
    let _logging_guard = logging::init(storage.as_ref().map(|s| s.logs_dir()).as_deref());

    if let Err(e) = run(cli, storage.as_ref()) {
        tracing::error!(error = %e, "focus-cli failed");
        std::process::exit(1);
    }
}

fn run(cli: Cli, storage: Option<&StorageConfig>) -> Result<(), String> {
    let config = resolve_config(cli.config.as_ref(), storage)?;
    let data_file = cli
        .data_file
        .clone()
        .or_else(|| config.data_file.clone())
        .or_else(|| storage.map(|s| s.sessions_file()))
        .ok_or("Cannot determine session log path; pass --data-file")?;

    let store = SessionStore::initialize(&data_file)?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Init => commands::init(&store, &mut stdout),
        Commands::Monitor { threshold } => {
            let config = match threshold {
                Some(secs) => MonitorConfig {
                    distraction_threshold_secs: secs,
                    ..config
                }
                .normalized(),
                None => config,
            };
            commands::monitor(&store, config, io::stdin().lock(), &mut stdout).map(|_| ())
        }
        Commands::Stats => commands::stats(&store, &mut stdout),
        Commands::History { today } => commands::history(&store, today, &mut stdout),
        Commands::Clear { yes } => commands::clear(&store, yes, &mut stdout),
    }
}

fn resolve_config(
    explicit: Option<&PathBuf>,
    storage: Option<&StorageConfig>,
) -> Result<MonitorConfig, String> {
    let path = match (explicit, storage) {
        (Some(path), _) => path.clone(),
        (None, Some(storage)) => storage.config_file(),
        (None, None) => {
            tracing::warn!("Home directory not found; using default settings");
            return Ok(MonitorConfig::default());
        }
    };
    Ok(load_config(&path)?)
}
