//! CLI frontend for the Verne interactive fiction engine.

mod commands;
mod diagnostics;
mod tui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "verne",
    about = "Verne: play interactive fiction worlds in the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a world
    Play {
        /// World file (JSON)
        world: PathBuf,

        /// Line-oriented mode: read commands from stdin, no animation
        #[arg(long)]
        plain: bool,

        /// Directory for save files
        #[arg(long, default_value = ".verne")]
        save_dir: PathBuf,

        /// Milliseconds between revealed characters (0 disables the effect)
        #[arg(long, default_value = "35")]
        tick_ms: u64,

        /// Write logs to this file
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Validate a world file and list its rooms
    Check {
        /// World file (JSON)
        world: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            world,
            plain,
            save_dir,
            tick_ms,
            log,
        } => init_logging(log.as_deref(), !plain).and_then(|()| {
            commands::play::run(&world, &save_dir, tick_ms, plain)
        }),
        Commands::Check { world } => {
            init_logging(None, false).and_then(|()| commands::check::run(&world))
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Install the tracing subscriber. `RUST_LOG` overrides the default level.
///
/// Without a log file, logs go to stderr at `warn`, unless `owns_terminal`
/// is set: the full-screen UI would be overwritten by them.
fn init_logging(log: Option<&Path>, owns_terminal: bool) -> Result<(), String> {
    let filter = |default: &str| {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };

    match log {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("cannot open log file {}: {e}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter("info"))
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if owns_terminal => {}
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter("warn"))
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
    }
    Ok(())
}
