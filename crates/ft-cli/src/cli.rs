//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Webcam-assisted focus tracker.
///
/// Reconciles manual toggles, presence detection, and Pomodoro phases into
/// one focus state and keeps a local per-day history.
#[derive(Debug, Parser)]
#[command(name = "ft", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the tracker, reading JSON events from stdin until EOF or Ctrl-C.
    Track,

    /// Show today's focus state.
    Status,

    /// Show the per-day focus history.
    Report {
        /// Number of days to cover, ending today.
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Emit JSON instead of the human-readable table.
        #[arg(long)]
        json: bool,
    },

    /// Discard today's accumulated focus state.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}
