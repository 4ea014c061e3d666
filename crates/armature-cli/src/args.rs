//! Command-line argument definitions for the Armature CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the snapshot path, report output,
//! configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Armature model builder
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the repository snapshot (JSON)
    #[arg(help = "Path to the snapshot file")]
    pub snapshot: String,

    /// Write the build report as JSON to this path
    #[arg(short, long)]
    pub report: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
