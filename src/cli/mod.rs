//! Command-line interface definitions.
//!
//! Deliberately minimal: one command to run a scan and print its report,
//! one to sanity-check a config file. The donor repo's wallet/telegram/
//! service-install surface doesn't exist for this spec and isn't emulated
//! here.

pub mod banner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Edgelord - prediction-market combinatorial-arbitrage opportunity scanner.
#[derive(Parser, Debug)]
#[command(name = "edgelord")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one scan end to end and print the resulting report as JSON.
    Scan(ScanArgs),

    /// Validate a config file without running a scan.
    Check(CheckArgs),
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Skip the ASCII art banner
    #[arg(long)]
    pub no_banner: bool,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Pretty-print the report instead of emitting compact JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(subcommand)]
    pub target: CheckTarget,
}

#[derive(Subcommand, Debug)]
pub enum CheckTarget {
    /// Load and validate the configuration file.
    Config,
}
