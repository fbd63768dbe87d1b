//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gog-catalog")]
#[command(about = "Populate a catalog host with games from the GOG storefront", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fetch a listing page and create its games, developers, publishers,
    /// categories and platforms in the host
    Populate(PopulateArgs),

    /// Inspect or initialize the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for the populate command.
#[derive(Args, Clone, Debug)]
pub(crate) struct PopulateArgs {
    /// Listing sort order (default: popularity)
    #[arg(long)]
    pub sort: Option<String>,

    /// Listing page (default: 1)
    #[arg(long)]
    pub page: Option<u32>,

    /// Extra listing filter passed through as-is (repeatable, key=value)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Products processed concurrently (overrides config)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Delay between product admissions in milliseconds (overrides config)
    #[arg(long)]
    pub throttle_ms: Option<u64>,

    /// Host base URL (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Write to an in-memory store instead of the host
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Write the run log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Print the config file path
    Path,

    /// Write the effective settings to the config file
    Init,
}
