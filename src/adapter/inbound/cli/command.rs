//! Command-line interface definitions.
//!
//! Defines the CLI structure for yieldsweep using `clap`. `run` is the
//! scheduled entry point; the remaining subcommands are read-only views
//! and configuration utilities.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rebalance idle stablecoins into the best-yielding savings products
#[derive(Parser, Debug)]
#[command(name = "yieldsweep")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the yieldsweep CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Consolidate balances, allocate them by yield, and sweep the residue
    Run(PlanArgs),

    /// Show the ranked allocation steps without touching the account
    Plan(PlanArgs),

    /// Show consolidated balances per tracked currency
    Balances(ConfigPathArg),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `yieldsweep config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for `run` and `plan`.
#[derive(Parser, Debug)]
pub struct PlanArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Include locked (fixed-term) products, overriding the config file.
    #[arg(long, conflicts_with = "no_locked")]
    pub locked: bool,

    /// Exclude locked products, overriding the config file.
    #[arg(long)]
    pub no_locked: bool,
}

impl PlanArgs {
    /// Locked-product override, `None` when neither flag is given.
    #[must_use]
    pub fn include_locked(&self) -> Option<bool> {
        match (self.locked, self.no_locked) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the configuration file.
    #[arg(default_value = "config.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}
