//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's
//! derive macros. It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Cvepost -- batch CVE advisory digest notifier.
///
/// Use `cvepost <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "cvepost", version, about, long_about = None)]
pub struct Cli {
    /// Path to the cvepost.toml configuration file.
    #[arg(short, long, default_value = "cvepost.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one batch: read the feed, filter, dispatch the digest.
    Run(RunArgs),

    /// Manage configuration.
    Config(ConfigArgs),

    /// Inspect or reset the seen-advisory store.
    Cache(CacheArgs),
}

// ---- run ----

/// Run one batch over a feed document.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Feed document path, or '-' to read from standard input.
    #[arg(default_value = "-")]
    pub feed: PathBuf,

    /// Print the digest to stdout instead of dispatching mail.
    #[arg(long)]
    pub dry_run: bool,

    /// Override the recipient address for this run.
    #[arg(long)]
    pub mail_to: Option<String>,
}

// ---- config ----

/// Manage cvepost configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, policy, feed, cache, notify).
        #[arg(long)]
        section: Option<String>,
    },
}

// ---- cache ----

/// Inspect or reset the seen-advisory store.
#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List identifiers already notified.
    Show,
    /// Clear the store so every advisory becomes reportable again.
    Reset,
}
