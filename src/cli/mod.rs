//! CLI module for Carousel
//!
//! Command-line interface definitions and handlers for the dashboard
//! rotation daemon.
//!
//! # Commands
//!
//! - `run` - Start the rotation daemon
//! - `apply` - Apply a configuration push from a JSON file
//! - `backends` - Probe text-generation backends
//! - `suggest` - Ask the active backend for a priority ordering
//! - `status` - Show persisted rotation state
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the daemon with default config
//! carousel run
//!
//! # Apply a pushed configuration
//! carousel apply --file push.json
//!
//! # Probe backends and show the active one
//! carousel backends probe
//! ```

pub mod apply;
pub mod backends;
pub mod completions;
pub mod config;
pub mod output;
pub mod run;
pub mod status;
pub mod suggest;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Carousel - dashboard rotation daemon
#[derive(Parser, Debug)]
#[command(
    name = "carousel",
    version,
    about = "Headless dashboard rotation daemon with AI-assisted priority ordering"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the rotation daemon
    Run(RunArgs),
    /// Apply a configuration push from a JSON file
    Apply(ApplyArgs),
    /// Manage text-generation backends
    #[command(subcommand)]
    Backends(BackendsCommands),
    /// Ask the active backend to reorder saved dashboards
    Suggest(SuggestArgs),
    /// Show persisted rotation state
    Status(StatusArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "carousel.toml")]
    pub config: PathBuf,

    /// Override persisted state location
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CAROUSEL_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Seconds between backend probe passes
    #[arg(long, default_value_t = 300)]
    pub probe_interval: u64,

    /// Skip backend probing entirely
    #[arg(long)]
    pub no_probe: bool,
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "carousel.toml")]
    pub config: PathBuf,

    /// Override persisted state location
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// JSON file containing the configuration push
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum BackendsCommands {
    /// Probe all backends and show availability
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "carousel.toml")]
    pub config: PathBuf,

    /// Override persisted state location
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "carousel.toml")]
    pub config: PathBuf,

    /// Override persisted state location
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Hour of day to optimize for (defaults to the current hour)
    #[arg(long)]
    pub hour: Option<u32>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "carousel.toml")]
    pub config: PathBuf,

    /// Override persisted state location
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create an example configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path
    #[arg(short, long, default_value = "carousel.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
