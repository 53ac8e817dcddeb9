//! Clap derive structures for the `heatctl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// heatctl -- monitor and control 21energy heaters
#[derive(Debug, Parser)]
#[command(
    name = "heatctl",
    version,
    about = "Monitor and control 21energy heaters from the command line",
    long_about = "Polls a 21energy heater over its local HTTP API.\n\n\
        Readings are collected into a snapshot of named fields, each with an\n\
        availability rule that depends on the device being reachable and running.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Heater profile to use
    #[arg(long, short = 'p', env = "HEATCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device address (overrides the profile host)
    #[arg(long, short = 'H', env = "HEATCTL_HOST", global = true)]
    pub host: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "HEATCTL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "HEATCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides the profile)
    #[arg(long, env = "HEATCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one refresh cycle and print every field
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Keep polling and print each published state until Ctrl-C
    Watch(WatchArgs),

    /// Show the device identity
    Info,

    /// Set the power target level (0-4)
    Power(PowerArgs),

    /// Enable heating
    Enable,

    /// Disable heating
    Disable,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Device Commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Include advanced fields (pool fallback, found blocks, hashrate averages)
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refresh cycles (overrides the profile)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    /// Include advanced fields
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct PowerArgs {
    /// Power level, 0 (lowest) to 4 (highest)
    #[arg(allow_negative_numbers = true)]
    pub level: i64,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a heater profile
    Init {
        /// Device address
        #[arg(long)]
        host: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Seconds between refresh cycles (0 disables polling)
        #[arg(long)]
        poll_interval: Option<u64>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Overwrite an existing profile of the same name
        #[arg(long)]
        force: bool,
    },

    /// Display the current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
