//! Clap derive structures for the `protect` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use protect_core::SecurityState;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// protect -- Somfy Protect alarm bridge
#[derive(Debug, Parser)]
#[command(
    name = "protect",
    version,
    about = "Control a Somfy Protect alarm as a security-system accessory",
    long_about = "Bridges a Somfy Protect (Myfox) cloud alarm to a 4-state\n\
        security-system model: read and set the alarm, list sites, inspect\n\
        the history feed, and host the accessory with user-change logging.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "PROTECT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Site id (overrides siteId from the config file)
    #[arg(long, short = 's', global = true)]
    pub site: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PROTECT_OUTPUT",
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

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Host the accessory until interrupted, logging state changes
    Run(RunArgs),

    /// Show the current alarm state
    #[command(alias = "st")]
    Status,

    /// Set the alarm state
    Set(SetArgs),

    /// List sites on the account
    Sites,

    /// Show recent alarm history
    #[command(alias = "hist")]
    History(HistoryArgs),

    /// Step through authentication, site lookup, status, and history
    Check,

    /// Store the account password in the system keyring
    SetPassword(SetPasswordArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Poll the history feed and log who changes the alarm
    #[arg(long)]
    pub log_user_changes: bool,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Target state
    pub state: TargetState,
}

/// Host target states accepted by `protect set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetState {
    /// Disarm the alarm
    #[value(alias = "off")]
    Disarm,
    /// Arm fully (vendor "armed")
    #[value(alias = "armed")]
    Away,
    /// Arm partially (vendor "partial")
    #[value(alias = "partial")]
    Stay,
    /// Arm for the night (also written as "partial")
    Night,
}

impl From<TargetState> for SecurityState {
    fn from(state: TargetState) -> Self {
        match state {
            TargetState::Disarm => SecurityState::Disarmed,
            TargetState::Away => SecurityState::AwayArm,
            TargetState::Stay => SecurityState::StayArm,
            TargetState::Night => SecurityState::NightArm,
        }
    }
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of events to fetch
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: u32,

    /// Include every event type, not only alarm changes
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct SetPasswordArgs {
    /// Account email (defaults to username from the config file)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
