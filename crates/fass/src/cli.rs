//! Clap derive structures for the `fass` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fass -- flip Home Assistant lights and switches
#[derive(Debug, Parser)]
#[command(
    name = "fass",
    version,
    about = "Toggle Home Assistant lights and switches from the command line",
    long_about = "Lists the lights and switches of a Home Assistant hub whose state is\n\
        strictly on or off, and turns them on or off.\n\n\
        Connection settings are stored with `fass config set` and can be\n\
        overridden with FASS_URL, FASS_TOKEN and FASS_CA_CERT.",
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
    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the stored settings
    #[arg(long, env = "FASS_DATA_DIR", global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List toggleable lights and switches
    #[command(alias = "ls")]
    List(ListArgs),

    /// Turn an entity on
    On(EntityArgs),

    /// Turn an entity off
    Off(EntityArgs),

    /// Flip an entity using the hub's toggle service
    Toggle(EntityArgs),

    /// Check that the hub is reachable and accepts the token
    Check,

    /// Show or change the stored connection settings
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only show one domain
    #[arg(long, short = 'd')]
    pub domain: Option<DomainFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DomainFilter {
    Light,
    Switch,
}

#[derive(Debug, Args)]
pub struct EntityArgs {
    /// Entity id, e.g. light.kitchen
    pub entity_id: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the stored settings with the token redacted
    Show,

    /// Save all three settings at once
    Set(ConfigSetArgs),

    /// Print the directory the settings live in
    Path,
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    /// Hub base URL, e.g. https://hub.local:8123
    #[arg(long)]
    pub url: Option<String>,

    /// Long-lived access token
    #[arg(long, conflicts_with = "token_stdin")]
    pub token: Option<String>,

    /// Read the access token from stdin (prompts when interactive)
    #[arg(long)]
    pub token_stdin: bool,

    /// PEM file with extra CA certificate(s)
    #[arg(long, value_name = "FILE", conflicts_with = "clear_ca_cert")]
    pub ca_cert: Option<PathBuf>,

    /// Remove the stored CA certificate
    #[arg(long)]
    pub clear_ca_cert: bool,
}
