//! Clap derive structures for the `mobierp` CLI.
//!
//! Defines the command tree, global flags and shared value enums. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mobierp -- list, inspect and change ERP records from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "mobierp",
    version,
    about = "Manage mobierp ERP records from the command line",
    long_about = "A command-line front-end for the mobierp ERP backend.\n\n\
        Every record kind (products, purchase receives, sales deliveries,\n\
        warranties, production orders, payables...) supports the same verbs:\n\
        list, get, create, update, delete and transition.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "MOBIERP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'b', env = "MOBIERP_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "MOBIERP_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MOBIERP_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MOBIERP_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "MOBIERP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Ascending by the kind's sort field
    Asc,
    /// Descending by the kind's sort field
    Desc,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List records of one kind
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record with its relations expanded
    #[command(alias = "show")]
    Get(RecordArgs),

    /// Create a record
    Create(CreateArgs),

    /// Update fields of a record
    #[command(alias = "edit")]
    Update(UpdateArgs),

    /// Delete a record (asks for confirmation)
    #[command(alias = "rm")]
    Delete(RecordArgs),

    /// Move a record to another status (asks for confirmation)
    Transition(TransitionArgs),

    /// List record kinds and their status rules
    Kinds,

    /// Print the screen route table
    Routes,

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RECORDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Record kind (e.g. product, purchase-receives, warranty)
    pub kind: String,

    /// Case-insensitive text search over code, name and partner fields
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Keep only records whose status (or type) equals this value
    #[arg(long, short = 'f')]
    pub facet: Option<String>,

    /// Sort by the kind's sort field instead of backend order
    #[arg(long)]
    pub sort: Option<SortArg>,
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Record kind
    pub kind: String,

    /// Record id
    pub id: String,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Record kind
    pub kind: String,

    /// Field assignment, repeatable (key=value; value parsed as JSON when possible)
    #[arg(long = "set", short = 'S', value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Read fields from a JSON object file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Record kind
    pub kind: String,

    /// Record id
    pub id: String,

    /// Field assignment, repeatable (key=value; value parsed as JSON when possible)
    #[arg(long = "set", short = 'S', value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Read fields from a JSON object file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TransitionArgs {
    /// Record kind
    pub kind: String,

    /// Record id
    pub id: String,

    /// Target status (e.g. pending, approved, completed)
    pub status: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a profile value
    Set {
        /// Key: backend, token_env, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },

    /// Remove a stored bearer token from the system keyring
    ClearToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
