//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// TAC travel agent: configuration and offline replay.
#[derive(Parser, Debug, Clone)]
#[command(name = "tac")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, global = true, default_value_t = Format::Table)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write the default configuration as TOML.
    InitConfig {
        /// File to write. Prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Load and validate a configuration file.
    CheckConfig {
        /// Configuration file to check.
        path: PathBuf,
    },

    /// Replay a scripted game through the agent.
    Replay(ReplayArgs),
}

/// Arguments for the replay command.
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// JSON replay script.
    pub script: PathBuf,

    /// Configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "TAC_CONFIG")]
    pub config: Option<PathBuf>,
}
