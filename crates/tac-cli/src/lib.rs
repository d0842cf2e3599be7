//! # tac-cli
//!
//! Command-line front end for the TAC travel agent.
//!
//! Provides commands for:
//! - Writing and checking game configuration files
//! - Replaying a scripted game offline against the in-memory market
//!
//! A replay feeds every scripted [`tac_core::MarketEvent`] first to the
//! market (so prices and ownership move) and then to the agent, and reports
//! each bid the agent submits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod script;

pub use cli::{Cli, Commands, Format};
pub use error::CliError;
pub use output::OutputFormat;
pub use script::ReplayScript;
