//! CLI command implementations.
//!
//! - [`config`] - Writing and checking configuration files
//! - [`replay`] - Offline game replay

pub mod config;
pub mod replay;

pub use config::{CheckConfigCommand, InitConfigCommand};
pub use replay::ReplayCommand;
