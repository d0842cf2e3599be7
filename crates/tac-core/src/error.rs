//! Error types for tac-core.

use thiserror::Error;

use crate::resource::{Day, ResourceType};

/// Errors that can occur in TAC core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The catalog has no auction for the requested resource.
    #[error("no auction for {kind} on day {day}")]
    UnknownResource {
        /// Requested resource type.
        kind: ResourceType,
        /// Requested day.
        day: Day,
    },

    /// Client preferences describe an impossible stay.
    #[error("invalid preferences for client {client}: {reason}")]
    InvalidPreferences {
        /// Client index.
        client: usize,
        /// What is wrong with the preferences.
        reason: String,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
