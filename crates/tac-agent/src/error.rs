//! Error types for tac-agent.

use thiserror::Error;

/// Errors that can occur in agent operations.
///
/// Only construction reports them to the caller. Inside
/// [`TravelAgent::handle`](crate::TravelAgent::handle) they are logged and
/// the next event is handled as usual.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Core error: invalid configuration or an auction missing from the catalog.
    #[error(transparent)]
    Core(#[from] tac_core::CoreError),
}
