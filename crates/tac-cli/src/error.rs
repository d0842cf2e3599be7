//! CLI error types.

use tac_agent::AgentError;
use tac_core::CoreError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or domain error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The agent could not be created.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// The replay script is malformed.
    #[error("invalid replay script: {0}")]
    Script(String),

    /// Refused to overwrite an existing file.
    #[error("{0} already exists, pass --force to overwrite")]
    Exists(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_script() {
        let err = CliError::Script("steps go back in time".into());
        assert_eq!(err.to_string(), "invalid replay script: steps go back in time");
    }

    #[test]
    fn cli_error_core_is_transparent() {
        let err = CliError::from(CoreError::Config("bad".into()));
        assert_eq!(err.to_string(), CoreError::Config("bad".into()).to_string());
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
