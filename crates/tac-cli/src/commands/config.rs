//! Configuration commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use tac_core::GameConfig;
use tracing::info;

use crate::error::CliError;
use crate::output::{ConfigReport, OutputFormat};

/// Writes the default configuration.
pub struct InitConfigCommand {
    output: Option<PathBuf>,
    force: bool,
}

impl InitConfigCommand {
    /// Create a new init-config command.
    #[must_use]
    pub const fn new(output: Option<PathBuf>, force: bool) -> Self {
        Self { output, force }
    }

    /// Execute the command, writing to `writer` when no output file is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the target exists without `--force` or writing fails.
    pub fn execute<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let toml = GameConfig::default().to_toml()?;
        match &self.output {
            None => write!(writer, "{toml}")?,
            Some(path) => {
                if path.exists() && !self.force {
                    return Err(CliError::Exists(path.display().to_string()));
                }
                std::fs::write(path, toml)?;
                info!(path = %path.display(), "wrote default configuration");
                writeln!(writer, "Wrote {}", path.display())?;
            }
        }
        Ok(())
    }
}

/// Loads and validates a configuration file.
pub struct CheckConfigCommand {
    path: PathBuf,
}

impl CheckConfigCommand {
    /// Create a new check-config command.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or fails validation.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let config = GameConfig::from_file(&self.path)?;
        let report = ConfigReport {
            path: self.path.display().to_string(),
            config,
        };
        format.write(writer, &report)
    }
}
