//! Replay script format.
//!
//! A script is a JSON document:
//!
//! ```json
//! {
//!   "clients": [{ "arrival": 1, "departure": 4, "hotel_value": 80, "entertainment": [10, 50, 30] }],
//!   "owned": [{ "resource": 20, "quantity": 1 }],
//!   "steps": [
//!     { "at_secs": 0, "event": { "event": "game_started" } },
//!     { "at_secs": 30, "event": { "event": "quote_updated", "resource": 0, "ask_price": 310.0 } }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tac_core::{Catalog, ClientPreferences, MarketEvent, ResourceId};

use crate::error::CliError;

/// Units of an auction held before the game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Auction id.
    pub resource: ResourceId,
    /// Units owned.
    pub quantity: i32,
}

/// One timed market event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// Game clock when the event is delivered.
    pub at_secs: u64,
    /// The event itself.
    pub event: MarketEvent,
}

/// A scripted game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Client roster.
    #[serde(default)]
    pub clients: Vec<ClientPreferences>,
    /// Initial ownership.
    #[serde(default)]
    pub owned: Vec<Holding>,
    /// Events in delivery order.
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    /// Load a script from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CliError::Script(format!(
                "failed to read '{}': {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the script is invalid.
    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let script: Self =
            serde_json::from_str(content).map_err(|e| CliError::Script(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    /// Checks holdings name real auctions and steps never go back in time.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), CliError> {
        for holding in &self.owned {
            if Catalog.describe(holding.resource).is_none() {
                return Err(CliError::Script(format!(
                    "unknown auction {} in owned",
                    holding.resource
                )));
            }
        }

        let mut clock = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_secs < clock {
                return Err(CliError::Script(format!(
                    "step {index} at {}s is earlier than the previous step at {clock}s",
                    step.at_secs
                )));
            }
            clock = step.at_secs;
        }
        Ok(())
    }
}
