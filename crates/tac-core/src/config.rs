//! Game configuration.
//!
//! Constants of the pricing model and bidding rules, grouped by category:
//! - Game length and client count
//! - Flight price bounds, drift bounds and forecast settings
//! - Hotel tier threshold and markups
//! - Entertainment opening prices and interpolation endpoints

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Game-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    /// Total game length in seconds.
    pub length_secs: u64,
    /// Number of clients the agent serves.
    pub clients: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            length_secs: 540,
            clients: 8,
        }
    }
}

impl GameSettings {
    /// Returns the game length as a duration.
    #[must_use]
    pub const fn length(&self) -> Duration {
        Duration::from_secs(self.length_secs)
    }
}

/// Flight price model and bidding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// Lowest price a flight can reach.
    pub price_floor: f64,
    /// Highest price a flight can reach.
    pub price_ceiling: f64,
    /// Magnitude of the lowest drift hypothesis (`z >= -drift_lower`).
    pub drift_lower: i32,
    /// Highest drift hypothesis (`z <= drift_upper`).
    pub drift_upper: i32,
    /// Horizon over which the drift budget is consumed, in seconds.
    pub horizon_secs: u64,
    /// Step of the forward price simulation, in seconds.
    pub simulation_step_secs: u64,
    /// Elapsed time after which any needed flight is bought.
    pub final_stretch_secs: u64,
    /// Buy when the price is within this fraction above the forecast minimum.
    pub forecast_tolerance: f64,
    /// Earliest bidding time for the first flight, in seconds.
    pub gate_base_secs: u64,
    /// Additional delay per flight ordinal, in seconds.
    pub gate_stride_secs: u64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            price_floor: 150.0,
            price_ceiling: 800.0,
            drift_lower: 10,
            drift_upper: 30,
            horizon_secs: 540,
            simulation_step_secs: 10,
            final_stretch_secs: 500,
            forecast_tolerance: 0.05,
            gate_base_secs: 20,
            gate_stride_secs: 10,
        }
    }
}

impl FlightConfig {
    /// Earliest elapsed time at which the flight with the given ordinal may be bid on.
    #[must_use]
    pub const fn gate_secs(&self, ordinal: usize) -> u64 {
        self.gate_base_secs + self.gate_stride_secs * ordinal as u64
    }

    /// Clamps a price into the flight price band.
    #[must_use]
    pub fn clamp_price(&self, price: f64) -> f64 {
        price.clamp(self.price_floor, self.price_ceiling)
    }
}

/// Hotel bidding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HotelConfig {
    /// Clients with a hotel value strictly above this stay in the good hotel.
    pub good_hotel_threshold: i32,
    /// Amount added to the ask price when outbid.
    pub markup: f64,
    /// Price of the opening bid placed at game start.
    pub opening_price: f64,
}

impl Default for HotelConfig {
    fn default() -> Self {
        Self {
            good_hotel_threshold: 70,
            markup: 50.0,
            opening_price: 200.0,
        }
    }
}

/// Entertainment bidding settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntertainmentConfig {
    /// Opening price when buying at game start.
    pub opening_buy_price: f64,
    /// Opening price when selling at game start.
    pub opening_sell_price: f64,
    /// Buy price at the start of the game.
    pub buy_start: f64,
    /// Buy price at the end of the game.
    pub buy_end: f64,
    /// Sell price at the start of the game.
    pub sell_start: f64,
    /// Sell price at the end of the game.
    pub sell_end: f64,
}

impl Default for EntertainmentConfig {
    fn default() -> Self {
        Self {
            opening_buy_price: 50.0,
            opening_sell_price: 200.0,
            buy_start: 50.0,
            buy_end: 150.0,
            sell_start: 200.0,
            sell_end: 80.0,
        }
    }
}

/// Complete agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    /// Game settings.
    #[serde(default)]
    pub game: GameSettings,
    /// Flight settings.
    #[serde(default)]
    pub flight: FlightConfig,
    /// Hotel settings.
    #[serde(default)]
    pub hotel: HotelConfig,
    /// Entertainment settings.
    #[serde(default)]
    pub entertainment: EntertainmentConfig,
}

impl GameConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CoreError::Config(format!(
                "failed to read config file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CoreError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("failed to render TOML: {e}")))
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fail = |msg: &str| Err(CoreError::Config(msg.to_string()));

        if self.game.length_secs == 0 {
            return fail("game.length_secs must be greater than 0");
        }
        if self.game.clients == 0 {
            return fail("game.clients must be greater than 0");
        }

        let flight = &self.flight;
        if !(flight.price_floor >= 0.0 && flight.price_floor < flight.price_ceiling) {
            return fail("flight.price_floor must be non-negative and below flight.price_ceiling");
        }
        if flight.drift_lower <= 0 {
            return fail("flight.drift_lower must be greater than 0");
        }
        if flight.drift_upper < 0 {
            return fail("flight.drift_upper cannot be negative");
        }
        if flight.horizon_secs == 0 {
            return fail("flight.horizon_secs must be greater than 0");
        }
        if flight.simulation_step_secs == 0 {
            return fail("flight.simulation_step_secs must be greater than 0");
        }
        if !(flight.forecast_tolerance > 0.0) {
            return fail("flight.forecast_tolerance must be greater than 0");
        }

        if !(self.hotel.markup >= 0.0 && self.hotel.opening_price > 0.0) {
            return fail("hotel.markup cannot be negative and hotel.opening_price must be positive");
        }

        let ent = &self.entertainment;
        let prices = [
            ent.opening_buy_price,
            ent.opening_sell_price,
            ent.buy_start,
            ent.buy_end,
            ent.sell_start,
            ent.sell_end,
        ];
        if prices.iter().any(|p| !(*p > 0.0)) {
            return fail("entertainment prices must be positive");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("failed to write temp file");
        file
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.length(), Duration::from_secs(540));
        assert_eq!(config.flight.drift_lower, 10);
        assert_eq!(config.flight.drift_upper, 30);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = GameConfig::from_toml("").expect("empty config should parse");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r"
            [game]
            length_secs = 720

            [flight]
            price_floor = 100.0
            gate_stride_secs = 5

            [hotel]
            markup = 25.0
        ";

        let config = GameConfig::from_toml(toml).expect("should parse partial config");

        assert_eq!(config.game.length_secs, 720);
        assert_eq!(config.game.clients, 8);
        assert_eq!(config.flight.price_floor, 100.0);
        assert_eq!(config.flight.price_ceiling, 800.0);
        assert_eq!(config.flight.gate_secs(3), 35);
        assert_eq!(config.hotel.markup, 25.0);
        assert_eq!(config.hotel.good_hotel_threshold, 70);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = GameConfig::default();
        let rendered = config.to_toml().expect("render");
        let parsed = GameConfig::from_toml(&rendered).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_file() {
        let file = create_temp_config("[game]\nclients = 4\n");
        let config = GameConfig::from_file(file.path()).expect("should load from file");
        assert_eq!(config.game.clients, 4);
    }

    #[test]
    fn test_file_not_found() {
        let result = GameConfig::from_file("/nonexistent/path/tac.toml");
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = GameConfig::from_toml("[game\nclients = ");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_inverted_price_band_rejected() {
        let toml = r"
            [flight]
            price_floor = 900.0
        ";
        let err = GameConfig::from_toml(toml).unwrap_err();
        assert!(err.to_string().contains("price_floor"));
    }

    #[test]
    fn test_zero_drift_lower_rejected() {
        let mut config = GameConfig::default();
        config.flight.drift_lower = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("drift_lower"));
    }

    #[test]
    fn test_zero_simulation_step_rejected() {
        let mut config = GameConfig::default();
        config.flight.simulation_step_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_entertainment_price_rejected() {
        let mut config = GameConfig::default();
        config.entertainment.sell_end = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("entertainment"));
    }

    #[test]
    fn test_clamp_price() {
        let flight = FlightConfig::default();
        assert_eq!(flight.clamp_price(10.0), 150.0);
        assert_eq!(flight.clamp_price(1000.0), 800.0);
        assert_eq!(flight.clamp_price(321.5), 321.5);
    }
}
