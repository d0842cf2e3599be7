//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;
use tac_core::{GameConfig, ResourceId, ResourceType};

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => value.write_table(writer)?,
        }
        Ok(())
    }

    /// Write a value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A bid submitted during a replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidRow {
    /// Game clock when the bid was submitted.
    pub at_secs: u64,
    /// Auction id.
    pub resource: ResourceId,
    /// Resource type of the auction.
    pub kind: ResourceType,
    /// Day of the auction.
    pub day: u8,
    /// Signed quantity; negative sells.
    pub quantity: i32,
    /// Unit price.
    pub price: f64,
}

/// End-of-replay state of an auction the agent touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingRow {
    /// Auction id.
    pub resource: ResourceId,
    /// Resource type of the auction.
    pub kind: ResourceType,
    /// Day of the auction.
    pub day: u8,
    /// Allocation target.
    pub allocated: i32,
    /// Units owned.
    pub owned: i32,
}

/// Result of a replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Clients in the script.
    pub clients: usize,
    /// Steps delivered.
    pub steps: usize,
    /// Clients the allocator skipped.
    pub skipped_clients: Vec<usize>,
    /// Every submitted bid, in submission order.
    pub bids: Vec<BidRow>,
    /// Auctions with a non-zero allocation or ownership at the end.
    pub holdings: Vec<HoldingRow>,
}

impl TableDisplay for ReplayReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Replay")?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Clients:          {}", self.clients)?;
        writeln!(writer, "Steps:            {}", self.steps)?;
        if !self.skipped_clients.is_empty() {
            let skipped: Vec<String> = self.skipped_clients.iter().map(ToString::to_string).collect();
            writeln!(writer, "Skipped clients:  {}", skipped.join(", "))?;
        }
        writeln!(writer)?;

        if self.bids.is_empty() {
            writeln!(writer, "No bids submitted")?;
        } else {
            writeln!(
                writer,
                "{:>6}  {:<7}  {:<20}  {:>3}  {:>5}  {:>9}",
                "TIME", "AUCTION", "TYPE", "DAY", "QTY", "PRICE"
            )?;
            writeln!(writer, "{}", "─".repeat(59))?;
            for bid in &self.bids {
                writeln!(
                    writer,
                    "{:>5}s  {:<7}  {:<20}  {:>3}  {:>5}  {:>9.2}",
                    bid.at_secs,
                    bid.resource.to_string(),
                    bid.kind.to_string(),
                    bid.day,
                    bid.quantity,
                    bid.price
                )?;
            }
            writeln!(writer)?;
            writeln!(writer, "Total: {} bid(s)", self.bids.len())?;
        }

        if !self.holdings.is_empty() {
            writeln!(writer)?;
            writeln!(
                writer,
                "{:<7}  {:<20}  {:>3}  {:>9}  {:>5}",
                "AUCTION", "TYPE", "DAY", "ALLOCATED", "OWNED"
            )?;
            writeln!(writer, "{}", "─".repeat(50))?;
            for row in &self.holdings {
                writeln!(
                    writer,
                    "{:<7}  {:<20}  {:>3}  {:>9}  {:>5}",
                    row.resource.to_string(),
                    row.kind.to_string(),
                    row.day,
                    row.allocated,
                    row.owned
                )?;
            }
        }
        Ok(())
    }
}

/// A loaded and validated configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigReport {
    /// Where the configuration came from.
    pub path: String,
    /// The configuration.
    pub config: GameConfig,
}

impl TableDisplay for ConfigReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let c = &self.config;
        writeln!(writer, "Configuration OK: {}", self.path)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Game")?;
        writeln!(writer, "  Length:         {}s", c.game.length_secs)?;
        writeln!(writer, "  Clients:        {}", c.game.clients)?;
        writeln!(writer)?;
        writeln!(writer, "Flights")?;
        writeln!(
            writer,
            "  Price band:     [{}, {}]",
            c.flight.price_floor, c.flight.price_ceiling
        )?;
        writeln!(
            writer,
            "  Drift:          [-{}, {}] over {}s",
            c.flight.drift_lower, c.flight.drift_upper, c.flight.horizon_secs
        )?;
        writeln!(writer, "  Step:           {}s", c.flight.simulation_step_secs)?;
        writeln!(writer, "  Final stretch:  after {}s", c.flight.final_stretch_secs)?;
        writeln!(writer, "  Tolerance:      {}", c.flight.forecast_tolerance)?;
        writeln!(writer)?;
        writeln!(writer, "Hotels")?;
        writeln!(writer, "  Good above:     {}", c.hotel.good_hotel_threshold)?;
        writeln!(writer, "  Markup:         {}", c.hotel.markup)?;
        writeln!(writer, "  Opening bid:    {}", c.hotel.opening_price)?;
        writeln!(writer)?;
        writeln!(writer, "Entertainment")?;
        writeln!(
            writer,
            "  Buy:            {} -> {}",
            c.entertainment.buy_start, c.entertainment.buy_end
        )?;
        writeln!(
            writer,
            "  Sell:           {} -> {}",
            c.entertainment.sell_start, c.entertainment.sell_end
        )?;
        Ok(())
    }
}
