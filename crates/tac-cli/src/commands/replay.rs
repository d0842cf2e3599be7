//! Offline replay of a scripted game.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tac_agent::TravelAgent;
use tac_core::{Catalog, GameConfig, InMemoryMarket, MarketEvent};
use tracing::{debug, info, warn};

use crate::error::CliError;
use crate::output::{BidRow, HoldingRow, OutputFormat, ReplayReport};
use crate::script::ReplayScript;

/// Replay command executor.
pub struct ReplayCommand {
    script: PathBuf,
    config: Option<PathBuf>,
}

impl ReplayCommand {
    /// Create a new replay command.
    #[must_use]
    pub const fn new(script: PathBuf, config: Option<PathBuf>) -> Self {
        Self { script, config }
    }

    /// Execute the replay and write its report.
    ///
    /// # Errors
    ///
    /// Returns an error if the script or configuration cannot be loaded.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        let config = match &self.config {
            Some(path) => GameConfig::from_file(path)?,
            None => GameConfig::default(),
        };
        let script = ReplayScript::from_file(&self.script)?;
        let report = replay(&script, config)?;
        format.write(writer, &report)
    }
}

/// Runs a script through a fresh in-memory market and agent.
///
/// # Errors
///
/// Returns an error if the configuration is rejected by the agent.
pub fn replay(script: &ReplayScript, config: GameConfig) -> Result<ReplayReport, CliError> {
    if script.clients.len() != config.game.clients {
        warn!(
            scripted = script.clients.len(),
            configured = config.game.clients,
            "client count differs from configuration"
        );
    }

    let mut market = InMemoryMarket::new(config.game.length());
    market.set_clients(script.clients.clone());
    for holding in &script.owned {
        market.set_owned(holding.resource, holding.quantity);
    }
    let mut agent = TravelAgent::new(config)?;

    let mut report = ReplayReport {
        clients: script.clients.len(),
        steps: script.steps.len(),
        ..ReplayReport::default()
    };

    for step in &script.steps {
        debug!(at_secs = step.at_secs, event = ?step.event, "replay step");
        market.set_elapsed(Duration::from_secs(step.at_secs));
        market.apply(&step.event);
        let bids = agent.handle(&mut market, &step.event);

        if matches!(step.event, MarketEvent::GameStarted) {
            if let Some(session) = agent.session() {
                report.skipped_clients.clone_from(&session.plan().skipped);
            }
        }

        report.bids.extend(bids.into_iter().filter_map(|bid| {
            let resource = Catalog.describe(bid.resource)?;
            Some(BidRow {
                at_secs: step.at_secs,
                resource: bid.resource,
                kind: resource.kind,
                day: resource.day,
                quantity: bid.quantity,
                price: bid.price,
            })
        }));
    }

    report.holdings = Catalog
        .resources()
        .filter_map(|resource| {
            let state = market.state(resource.id);
            (state.allocated != 0 || state.owned != 0).then_some(HoldingRow {
                resource: resource.id,
                kind: resource.kind,
                day: resource.day,
                allocated: state.allocated,
                owned: state.owned,
            })
        })
        .collect();

    info!(
        steps = report.steps,
        bids = report.bids.len(),
        "replay finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tac_core::{ClientPreferences, Quote, ResourceId, ResourceType};

    use crate::script::{Holding, ReplayStep};

    fn step(at_secs: u64, event: MarketEvent) -> ReplayStep {
        ReplayStep { at_secs, event }
    }

    #[test]
    fn opening_pass_is_reported() {
        let script = ReplayScript {
            clients: vec![ClientPreferences::new(1, 4, 80, [10, 50, 30])],
            owned: vec![],
            steps: vec![step(0, MarketEvent::GameStarted)],
        };
        let report = replay(&script, GameConfig::default()).expect("replay");

        assert_eq!(report.bids.len(), 4);
        let hotels = report
            .bids
            .iter()
            .filter(|b| b.kind == ResourceType::GoodHotel)
            .count();
        assert_eq!(hotels, 3);
        assert!(report.skipped_clients.is_empty());
        assert!(report.holdings.iter().any(|h| h.kind == ResourceType::InFlight
            && h.day == 1
            && h.allocated == 1));
    }

    #[test]
    fn excess_tickets_are_sold() {
        let museum = Catalog
            .resource_for(ResourceType::Museum, 2)
            .expect("museum");
        let script = ReplayScript {
            clients: vec![],
            owned: vec![Holding {
                resource: museum,
                quantity: 2,
            }],
            steps: vec![
                step(0, MarketEvent::GameStarted),
                step(540, MarketEvent::QuoteUpdated(Quote::new(museum, 60.0))),
            ],
        };
        let report = replay(&script, GameConfig::default()).expect("replay");

        assert_eq!(report.bids.len(), 2);
        assert!(report.bids.iter().all(|b| b.quantity == -2));
        assert_eq!(report.bids[0].price, 200.0);
        assert!((report.bids[1].price - 80.0).abs() < 1e-9);
        assert_eq!(report.bids[1].at_secs, 540);
    }

    #[test]
    fn invalid_clients_are_listed() {
        let script = ReplayScript {
            clients: vec![
                ClientPreferences::new(3, 2, 50, [1, 2, 3]),
                ClientPreferences::new(2, 3, 50, [1, 2, 3]),
            ],
            owned: vec![],
            steps: vec![step(0, MarketEvent::GameStarted)],
        };
        let report = replay(&script, GameConfig::default()).expect("replay");
        assert_eq!(report.skipped_clients, vec![0]);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let mut config = GameConfig::default();
        config.flight.drift_lower = 0;
        let err = replay(&ReplayScript::default(), config).unwrap_err();
        assert!(matches!(err, CliError::Agent(_)));
    }

    #[test]
    fn events_before_start_produce_nothing() {
        let script = ReplayScript {
            clients: vec![],
            owned: vec![],
            steps: vec![step(
                10,
                MarketEvent::QuoteUpdated(Quote::new(ResourceId::new(1), 300.0)),
            )],
        };
        let report = replay(&script, GameConfig::default()).expect("replay");
        assert!(report.bids.is_empty());
        assert!(report.holdings.is_empty());
    }
}
