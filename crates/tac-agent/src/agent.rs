//! Event dispatch.
//!
//! [`TravelAgent::handle`] is the single entry point for market events. It
//! routes each event to the belief filter, the allocator or the bidding
//! rules, submits whatever bids result, and never fails: problems are
//! logged and the next event is handled as usual.

use tac_core::{Bid, Category, GameConfig, Market, MarketEvent, Quote, ResourceId};
use tracing::{debug, info, warn};

use crate::allocation::Allocator;
use crate::belief::UpdateOutcome;
use crate::error::AgentError;
use crate::bidding::BiddingPolicy;
use crate::session::Session;

/// The travel agent's decision core.
#[derive(Debug, Clone)]
pub struct TravelAgent {
    config: GameConfig,
    allocator: Allocator,
    policy: BiddingPolicy,
    session: Option<Session>,
}

impl TravelAgent {
    /// Creates an agent with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: GameConfig) -> Result<Self, AgentError> {
        config.validate()?;
        Ok(Self {
            allocator: Allocator::new(&config.hotel),
            policy: BiddingPolicy::new(&config),
            config,
            session: None,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// State of the game in progress, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Handles one market event and returns the bids it submitted.
    pub fn handle<M: Market + ?Sized>(&mut self, market: &mut M, event: &MarketEvent) -> Vec<Bid> {
        match event {
            MarketEvent::GameStarted => self.on_game_started(market),
            MarketEvent::GameStopped => {
                self.on_game_stopped(market);
                Vec::new()
            }
            MarketEvent::QuoteUpdated(quote) => self.on_quote(market, quote),
            MarketEvent::CategoryQuotesUpdated { category } => self.on_category(market, *category),
            MarketEvent::AuctionClosed { resource } => {
                info!(%resource, "auction closed");
                Vec::new()
            }
            MarketEvent::BidUpdated(status) => {
                debug!(bid = status.bid_id, resource = %status.resource, state = %status.state, "bid updated");
                Vec::new()
            }
            MarketEvent::BidRejected { status, reason } => {
                warn!(bid = status.bid_id, resource = %status.resource, %reason, "bid rejected");
                Vec::new()
            }
            MarketEvent::BidError { status, code } => {
                warn!(bid = status.bid_id, resource = %status.resource, code, "bid error");
                Vec::new()
            }
            MarketEvent::Transaction {
                resource,
                quantity,
                price,
            } => {
                debug!(%resource, quantity, price, "transaction");
                Vec::new()
            }
        }
    }

    fn on_game_started<M: Market + ?Sized>(&mut self, market: &mut M) -> Vec<Bid> {
        let flights: Vec<ResourceId> = market
            .resources()
            .into_iter()
            .filter(|r| r.category() == Category::Flight)
            .map(|r| r.id)
            .collect();
        info!(
            flights = flights.len(),
            clients = market.client_count(),
            "game started"
        );

        let mut session = Session::new(&self.config, flights);
        session.set_plan(self.allocator.allocate(market));

        let mut bids = Vec::new();
        for resource in market.resources() {
            if let Some(bid) = self.policy.opening_bid(&resource, market.need(resource.id)) {
                submit(market, &mut session, bid);
                bids.push(bid);
            }
        }

        self.session = Some(session);
        bids
    }

    fn on_game_stopped<M: Market + ?Sized>(&mut self, market: &M) {
        let Some(session) = self.session.take() else {
            debug!("game stopped without a session");
            return;
        };
        for (ordinal, resource) in session.flights().iter().enumerate() {
            info!(
                flight = ordinal,
                %resource,
                price = ?session.filter().current_price(ordinal),
                forecast = ?session.filter().forecast_for(ordinal),
                last_bid = ?session.last_bid_price(*resource),
                owned = market.owned(*resource),
                allocated = market.allocation(*resource),
                "flight summary"
            );
        }
        info!("game stopped");
    }

    fn on_quote<M: Market + ?Sized>(&mut self, market: &mut M, quote: &Quote) -> Vec<Bid> {
        let Some(session) = self.session.as_mut() else {
            debug!(resource = %quote.resource, "quote outside a game");
            return Vec::new();
        };
        let Some(resource) = market.describe(quote.resource) else {
            debug!(resource = %quote.resource, "quote for unknown auction");
            return Vec::new();
        };

        let bid = match resource.category() {
            Category::Flight => {
                if let Some(ordinal) = session.flight_ordinal(quote.resource) {
                    let delta = session.filter_mut().observe_price(ordinal, quote.ask_price);
                    debug!(flight = ordinal, price = quote.ask_price, delta, "flight quote");
                }
                None
            }
            Category::Hotel => self
                .policy
                .hotel_bid(quote, market.allocation(quote.resource)),
            Category::Entertainment => self.policy.entertainment_bid(
                quote.resource,
                market.need(quote.resource),
                market.elapsed(),
                market.game_length(),
            ),
        };

        bid.map(|bid| {
            submit(market, session, bid);
            bid
        })
        .into_iter()
        .collect()
    }

    fn on_category<M: Market + ?Sized>(&mut self, market: &mut M, category: Category) -> Vec<Bid> {
        debug!(%category, "all quotes updated");
        if category != Category::Flight {
            return Vec::new();
        }
        let Some(session) = self.session.as_mut() else {
            debug!("flight quotes outside a game");
            return Vec::new();
        };

        let elapsed = market.elapsed();
        let elapsed_secs = elapsed.as_secs();
        let outcomes = session.filter_mut().refresh(elapsed_secs);
        let degenerate = outcomes
            .iter()
            .filter(|o| matches!(o, UpdateOutcome::Degenerate { .. }))
            .count();
        debug!(elapsed_secs, degenerate, "flight forecasts refreshed");

        let mut bids = Vec::new();
        for ordinal in 0..session.flights().len() {
            let resource = session.flights()[ordinal];
            let bid = self.policy.flight_bid(
                ordinal,
                resource,
                session.filter().current_price(ordinal),
                session.filter().forecast_for(ordinal),
                market.need(resource),
                elapsed,
            );
            if let Some(bid) = bid {
                submit(market, session, bid);
                bids.push(bid);
            }
        }
        bids
    }
}

fn submit<M: Market + ?Sized>(market: &mut M, session: &mut Session, bid: Bid) {
    debug!(
        resource = %bid.resource,
        quantity = bid.quantity,
        price = bid.price,
        allocated = market.allocation(bid.resource),
        owned = market.owned(bid.resource),
        "submitting bid"
    );
    session.record_bid(&bid);
    market.submit_bid(bid);
}
