//! Per-game state.
//!
//! Everything the agent learns during a game lives in one [`Session`],
//! created when the game starts and dropped when it stops.

use std::collections::BTreeMap;

use tac_core::{Bid, GameConfig, ResourceId};

use crate::allocation::AllocationPlan;
use crate::belief::BeliefFilter;

/// Mutable state of the current game.
#[derive(Debug, Clone)]
pub struct Session {
    filter: BeliefFilter,
    flights: Vec<ResourceId>,
    plan: AllocationPlan,
    last_bids: BTreeMap<ResourceId, f64>,
}

impl Session {
    /// Starts a session tracking the given flight auctions, in ordinal order.
    #[must_use]
    pub fn new(config: &GameConfig, flights: Vec<ResourceId>) -> Self {
        Self {
            filter: BeliefFilter::new(&config.flight, flights.len()),
            flights,
            plan: AllocationPlan::default(),
            last_bids: BTreeMap::new(),
        }
    }

    /// Ordinal of a flight auction.
    #[must_use]
    pub fn flight_ordinal(&self, resource: ResourceId) -> Option<usize> {
        self.flights.iter().position(|id| *id == resource)
    }

    /// Flight auctions in ordinal order.
    #[must_use]
    pub fn flights(&self) -> &[ResourceId] {
        &self.flights
    }

    /// The flight price filter.
    #[must_use]
    pub const fn filter(&self) -> &BeliefFilter {
        &self.filter
    }

    /// Mutable access to the flight price filter.
    pub fn filter_mut(&mut self) -> &mut BeliefFilter {
        &mut self.filter
    }

    /// Allocation decided at game start.
    #[must_use]
    pub const fn plan(&self) -> &AllocationPlan {
        &self.plan
    }

    /// Stores the allocation plan.
    pub fn set_plan(&mut self, plan: AllocationPlan) {
        self.plan = plan;
    }

    /// Remembers the price of a submitted bid.
    pub fn record_bid(&mut self, bid: &Bid) {
        self.last_bids.insert(bid.resource, bid.price);
    }

    /// Price of the last bid submitted for an auction.
    #[must_use]
    pub fn last_bid_price(&self, resource: ResourceId) -> Option<f64> {
        self.last_bids.get(&resource).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let flights = (0..8).map(ResourceId::new).collect();
        Session::new(&GameConfig::default(), flights)
    }

    #[test]
    fn flight_ordinals_follow_construction_order() {
        let session = session();
        assert_eq!(session.flight_ordinal(ResourceId::new(5)), Some(5));
        assert_eq!(session.flight_ordinal(ResourceId::new(12)), None);
        assert_eq!(session.filter().flight_count(), 8);
    }

    #[test]
    fn last_bid_price_is_overwritten() {
        let mut session = session();
        let id = ResourceId::new(10);
        assert_eq!(session.last_bid_price(id), None);
        session.record_bid(&Bid::new(id, 1, 200.0));
        session.record_bid(&Bid::new(id, 1, 260.0));
        assert_eq!(session.last_bid_price(id), Some(260.0));
    }
}
