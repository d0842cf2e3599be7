//! Client allocation.
//!
//! Decides, once per game, which units the agent should end up holding:
//! one in-flight and one out-flight per client, a hotel night per day of
//! stay in the tier the client values, and entertainment tickets assigned
//! greedily in three priority passes (best for everyone, then middle, then
//! worst). Supply is judged by owned units only; prices play no part.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tac_core::config::HotelConfig;
use tac_core::{
    ClientPreferences, CoreError, Day, EntertainmentRanking, Market, Priority, ResourceId,
    ResourceType,
};
use tracing::{debug, info, warn};

use crate::error::AgentError;

/// An entertainment ticket assigned to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Preference pass that produced the ticket.
    pub priority: Priority,
    /// Entertainment type.
    pub kind: ResourceType,
    /// Day of the ticket.
    pub day: Day,
    /// True if assigned without available supply.
    pub forced: bool,
}

/// Allocation decided for one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPlan {
    /// Client index.
    pub client: usize,
    /// Preferences the plan was built from.
    pub preferences: ClientPreferences,
    /// Entertainment types from best to worst.
    pub ranking: EntertainmentRanking,
    /// Hotel tier.
    pub hotel: ResourceType,
    /// Days that already hold an entertainment ticket.
    pub consumed_days: BTreeSet<Day>,
    /// Tickets assigned so far.
    pub tickets: Vec<Ticket>,
}

impl ClientPlan {
    /// Returns the ticket assigned for a priority, if any.
    #[must_use]
    pub fn ticket(&self, priority: Priority) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.priority == priority)
    }
}

/// Result of allocating every client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    /// Plans of successfully allocated clients, in client order.
    pub clients: Vec<ClientPlan>,
    /// Clients whose preferences could not be allocated.
    pub skipped: Vec<usize>,
}

impl AllocationPlan {
    /// Returns the plan of a client.
    #[must_use]
    pub fn client(&self, client: usize) -> Option<&ClientPlan> {
        self.clients.iter().find(|plan| plan.client == client)
    }
}

/// Greedy, priority-ordered client allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocator {
    good_hotel_threshold: i32,
}

impl Allocator {
    /// Creates an allocator from hotel configuration.
    #[must_use]
    pub const fn new(config: &HotelConfig) -> Self {
        Self {
            good_hotel_threshold: config.good_hotel_threshold,
        }
    }

    /// Hotel tier for a client's hotel value.
    #[must_use]
    pub const fn hotel_type(&self, hotel_value: i32) -> ResourceType {
        if hotel_value > self.good_hotel_threshold {
            ResourceType::GoodHotel
        } else {
            ResourceType::CheapHotel
        }
    }

    /// Allocates every client of the market's current game.
    ///
    /// Clients with impossible stays are skipped and reported in
    /// [`AllocationPlan::skipped`]; the rest are still allocated.
    pub fn allocate<M: Market + ?Sized>(&self, market: &mut M) -> AllocationPlan {
        let mut plan = AllocationPlan::default();

        for client in 0..market.client_count() {
            let preferences = market.client(client);
            match self.plan_client(market, client, preferences) {
                Ok(mut client_plan) => {
                    self.assign_logged(market, &mut client_plan, Priority::Best);
                    plan.clients.push(client_plan);
                }
                Err(e) => {
                    warn!(client, error = %e, "skipping client");
                    plan.skipped.push(client);
                }
            }
        }

        for priority in [Priority::Middle, Priority::Worst] {
            for client_plan in &mut plan.clients {
                self.assign_logged(market, client_plan, priority);
            }
        }

        info!(
            clients = plan.clients.len(),
            skipped = plan.skipped.len(),
            "allocation complete"
        );
        plan
    }

    /// Allocates flights and hotel nights for one client.
    ///
    /// Every auction is resolved before any allocation changes, so a failing
    /// client leaves the market untouched.
    pub fn plan_client<M: Market + ?Sized>(
        &self,
        market: &mut M,
        client: usize,
        preferences: ClientPreferences,
    ) -> Result<ClientPlan, AgentError> {
        preferences.validate(client)?;

        let hotel = self.hotel_type(preferences.hotel_value);
        let mut required = vec![
            lookup(market, ResourceType::InFlight, preferences.arrival)?,
            lookup(market, ResourceType::OutFlight, preferences.departure)?,
        ];
        for day in preferences.stay_days() {
            required.push(lookup(market, hotel, day)?);
        }

        for resource in required {
            market.add_allocation(resource, 1);
        }
        debug!(client, %hotel, nights = preferences.nights(), "flights and hotel allocated");

        Ok(ClientPlan {
            client,
            preferences,
            ranking: preferences.ranking(),
            hotel,
            consumed_days: BTreeSet::new(),
            tickets: Vec::new(),
        })
    }

    /// Assigns the client's entertainment type of the given priority.
    ///
    /// Takes the first free stay day whose allocation is still below the
    /// owned supply. Without such a day the best preference is forced onto
    /// the arrival day; lower preferences go unassigned.
    pub fn assign<M: Market + ?Sized>(
        &self,
        market: &mut M,
        plan: &mut ClientPlan,
        priority: Priority,
    ) -> Result<Option<Ticket>, AgentError> {
        let kind = plan.ranking.at(priority);

        for day in plan.preferences.stay_days() {
            if plan.consumed_days.contains(&day) {
                continue;
            }
            let resource = lookup(market, kind, day)?;
            if market.allocation(resource) < market.owned(resource) {
                market.add_allocation(resource, 1);
                return Ok(Some(record(plan, priority, kind, day, false)));
            }
        }

        if priority.is_mandatory() {
            let day = plan.preferences.arrival;
            let resource = lookup(market, kind, day)?;
            market.add_allocation(resource, 1);
            return Ok(Some(record(plan, priority, kind, day, true)));
        }

        Ok(None)
    }

    fn assign_logged<M: Market + ?Sized>(
        &self,
        market: &mut M,
        plan: &mut ClientPlan,
        priority: Priority,
    ) {
        match self.assign(market, plan, priority) {
            Ok(Some(ticket)) => debug!(
                client = plan.client,
                ?priority,
                kind = %ticket.kind,
                day = ticket.day,
                forced = ticket.forced,
                "entertainment assigned"
            ),
            Ok(None) => debug!(client = plan.client, ?priority, "no entertainment available"),
            Err(e) => warn!(client = plan.client, ?priority, error = %e, "entertainment assignment failed"),
        }
    }
}

fn lookup<M: Market + ?Sized>(
    market: &M,
    kind: ResourceType,
    day: Day,
) -> Result<ResourceId, AgentError> {
    market
        .resource_for(kind, day)
        .ok_or_else(|| AgentError::Core(CoreError::UnknownResource { kind, day }))
}

fn record(plan: &mut ClientPlan, priority: Priority, kind: ResourceType, day: Day, forced: bool) -> Ticket {
    let ticket = Ticket {
        priority,
        kind,
        day,
        forced,
    };
    plan.consumed_days.insert(day);
    plan.tickets.push(ticket);
    ticket
}
