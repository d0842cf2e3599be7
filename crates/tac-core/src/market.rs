//! The market collaborator.
//!
//! The agent never talks to an auction server directly. It reads prices,
//! ownership and client preferences through the [`Market`] trait, keeps its
//! allocation targets there, and hands finished [`Bid`]s back to it. The
//! market in turn delivers [`MarketEvent`]s, one at a time.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{ClientPreferences, PreferenceKind};
use crate::resource::{Catalog, Category, Day, Resource, ResourceId, ResourceType};

/// A single-point bid: buy `quantity` units (or sell, if negative) at `price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    /// Auction the bid is placed in.
    pub resource: ResourceId,
    /// Units to buy; negative to sell.
    pub quantity: i32,
    /// Unit price.
    pub price: f64,
}

impl Bid {
    /// Creates a new bid.
    #[must_use]
    pub const fn new(resource: ResourceId, quantity: i32, price: f64) -> Self {
        Self {
            resource,
            quantity,
            price,
        }
    }

    /// Returns true if this bid offers units for sale.
    #[must_use]
    pub const fn is_sell(&self) -> bool {
        self.quantity < 0
    }
}

/// A price quote for one auction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Auction the quote refers to.
    pub resource: ResourceId,
    /// Current ask price.
    pub ask_price: f64,
    /// Units the agent's active bid would win now, if it has one.
    #[serde(default)]
    pub hqw: Option<i32>,
}

impl Quote {
    /// Creates a quote without hypothetical-quantity-won information.
    #[must_use]
    pub const fn new(resource: ResourceId, ask_price: f64) -> Self {
        Self {
            resource,
            ask_price,
            hqw: None,
        }
    }

    /// Sets the hypothetical quantity won.
    #[must_use]
    pub const fn with_hqw(mut self, hqw: i32) -> Self {
        self.hqw = Some(hqw);
        self
    }
}

/// Status information about a bid the market is processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidStatus {
    /// Market-assigned bid id.
    pub bid_id: u64,
    /// Auction the bid was placed in.
    pub resource: ResourceId,
    /// Processing state as reported by the market.
    pub state: String,
}

/// Notifications delivered by the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A new quote for a single auction.
    QuoteUpdated(Quote),
    /// Every auction of a category has been re-quoted.
    CategoryQuotesUpdated {
        /// Category that was refreshed.
        category: Category,
    },
    /// A game started; preferences and catalog are available.
    GameStarted,
    /// The current game ended.
    GameStopped,
    /// An auction closed.
    AuctionClosed {
        /// Closed auction.
        resource: ResourceId,
    },
    /// New information about a submitted bid.
    BidUpdated(BidStatus),
    /// A submitted bid was rejected.
    BidRejected {
        /// The rejected bid.
        status: BidStatus,
        /// Rejection reason.
        reason: String,
    },
    /// A submitted bid contained errors.
    BidError {
        /// The erroneous bid.
        status: BidStatus,
        /// Market command status code.
        code: i32,
    },
    /// Units changed hands.
    Transaction {
        /// Auction of the transaction.
        resource: ResourceId,
        /// Units gained (negative when sold).
        quantity: i32,
        /// Unit price.
        price: f64,
    },
}

/// Market state the agent reads and the sink it submits bids to.
pub trait Market {
    /// Current ask price of an auction.
    fn ask_price(&self, resource: ResourceId) -> f64;

    /// Units the agent currently owns.
    fn owned(&self, resource: ResourceId) -> i32;

    /// Units the agent plans to hold at the end of the game.
    fn allocation(&self, resource: ResourceId) -> i32;

    /// Replaces the allocation target of an auction.
    fn set_allocation(&mut self, resource: ResourceId, quantity: i32);

    /// Time since the game started.
    fn elapsed(&self) -> Duration;

    /// Total game length.
    fn game_length(&self) -> Duration;

    /// Number of clients in the current game.
    fn client_count(&self) -> usize;

    /// A single preference attribute of a client.
    fn client_preference(&self, client: usize, kind: PreferenceKind) -> i32;

    /// Submits a bid. Outcomes arrive later as [`MarketEvent`]s.
    fn submit_bid(&mut self, bid: Bid);

    /// Looks up the auction for a resource on a day.
    fn resource_for(&self, kind: ResourceType, day: Day) -> Option<ResourceId> {
        Catalog.resource_for(kind, day)
    }

    /// Describes an auction.
    fn describe(&self, resource: ResourceId) -> Option<Resource> {
        Catalog.describe(resource)
    }

    /// Every auction in the game.
    fn resources(&self) -> Vec<Resource> {
        Catalog.resources().collect()
    }

    /// Outstanding need: allocation minus owned. Negative means excess.
    fn need(&self, resource: ResourceId) -> i32 {
        self.allocation(resource) - self.owned(resource)
    }

    /// Adds `delta` to the allocation target, never going below zero.
    fn add_allocation(&mut self, resource: ResourceId, delta: i32) {
        let next = (self.allocation(resource) + delta).max(0);
        self.set_allocation(resource, next);
    }

    /// Reads the full preference record of a client.
    fn client(&self, client: usize) -> ClientPreferences {
        let day = |kind| u8::try_from(self.client_preference(client, kind)).unwrap_or(0);
        ClientPreferences {
            arrival: day(PreferenceKind::Arrival),
            departure: day(PreferenceKind::Departure),
            hotel_value: self.client_preference(client, PreferenceKind::HotelValue),
            entertainment: [
                self.client_preference(client, PreferenceKind::E1),
                self.client_preference(client, PreferenceKind::E2),
                self.client_preference(client, PreferenceKind::E3),
            ],
        }
    }
}

/// Per-auction state held by [`InMemoryMarket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Current ask price.
    pub ask_price: f64,
    /// Units owned.
    pub owned: i32,
    /// Allocation target.
    pub allocated: i32,
    /// Hypothetical quantity won by the active bid.
    pub hqw: Option<i32>,
}

/// Simple in-memory market over the standard catalog.
///
/// Records every submitted bid. Used by tests and offline replays.
#[derive(Debug, Clone)]
pub struct InMemoryMarket {
    resources: Vec<ResourceState>,
    clients: Vec<ClientPreferences>,
    elapsed: Duration,
    game_length: Duration,
    submitted: Vec<Bid>,
}

impl InMemoryMarket {
    /// Creates an empty market for a game of the given length.
    #[must_use]
    pub fn new(game_length: Duration) -> Self {
        Self {
            resources: vec![ResourceState::default(); Catalog::AUCTION_COUNT],
            clients: Vec::new(),
            elapsed: Duration::ZERO,
            game_length,
            submitted: Vec::new(),
        }
    }

    /// Adds a client.
    #[must_use]
    pub fn with_client(mut self, client: ClientPreferences) -> Self {
        self.clients.push(client);
        self
    }

    /// Replaces the client roster.
    pub fn set_clients(&mut self, clients: Vec<ClientPreferences>) {
        self.clients = clients;
    }

    /// Moves the game clock.
    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Sets the ask price of an auction.
    pub fn set_ask_price(&mut self, resource: ResourceId, price: f64) {
        if let Some(state) = self.resources.get_mut(resource.index()) {
            state.ask_price = price;
        }
    }

    /// Sets the number of owned units.
    pub fn set_owned(&mut self, resource: ResourceId, owned: i32) {
        if let Some(state) = self.resources.get_mut(resource.index()) {
            state.owned = owned;
        }
    }

    /// Returns the state of an auction.
    #[must_use]
    pub fn state(&self, resource: ResourceId) -> ResourceState {
        self.resources
            .get(resource.index())
            .copied()
            .unwrap_or_default()
    }

    /// Bids submitted so far.
    #[must_use]
    pub fn submitted(&self) -> &[Bid] {
        &self.submitted
    }

    /// Drains the submitted bids.
    pub fn take_submitted(&mut self) -> Vec<Bid> {
        std::mem::take(&mut self.submitted)
    }

    /// Updates market-side state from an event before it reaches the agent.
    ///
    /// Quotes move the ask price and HQW; transactions move ownership. A new
    /// game clears every allocation target.
    pub fn apply(&mut self, event: &MarketEvent) {
        match event {
            MarketEvent::GameStarted => {
                for state in &mut self.resources {
                    state.allocated = 0;
                    state.hqw = None;
                }
            }
            MarketEvent::QuoteUpdated(quote) => {
                if let Some(state) = self.resources.get_mut(quote.resource.index()) {
                    state.ask_price = quote.ask_price;
                    state.hqw = quote.hqw;
                }
            }
            MarketEvent::Transaction {
                resource, quantity, ..
            } => {
                if let Some(state) = self.resources.get_mut(resource.index()) {
                    state.owned += quantity;
                }
            }
            _ => {}
        }
    }
}

impl Market for InMemoryMarket {
    fn ask_price(&self, resource: ResourceId) -> f64 {
        self.state(resource).ask_price
    }

    fn owned(&self, resource: ResourceId) -> i32 {
        self.state(resource).owned
    }

    fn allocation(&self, resource: ResourceId) -> i32 {
        self.state(resource).allocated
    }

    fn set_allocation(&mut self, resource: ResourceId, quantity: i32) {
        if let Some(state) = self.resources.get_mut(resource.index()) {
            state.allocated = quantity.max(0);
        }
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn game_length(&self) -> Duration {
        self.game_length
    }

    fn client_count(&self) -> usize {
        self.clients.len()
    }

    fn client_preference(&self, client: usize, kind: PreferenceKind) -> i32 {
        self.clients.get(client).map_or(0, |prefs| prefs.get(kind))
    }

    fn submit_bid(&mut self, bid: Bid) {
        debug!(resource = %bid.resource, quantity = bid.quantity, price = bid.price, "bid recorded");
        self.submitted.push(bid);
    }
}
