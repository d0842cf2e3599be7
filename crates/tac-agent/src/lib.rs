//! # tac-agent
//!
//! Decision core of a TAC travel agent.
//!
//! This crate provides:
//!
//! - **Range calculator**: [`Range`] bands of plausible flight price deltas per drift hypothesis
//! - **Belief filter**: [`BeliefFilter`] inferring each flight's hidden drift and forecasting its minimum price
//! - **Allocator**: [`Allocator`] deciding the flights, hotel nights and tickets each client needs
//! - **Bidding policy**: [`BiddingPolicy`] turning allocations and forecasts into bids
//! - **Dispatch**: [`TravelAgent`] routing market events through all of the above
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use tac_agent::TravelAgent;
//! use tac_core::{ClientPreferences, GameConfig, InMemoryMarket, MarketEvent};
//!
//! let mut market = InMemoryMarket::new(Duration::from_secs(540))
//!     .with_client(ClientPreferences::new(1, 4, 80, [10, 50, 30]));
//! let mut agent = TravelAgent::new(GameConfig::default())?;
//!
//! let bids = agent.handle(&mut market, &MarketEvent::GameStarted);
//!
//! // Three good hotel nights and the client's favourite ticket.
//! assert_eq!(bids.len(), 4);
//! # Ok::<(), tac_agent::AgentError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod allocation;
pub mod belief;
pub mod bidding;
pub mod error;
pub mod range;
pub mod session;

pub use error::AgentError;

// Re-exports for convenience
pub use agent::TravelAgent;
pub use allocation::{AllocationPlan, Allocator, ClientPlan, Ticket};
pub use belief::{Belief, BeliefFilter, UpdateOutcome};
pub use bidding::BiddingPolicy;
pub use range::{DriftModel, Range};
pub use session::Session;
