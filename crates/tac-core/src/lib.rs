//! # tac-core
//!
//! Market primitives for the TAC travel auction game.
//!
//! This crate provides:
//!
//! - [`ResourceId`] / [`ResourceType`]: auctionable units and the standard [`Catalog`]
//! - [`ClientPreferences`]: per-client stay and preference scores, with [`EntertainmentRanking`]
//! - [`Market`]: the collaborator the agent reads state from and submits bids to
//! - [`MarketEvent`]: the closed set of notifications the market delivers
//! - [`GameConfig`]: tunable constants of the pricing and bidding model

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
pub mod market;
pub mod resource;

pub use client::{ClientPreferences, EntertainmentRanking, PreferenceKind, Priority};
pub use config::GameConfig;
pub use error::CoreError;
pub use market::{Bid, BidStatus, InMemoryMarket, Market, MarketEvent, Quote, ResourceState};
pub use resource::{Catalog, Category, Day, Resource, ResourceId, ResourceType};
