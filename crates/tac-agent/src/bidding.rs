//! Bidding rules.
//!
//! Every rule yields at most one single-point [`Bid`] per auction:
//! - Hotels: outbid the ask by a fixed markup while the active bid would not
//!   win the full allocation
//! - Entertainment: buy or sell the outstanding need at a price interpolated
//!   over the game clock
//! - Flights: buy the outstanding need once the price is close to the
//!   forecast minimum, or the game is nearly over, subject to a per-flight
//!   time gate
//! - Game start: fixed opening prices for hotels and entertainment only

use std::time::Duration;

use tac_core::config::{EntertainmentConfig, FlightConfig, HotelConfig};
use tac_core::{Bid, Category, GameConfig, Quote, Resource, ResourceId};
use tracing::trace;

/// Bidding rules parameterized by the game configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BiddingPolicy {
    flight: FlightConfig,
    hotel: HotelConfig,
    entertainment: EntertainmentConfig,
}

impl BiddingPolicy {
    /// Creates the policy from configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            flight: config.flight.clone(),
            hotel: config.hotel.clone(),
            entertainment: config.entertainment.clone(),
        }
    }

    /// Bid in response to a hotel quote.
    ///
    /// Only fires when the quote carries a hypothetical quantity won that
    /// falls short of the allocation.
    #[must_use]
    pub fn hotel_bid(&self, quote: &Quote, allocation: i32) -> Option<Bid> {
        let hqw = quote.hqw?;
        if allocation <= 0 || hqw >= allocation {
            return None;
        }
        Some(Bid::new(
            quote.resource,
            allocation,
            quote.ask_price + self.hotel.markup,
        ))
    }

    /// Entertainment price for a signed need at a point of the game.
    ///
    /// Sell prices fall from `sell_start` to `sell_end`; buy prices rise from
    /// `buy_start` to `buy_end`. Time is clamped to the game length.
    #[must_use]
    pub fn entertainment_price(&self, need: i32, elapsed: Duration, game_length: Duration) -> f64 {
        let progress = if game_length.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / game_length.as_secs_f64()).clamp(0.0, 1.0)
        };
        let (start, end) = if need < 0 {
            (self.entertainment.sell_start, self.entertainment.sell_end)
        } else {
            (self.entertainment.buy_start, self.entertainment.buy_end)
        };
        start + (end - start) * progress
    }

    /// Bid in response to an entertainment quote.
    #[must_use]
    pub fn entertainment_bid(
        &self,
        resource: ResourceId,
        need: i32,
        elapsed: Duration,
        game_length: Duration,
    ) -> Option<Bid> {
        if need == 0 {
            return None;
        }
        Some(Bid::new(
            resource,
            need,
            self.entertainment_price(need, elapsed, game_length),
        ))
    }

    /// Bid for a flight after a forecast refresh.
    ///
    /// `ordinal` staggers the earliest bidding time across flights. A flight
    /// that has never been quoted is not bid on.
    #[must_use]
    pub fn flight_bid(
        &self,
        ordinal: usize,
        resource: ResourceId,
        price: Option<f64>,
        forecast: Option<f64>,
        need: i32,
        elapsed: Duration,
    ) -> Option<Bid> {
        let price = price?;
        let final_stretch = elapsed > Duration::from_secs(self.flight.final_stretch_secs);
        let near_minimum =
            forecast.is_some_and(|minimum| price < (1.0 + self.flight.forecast_tolerance) * minimum);
        let gate_open = elapsed > Duration::from_secs(self.flight.gate_secs(ordinal));

        trace!(
            flight = ordinal,
            price,
            ?forecast,
            need,
            final_stretch,
            near_minimum,
            gate_open,
            "flight bid check"
        );

        if (final_stretch || near_minimum) && need > 0 && gate_open {
            Some(Bid::new(resource, need, price))
        } else {
            None
        }
    }

    /// Opening bid placed at game start. Flights are never bid on here.
    #[must_use]
    pub fn opening_bid(&self, resource: &Resource, need: i32) -> Option<Bid> {
        let price = match resource.category() {
            Category::Flight => return None,
            Category::Hotel if need > 0 => self.hotel.opening_price,
            Category::Hotel => return None,
            Category::Entertainment if need < 0 => self.entertainment.opening_sell_price,
            Category::Entertainment if need > 0 => self.entertainment.opening_buy_price,
            Category::Entertainment => return None,
        };
        Some(Bid::new(resource.id, need, price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tac_core::{Catalog, ResourceType};
    use test_case::test_case;

    const LENGTH: Duration = Duration::from_secs(540);

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn policy() -> BiddingPolicy {
        BiddingPolicy::new(&GameConfig::default())
    }

    fn resource(kind: ResourceType, day: u8) -> Resource {
        let id = Catalog.resource_for(kind, day).expect("catalog resource");
        Catalog.describe(id).expect("described")
    }

    #[test]
    fn hotel_outbid_when_winning_too_few() {
        let quote = Quote::new(ResourceId::new(12), 110.0).with_hqw(1);
        let bid = policy().hotel_bid(&quote, 3).expect("bid");
        assert_eq!(bid.quantity, 3);
        assert_eq!(bid.price, 160.0);
    }

    #[test_case(Some(3), 3 ; "already winning allocation")]
    #[test_case(Some(4), 3 ; "winning more than allocation")]
    #[test_case(Some(0), 0 ; "nothing allocated")]
    #[test_case(None, 2 ; "no active bid")]
    fn hotel_no_bid(hqw: Option<i32>, allocation: i32) {
        let quote = Quote {
            resource: ResourceId::new(9),
            ask_price: 90.0,
            hqw,
        };
        assert!(policy().hotel_bid(&quote, allocation).is_none());
    }

    #[test_case(-3, 0, 200.0 ; "sell at game start")]
    #[test_case(-3, 540, 80.0 ; "sell at game end")]
    #[test_case(-1, 270, 140.0 ; "sell halfway")]
    #[test_case(2, 0, 50.0 ; "buy at game start")]
    #[test_case(2, 540, 150.0 ; "buy at game end")]
    #[test_case(1, 135, 75.0 ; "buy a quarter in")]
    #[test_case(1, 900, 150.0 ; "buy after overrun")]
    fn entertainment_interpolation(need: i32, secs: u64, expected: f64) {
        let price = policy().entertainment_price(need, Duration::from_secs(secs), LENGTH);
        assert!((price - expected).abs() < 1e-9, "got {price}");
    }

    #[test]
    fn entertainment_bid_carries_signed_need() {
        let bid = policy()
            .entertainment_bid(ResourceId::new(20), -2, Duration::ZERO, LENGTH)
            .expect("bid");
        assert!(bid.is_sell());
        assert_eq!(bid.quantity, -2);
        assert!(policy()
            .entertainment_bid(ResourceId::new(20), 0, Duration::ZERO, LENGTH)
            .is_none());
    }

    #[test]
    fn flight_bid_near_forecast() {
        let bid = policy().flight_bid(0, ResourceId::new(0), Some(310.0), Some(300.0), 2, secs(30));
        assert_eq!(bid, Some(Bid::new(ResourceId::new(0), 2, 310.0)));
    }

    #[test]
    fn flight_waits_when_price_above_forecast() {
        let bid = policy().flight_bid(0, ResourceId::new(0), Some(400.0), Some(300.0), 2, secs(30));
        assert!(bid.is_none());
    }

    #[test]
    fn flight_bought_in_final_stretch() {
        let bid = policy().flight_bid(7, ResourceId::new(7), Some(700.0), Some(300.0), 1, secs(501));
        assert_eq!(bid.map(|b| b.price), Some(700.0));
    }

    #[test_case(0, 20 ; "first flight at its gate")]
    #[test_case(3, 50 ; "fourth flight at its gate")]
    fn flight_gate_is_exclusive(ordinal: usize, gate_secs: u64) {
        let id = ResourceId::new(ordinal as u8);
        let gate = secs(gate_secs);
        let just_after = gate + Duration::from_millis(1);
        assert!(policy().flight_bid(ordinal, id, Some(300.0), Some(300.0), 1, gate).is_none());
        assert!(policy().flight_bid(ordinal, id, Some(300.0), Some(300.0), 1, just_after).is_some());
    }

    #[test]
    fn fractional_seconds_count_toward_gate_and_final_stretch() {
        let id = ResourceId::new(0);
        let gate = Duration::from_millis(20_500);
        assert!(policy().flight_bid(0, id, Some(300.0), Some(300.0), 1, gate).is_some());

        let stretch = Duration::from_millis(500_500);
        assert!(policy().flight_bid(0, id, Some(700.0), None, 1, stretch).is_some());
    }

    #[test]
    fn flight_without_need_or_quote() {
        let id = ResourceId::new(1);
        assert!(policy().flight_bid(1, id, Some(200.0), Some(300.0), 0, secs(520)).is_none());
        assert!(policy().flight_bid(1, id, None, Some(300.0), 2, secs(520)).is_none());
    }

    #[test]
    fn flight_without_forecast_waits_for_final_stretch() {
        let id = ResourceId::new(2);
        assert!(policy().flight_bid(2, id, Some(200.0), None, 1, secs(200)).is_none());
        assert!(policy().flight_bid(2, id, Some(200.0), None, 1, secs(510)).is_some());
    }

    #[test]
    fn opening_bids() {
        let policy = policy();
        let hotel = resource(ResourceType::CheapHotel, 2);
        let ent = resource(ResourceType::Museum, 3);
        let flight = resource(ResourceType::InFlight, 1);

        assert_eq!(policy.opening_bid(&hotel, 2), Some(Bid::new(hotel.id, 2, 200.0)));
        assert_eq!(policy.opening_bid(&hotel, -1), None);
        assert_eq!(policy.opening_bid(&ent, 2), Some(Bid::new(ent.id, 2, 50.0)));
        assert_eq!(policy.opening_bid(&ent, -1), Some(Bid::new(ent.id, -1, 200.0)));
        assert_eq!(policy.opening_bid(&ent, 0), None);
        assert_eq!(policy.opening_bid(&flight, 3), None);
    }
}
