//! Flight price belief filter.
//!
//! Each flight carries a discrete distribution over the hidden drift `z`.
//! Observed price deltas falsify hypotheses whose [`Range`] cannot explain
//! them; survivors are reweighted by their band density and renormalized.
//! The surviving distribution then weights simulated forward price walks
//! into an expected minimum price for the rest of the game.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tac_core::config::FlightConfig;
use tracing::{debug, trace, warn};

use crate::range::{DriftModel, Range};

/// Probability mass over the live drift hypotheses of one flight.
///
/// Keys iterate in ascending order. The support only ever shrinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    masses: BTreeMap<i32, f64>,
}

impl Belief {
    /// Uniform belief over every hypothesis of the model.
    #[must_use]
    pub fn uniform(model: &DriftModel) -> Self {
        let mass = 1.0 / model.candidate_count() as f64;
        Self {
            masses: model.candidates().map(|z| (z, mass)).collect(),
        }
    }

    /// Number of live hypotheses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Returns true if no hypothesis is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// Mass of a hypothesis, if it is still live.
    #[must_use]
    pub fn mass(&self, z: i32) -> Option<f64> {
        self.masses.get(&z).copied()
    }

    /// Sum of all masses.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.masses.values().sum()
    }

    /// Live hypotheses and their masses, ascending by `z`.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.masses.iter().map(|(z, p)| (*z, *p))
    }

    /// Conditions the belief on an observed delta at `t` seconds.
    ///
    /// Returns `None` when no hypothesis can explain the delta, or when the
    /// surviving weights cannot be normalized to a finite distribution.
    #[must_use]
    pub fn observe(&self, delta: f64, t: f64, model: &DriftModel) -> Option<Self> {
        let survivors: Vec<(i32, f64)> = self
            .iter()
            .filter_map(|(z, p)| {
                let range = Range::for_hypothesis(t, z, model);
                if range.contains(delta) {
                    Some((z, p * range.uniform_density()))
                } else {
                    trace!(z, delta, %range, "hypothesis falsified");
                    None
                }
            })
            .collect();

        let total: f64 = survivors.iter().map(|(_, p)| p).sum();
        if survivors.is_empty() || !(total > 0.0 && total.is_finite()) {
            return None;
        }

        Some(Self {
            masses: survivors.into_iter().map(|(z, p)| (z, p / total)).collect(),
        })
    }
}

/// Result of conditioning one flight's belief during an update pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// No new observation arrived since the last pass.
    Unchanged,
    /// Observations were applied.
    Reweighted {
        /// Hypotheses still live.
        survivors: usize,
        /// Hypotheses discarded by this pass.
        discarded: usize,
    },
    /// An observation falsified every hypothesis; the prior was kept.
    Degenerate {
        /// Hypotheses still live after keeping the prior.
        survivors: usize,
    },
}

/// Latest price and unconsumed deltas of one flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct FlightPrice {
    current: Option<f64>,
    pending: VecDeque<f64>,
}

/// Per-flight beliefs, price observations and forecasts for one game.
#[derive(Debug, Clone)]
pub struct BeliefFilter {
    model: DriftModel,
    config: FlightConfig,
    beliefs: Vec<Belief>,
    prices: Vec<FlightPrice>,
    forecasts: Vec<Option<f64>>,
}

impl BeliefFilter {
    /// Creates a filter with uniform beliefs for `flights` flights.
    #[must_use]
    pub fn new(config: &FlightConfig, flights: usize) -> Self {
        let model = DriftModel::from_config(config);
        Self {
            model,
            config: config.clone(),
            beliefs: vec![Belief::uniform(&model); flights],
            prices: vec![FlightPrice::default(); flights],
            forecasts: vec![None; flights],
        }
    }

    /// Number of flights tracked.
    #[must_use]
    pub fn flight_count(&self) -> usize {
        self.beliefs.len()
    }

    /// The drift model in use.
    #[must_use]
    pub const fn model(&self) -> &DriftModel {
        &self.model
    }

    /// Records a quoted price and returns the delta against the previous one.
    ///
    /// The first quote of a flight yields a zero delta. Unknown ordinals are ignored.
    pub fn observe_price(&mut self, ordinal: usize, price: f64) -> f64 {
        let Some(flight) = self.prices.get_mut(ordinal) else {
            return 0.0;
        };
        let delta = flight.current.map_or(0.0, |previous| price - previous);
        flight.current = Some(price);
        flight.pending.push_back(delta);
        delta
    }

    /// Last quoted price of a flight.
    #[must_use]
    pub fn current_price(&self, ordinal: usize) -> Option<f64> {
        self.prices.get(ordinal).and_then(|flight| flight.current)
    }

    /// Deltas observed but not yet applied to the belief.
    #[must_use]
    pub fn pending_deltas(&self, ordinal: usize) -> Vec<f64> {
        self.prices
            .get(ordinal)
            .map(|flight| flight.pending.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Belief of a flight.
    #[must_use]
    pub fn belief(&self, ordinal: usize) -> Option<&Belief> {
        self.beliefs.get(ordinal)
    }

    /// Latest expected minimum price of a flight.
    #[must_use]
    pub fn forecast_for(&self, ordinal: usize) -> Option<f64> {
        self.forecasts.get(ordinal).copied().flatten()
    }

    /// Applies every pending delta, in arrival order, to each flight's belief.
    ///
    /// Each delta is consumed once. A delta that falsifies every hypothesis is
    /// dropped and the belief before it is kept.
    pub fn update(&mut self, elapsed_secs: u64) -> Vec<UpdateOutcome> {
        let t = elapsed_secs as f64;
        let model = self.model;

        self.beliefs
            .iter_mut()
            .zip(self.prices.iter_mut())
            .enumerate()
            .map(|(ordinal, (belief, flight))| {
                if flight.pending.is_empty() {
                    return UpdateOutcome::Unchanged;
                }

                let before = belief.len();
                let mut degenerate = false;
                while let Some(delta) = flight.pending.pop_front() {
                    if let Some(next) = belief.observe(delta, t, &model) {
                        *belief = next;
                    } else {
                        warn!(
                            flight = ordinal,
                            delta,
                            elapsed_secs,
                            "no drift hypothesis explains delta; keeping prior belief"
                        );
                        degenerate = true;
                    }
                }

                debug!(flight = ordinal, survivors = belief.len(), "belief updated");
                if degenerate {
                    UpdateOutcome::Degenerate {
                        survivors: belief.len(),
                    }
                } else {
                    UpdateOutcome::Reweighted {
                        survivors: belief.len(),
                        discarded: before - belief.len(),
                    }
                }
            })
            .collect()
    }

    /// Recomputes the expected minimum price of every quoted flight.
    ///
    /// Flights that have never been quoted keep no forecast.
    pub fn forecast(&mut self, elapsed_secs: u64) {
        for ordinal in 0..self.beliefs.len() {
            let Some(price) = self.prices[ordinal].current else {
                continue;
            };
            let expected = self.expected_minimum(&self.beliefs[ordinal], price, elapsed_secs);
            debug!(flight = ordinal, price, expected, "forecast updated");
            self.forecasts[ordinal] = Some(expected);
        }
    }

    /// Runs a full update pass, then a forecast pass.
    pub fn refresh(&mut self, elapsed_secs: u64) -> Vec<UpdateOutcome> {
        let outcomes = self.update(elapsed_secs);
        self.forecast(elapsed_secs);
        outcomes
    }

    /// Probability-weighted minimum of the forward walks of every hypothesis.
    #[must_use]
    pub fn expected_minimum(&self, belief: &Belief, price: f64, elapsed_secs: u64) -> f64 {
        let expected: f64 = belief
            .iter()
            .map(|(z, p)| p * self.walk_minimum(price, elapsed_secs, z))
            .sum();
        self.config.clamp_price(expected)
    }

    /// Lowest price reached when walking from `price` to the horizon under `z`.
    fn walk_minimum(&self, price: f64, elapsed_secs: u64, z: i32) -> f64 {
        let step_secs = self.config.simulation_step_secs.max(1) as usize;
        let mut current = price;
        let mut minimum = f64::INFINITY;

        for tau in (elapsed_secs..=self.config.horizon_secs).step_by(step_secs) {
            let step = Range::for_hypothesis(tau as f64, z, &self.model).midpoint();
            current = self.config.clamp_price(current + step);
            minimum = minimum.min(current);
        }

        if minimum.is_finite() {
            minimum
        } else {
            self.config.clamp_price(price)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    fn filter() -> BeliefFilter {
        BeliefFilter::new(&FlightConfig::default(), 8)
    }

    #[test]
    fn uniform_belief_sums_to_one() {
        let model = DriftModel::new(10, 30, 540.0);
        let belief = Belief::uniform(&model);
        assert_eq!(belief.len(), 41);
        assert!((belief.total() - 1.0).abs() < EPSILON);
        assert_eq!(belief.mass(-10), Some(1.0 / 41.0));
        assert_eq!(belief.mass(31), None);
    }

    #[test]
    fn observe_discards_falsified_hypotheses() {
        let model = DriftModel::new(10, 30, 540.0);
        let belief = Belief::uniform(&model);
        // At the horizon the band for z is [-10, z] for z > 0; a delta of 20
        // is only explained by z >= 20.
        let next = belief.observe(20.0, 540.0, &model).expect("survivors");
        assert_eq!(next.len(), 11);
        assert!(next.iter().all(|(z, _)| z >= 20));
        assert!((next.total() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn observe_weights_by_density() {
        let model = DriftModel::new(10, 30, 540.0);
        let belief = Belief::uniform(&model);
        let next = belief.observe(0.0, 540.0, &model).expect("survivors");
        // Narrower bands are denser, so z = 1 outweighs z = 30.
        let narrow = next.mass(1).expect("z=1 live");
        let wide = next.mass(30).expect("z=30 live");
        assert!(narrow > wide);
    }

    #[test]
    fn observe_returns_none_when_nothing_survives() {
        let model = DriftModel::new(10, 30, 540.0);
        let belief = Belief::uniform(&model);
        assert!(belief.observe(500.0, 100.0, &model).is_none());
    }

    #[test]
    fn observe_rejects_unnormalizable_weights() {
        // With c = 0 every band at t = 0 is the single point 0, whose density
        // is infinite.
        let model = DriftModel::new(0, 30, 540.0);
        let belief = Belief::uniform(&model);
        assert!(belief.observe(0.0, 0.0, &model).is_none());
    }

    #[test]
    fn zero_width_bands_keep_prior_and_finite_forecast() {
        let config = FlightConfig {
            drift_lower: 0,
            ..FlightConfig::default()
        };
        let mut filter = BeliefFilter::new(&config, 8);
        let prior = filter.belief(0).cloned().expect("belief");

        filter.observe_price(0, 300.0);
        let outcomes = filter.refresh(0);

        assert_eq!(
            outcomes[0],
            UpdateOutcome::Degenerate {
                survivors: prior.len()
            }
        );
        assert_eq!(filter.belief(0), Some(&prior));
        let forecast = filter.forecast_for(0).expect("forecast");
        assert!(forecast.is_finite());
        assert!((150.0..=800.0).contains(&forecast));
    }

    #[test]
    fn first_quote_has_zero_delta() {
        let mut filter = filter();
        assert_eq!(filter.observe_price(2, 300.0), 0.0);
        assert_eq!(filter.observe_price(2, 305.0), 5.0);
        assert_eq!(filter.observe_price(2, 298.0), -7.0);
        assert_eq!(filter.current_price(2), Some(298.0));
        assert_eq!(filter.pending_deltas(2), vec![0.0, 5.0, -7.0]);
    }

    #[test]
    fn unknown_ordinal_is_ignored() {
        let mut filter = filter();
        assert_eq!(filter.observe_price(42, 300.0), 0.0);
        assert_eq!(filter.current_price(42), None);
    }

    #[test]
    fn update_consumes_deltas_once() {
        let mut filter = filter();
        filter.observe_price(0, 300.0);
        filter.observe_price(0, 320.0);

        let first = filter.update(540);
        assert!(matches!(first[0], UpdateOutcome::Reweighted { discarded, .. } if discarded > 0));
        assert_eq!(first[1], UpdateOutcome::Unchanged);
        assert!(filter.pending_deltas(0).is_empty());

        let snapshot = filter.belief(0).cloned();
        let second = filter.update(540);
        assert_eq!(second[0], UpdateOutcome::Unchanged);
        assert_eq!(filter.belief(0).cloned(), snapshot);
    }

    #[test]
    fn degenerate_update_keeps_prior() {
        let mut filter = filter();
        filter.observe_price(1, 300.0);
        filter.update(60);
        let prior = filter.belief(1).cloned().expect("belief");

        filter.observe_price(1, 790.0);
        let outcomes = filter.update(60);
        assert_eq!(
            outcomes[1],
            UpdateOutcome::Degenerate {
                survivors: prior.len()
            }
        );
        assert_eq!(filter.belief(1), Some(&prior));
        assert!((prior.total() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn forecast_only_for_quoted_flights() {
        let mut filter = filter();
        filter.observe_price(3, 400.0);
        filter.refresh(100);
        assert!(filter.forecast_for(3).is_some());
        assert!(filter.forecast_for(4).is_none());
    }

    #[test]
    fn forecast_after_horizon_is_current_price() {
        let mut filter = filter();
        filter.observe_price(0, 432.0);
        filter.refresh(600);
        let forecast = filter.forecast_for(0).expect("forecast");
        assert!((forecast - 432.0).abs() < EPSILON);
    }

    #[test]
    fn forecast_clamps_to_floor() {
        let mut filter = filter();
        filter.observe_price(5, 20.0);
        filter.forecast(530);
        let forecast = filter.forecast_for(5).expect("forecast");
        assert!(forecast >= 150.0);
    }

    #[test]
    fn forecast_overwrites_previous_value() {
        let mut filter = filter();
        filter.observe_price(6, 300.0);
        filter.refresh(10);
        let early = filter.forecast_for(6).expect("forecast");
        filter.observe_price(6, 700.0);
        filter.refresh(20);
        let later = filter.forecast_for(6).expect("forecast");
        assert!(later > early);
    }

    #[test]
    fn midpoint_walk_never_falls() {
        // Half-width steps are non-negative, so the walk minimum is its first step.
        let filter = filter();
        let belief = Belief::uniform(filter.model());
        let expected = filter.expected_minimum(&belief, 300.0, 0);
        assert!(expected >= 300.0 - EPSILON);
    }

    proptest! {
        #[test]
        fn masses_stay_normalized_and_support_shrinks(
            steps in prop::collection::vec((-12.0f64..12.0, 0u64..540), 1..12),
        ) {
            let mut filter = filter();
            let mut price = 400.0;
            filter.observe_price(0, price);
            let mut previous = filter.belief(0).map_or(0, Belief::len);
            let mut elapsed = 0;

            for (delta, advance) in steps {
                elapsed = (elapsed + advance).min(540);
                price += delta;
                filter.observe_price(0, price);
                filter.update(elapsed);

                let belief = filter.belief(0).expect("belief");
                prop_assert!(!belief.is_empty());
                prop_assert!((belief.total() - 1.0).abs() < EPSILON);
                prop_assert!(belief.len() <= previous);
                previous = belief.len();
            }
        }

        #[test]
        fn forecast_within_price_band(price in 0.0f64..1_500.0, elapsed in 0u64..700) {
            let mut filter = filter();
            filter.observe_price(7, price);
            filter.refresh(elapsed);
            let forecast = filter.forecast_for(7).expect("forecast");
            prop_assert!(forecast >= 150.0);
            prop_assert!(forecast <= 800.0);
        }
    }
}
