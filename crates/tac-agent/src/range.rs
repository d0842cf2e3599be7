//! Plausible price-change bands for drift hypotheses.
//!
//! Flight prices follow a bounded random walk whose step band narrows as the
//! hidden drift `z` is consumed over the game horizon. For elapsed time `t`
//! the band is built from `x = c + (t / T) * (z - c)`:
//!
//! - `x > 0` gives `[-c, x]`
//! - `x < 0` gives `[x, c]`
//! - `x == 0` gives `[-c, c]`

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use tac_core::config::FlightConfig;

/// Bounds of the hidden drift parameter and the horizon it is spent over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftModel {
    /// `c`: magnitude of the lowest hypothesis and of the band edges.
    pub lower: i32,
    /// `d`: highest hypothesis.
    pub upper: i32,
    /// `T`: horizon in seconds.
    pub horizon_secs: f64,
}

impl DriftModel {
    /// Creates a drift model.
    #[must_use]
    pub const fn new(lower: i32, upper: i32, horizon_secs: f64) -> Self {
        Self {
            lower,
            upper,
            horizon_secs,
        }
    }

    /// Builds the model from flight configuration.
    #[must_use]
    pub fn from_config(config: &FlightConfig) -> Self {
        Self::new(
            config.drift_lower,
            config.drift_upper,
            config.horizon_secs as f64,
        )
    }

    /// Every drift hypothesis, `-c..=d`.
    #[must_use]
    pub const fn candidates(&self) -> RangeInclusive<i32> {
        -self.lower..=self.upper
    }

    /// Number of drift hypotheses.
    #[must_use]
    pub const fn candidate_count(&self) -> usize {
        (self.upper + self.lower + 1) as usize
    }
}

/// Closed interval of plausible price deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    low: f64,
    high: f64,
}

impl Range {
    /// Creates a range from explicit bounds.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Band of plausible deltas at `t` seconds under hypothesis `z`.
    #[must_use]
    pub fn for_hypothesis(t: f64, z: i32, model: &DriftModel) -> Self {
        let c = f64::from(model.lower);
        let x = c + (t / model.horizon_secs) * (f64::from(z) - c);
        if x > 0.0 {
            Self::new(-c, x)
        } else if x < 0.0 {
            Self::new(x, c)
        } else {
            Self::new(-c, c)
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound.
    #[must_use]
    pub const fn high(&self) -> f64 {
        self.high
    }

    /// Inclusive membership test.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Density of a uniform distribution over the band.
    #[must_use]
    pub fn uniform_density(&self) -> f64 {
        1.0 / (self.high - self.low)
    }

    /// Expected delta contributed by one simulation step.
    ///
    /// This is half the band width, `(high - low) / 2`, not the centre of the
    /// band. It is always non-negative, so forward walks never drift down.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.high - self.low) / 2.0
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}
