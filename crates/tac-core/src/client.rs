//! Client preferences and entertainment ranking.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::resource::{Day, ResourceType};

/// Attribute of a client's preference record, as queried from the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKind {
    /// Preferred arrival day.
    Arrival,
    /// Preferred departure day.
    Departure,
    /// Bonus for staying in the good hotel.
    HotelValue,
    /// Alligator wrestling value.
    E1,
    /// Amusement park value.
    E2,
    /// Museum value.
    E3,
}

impl PreferenceKind {
    /// All preference attributes.
    pub const ALL: [Self; 6] = [
        Self::Arrival,
        Self::Departure,
        Self::HotelValue,
        Self::E1,
        Self::E2,
        Self::E3,
    ];
}

/// The preference record of a single client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPreferences {
    /// Arrival day (first night in town).
    pub arrival: Day,
    /// Departure day (exclusive end of the stay).
    pub departure: Day,
    /// Value the client attaches to the good hotel.
    pub hotel_value: i32,
    /// Entertainment values (e1, e2, e3).
    pub entertainment: [i32; 3],
}

impl ClientPreferences {
    /// Creates a new preference record.
    #[must_use]
    pub const fn new(arrival: Day, departure: Day, hotel_value: i32, entertainment: [i32; 3]) -> Self {
        Self {
            arrival,
            departure,
            hotel_value,
            entertainment,
        }
    }

    /// Returns the value of a single attribute.
    #[must_use]
    pub fn get(&self, kind: PreferenceKind) -> i32 {
        match kind {
            PreferenceKind::Arrival => i32::from(self.arrival),
            PreferenceKind::Departure => i32::from(self.departure),
            PreferenceKind::HotelValue => self.hotel_value,
            PreferenceKind::E1 => self.entertainment[0],
            PreferenceKind::E2 => self.entertainment[1],
            PreferenceKind::E3 => self.entertainment[2],
        }
    }

    /// Days the client spends in town: arrival inclusive, departure exclusive.
    pub fn stay_days(&self) -> impl Iterator<Item = Day> + use<> {
        self.arrival..self.departure
    }

    /// Number of hotel nights the stay requires.
    #[must_use]
    pub const fn nights(&self) -> u8 {
        self.departure.saturating_sub(self.arrival)
    }

    /// Checks that the stay fits the auction calendar.
    pub fn validate(&self, client: usize) -> Result<(), CoreError> {
        let invalid = |reason: String| CoreError::InvalidPreferences { client, reason };

        if self.departure <= self.arrival {
            return Err(invalid(format!(
                "departure day {} is not after arrival day {}",
                self.departure, self.arrival
            )));
        }
        let inbound = ResourceType::InFlight;
        if self.arrival < inbound.first_day() || self.arrival > inbound.last_day() {
            return Err(invalid(format!("arrival day {} has no flight", self.arrival)));
        }
        let outbound = ResourceType::OutFlight;
        if self.departure < outbound.first_day() || self.departure > outbound.last_day() {
            return Err(invalid(format!("departure day {} has no flight", self.departure)));
        }
        Ok(())
    }

    /// Ranks the three entertainment types from most to least valued.
    #[must_use]
    pub fn ranking(&self) -> EntertainmentRanking {
        EntertainmentRanking::from_scores(self.entertainment)
    }
}

/// Priority of an entertainment preference during allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Highest-valued type; always assigned.
    Best,
    /// Second-valued type; best effort.
    Middle,
    /// Lowest-valued type; best effort.
    Worst,
}

impl Priority {
    /// Priorities in pass order.
    pub const ALL: [Self; 3] = [Self::Best, Self::Middle, Self::Worst];

    /// Returns the zero-based rank of this priority.
    #[must_use]
    pub const fn rank(self) -> usize {
        match self {
            Self::Best => 0,
            Self::Middle => 1,
            Self::Worst => 2,
        }
    }

    /// Returns true if a ticket must be assigned even without supply.
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        matches!(self, Self::Best)
    }
}

/// Entertainment types ordered from best to worst.
///
/// Always a permutation of [`ResourceType::ENTERTAINMENT`]. Equal scores keep
/// the catalog order (e1, e2, e3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntertainmentRanking([ResourceType; 3]);

impl EntertainmentRanking {
    /// Ranks entertainment types by their scores (e1, e2, e3).
    #[must_use]
    pub fn from_scores(scores: [i32; 3]) -> Self {
        let mut order = [0_usize, 1, 2];
        order.sort_by(|a, b| scores[*b].cmp(&scores[*a]));
        Self(order.map(|i| ResourceType::ENTERTAINMENT[i]))
    }

    /// Returns the type at the given priority.
    #[must_use]
    pub const fn at(&self, priority: Priority) -> ResourceType {
        self.0[priority.rank()]
    }

    /// Most valued type.
    #[must_use]
    pub const fn best(&self) -> ResourceType {
        self.0[0]
    }

    /// Second most valued type.
    #[must_use]
    pub const fn middle(&self) -> ResourceType {
        self.0[1]
    }

    /// Least valued type.
    #[must_use]
    pub const fn worst(&self) -> ResourceType {
        self.0[2]
    }

    /// Returns the types from best to worst.
    #[must_use]
    pub const fn as_array(&self) -> [ResourceType; 3] {
        self.0
    }
}
