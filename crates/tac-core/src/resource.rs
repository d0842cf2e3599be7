//! Auctionable resources and the auction catalog.
//!
//! A resource is identified by its [`ResourceType`] (which implies the
//! [`Category`]) and a game day. The [`Catalog`] maps those tuples to the
//! market's auction ids using the standard TAC layout:
//!
//! | ids   | resource                 | days |
//! |-------|--------------------------|------|
//! | 0–3   | in-flight                | 1–4  |
//! | 4–7   | out-flight               | 2–5  |
//! | 8–11  | cheap hotel              | 1–4  |
//! | 12–15 | good hotel               | 1–4  |
//! | 16–19 | alligator wrestling      | 1–4  |
//! | 20–23 | amusement                | 1–4  |
//! | 24–27 | museum                   | 1–4  |

use std::fmt;

use serde::{Deserialize, Serialize};

/// A game day (1-based).
pub type Day = u8;

/// Auction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Flight legs.
    Flight,
    /// Hotel nights.
    Hotel,
    /// Entertainment tickets.
    Entertainment,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flight => write!(f, "flight"),
            Self::Hotel => write!(f, "hotel"),
            Self::Entertainment => write!(f, "entertainment"),
        }
    }
}

/// Type of resource within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    /// Flight into town.
    InFlight,
    /// Flight out of town.
    OutFlight,
    /// Night in the cheap hotel.
    CheapHotel,
    /// Night in the good hotel.
    GoodHotel,
    /// Alligator wrestling ticket (preference `e1`).
    AlligatorWrestling,
    /// Amusement park ticket (preference `e2`).
    Amusement,
    /// Museum ticket (preference `e3`).
    Museum,
}

impl ResourceType {
    /// All resource types, in catalog order.
    pub const ALL: [Self; 7] = [
        Self::InFlight,
        Self::OutFlight,
        Self::CheapHotel,
        Self::GoodHotel,
        Self::AlligatorWrestling,
        Self::Amusement,
        Self::Museum,
    ];

    /// The three entertainment types, in preference-score order (e1, e2, e3).
    pub const ENTERTAINMENT: [Self; 3] = [Self::AlligatorWrestling, Self::Amusement, Self::Museum];

    /// Returns the category this type belongs to.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::InFlight | Self::OutFlight => Category::Flight,
            Self::CheapHotel | Self::GoodHotel => Category::Hotel,
            Self::AlligatorWrestling | Self::Amusement | Self::Museum => Category::Entertainment,
        }
    }

    const fn group(self) -> u8 {
        match self {
            Self::InFlight => 0,
            Self::OutFlight => 1,
            Self::CheapHotel => 2,
            Self::GoodHotel => 3,
            Self::AlligatorWrestling => 4,
            Self::Amusement => 5,
            Self::Museum => 6,
        }
    }

    /// First day on which this resource is auctioned.
    ///
    /// Out-flights leave from day 2; everything else starts on day 1.
    #[must_use]
    pub const fn first_day(self) -> Day {
        match self {
            Self::OutFlight => 2,
            _ => 1,
        }
    }

    /// Last day on which this resource is auctioned.
    #[must_use]
    pub const fn last_day(self) -> Day {
        self.first_day() + Catalog::DAYS_PER_TYPE - 1
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InFlight => "in-flight",
            Self::OutFlight => "out-flight",
            Self::CheapHotel => "cheap-hotel",
            Self::GoodHotel => "good-hotel",
            Self::AlligatorWrestling => "alligator-wrestling",
            Self::Amusement => "amusement",
            Self::Museum => "museum",
        };
        f.write_str(name)
    }
}

/// Auction identifier assigned by the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(u8);

impl ResourceId {
    /// Creates a resource id from a raw auction number.
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Returns the raw auction number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the raw auction number as an index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// A fully described auctionable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Auction id.
    pub id: ResourceId,
    /// Resource type.
    pub kind: ResourceType,
    /// Day of the resource.
    pub day: Day,
}

impl Resource {
    /// Returns the category of this resource.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.kind.category()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} day {})", self.id, self.kind, self.day)
    }
}

/// The standard TAC auction layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Catalog;

impl Catalog {
    /// Number of auctioned days per resource type.
    pub const DAYS_PER_TYPE: u8 = 4;

    /// Total number of auctions.
    pub const AUCTION_COUNT: usize = ResourceType::ALL.len() * Self::DAYS_PER_TYPE as usize;

    /// Looks up the auction for a resource type on a given day.
    #[must_use]
    pub const fn resource_for(self, kind: ResourceType, day: Day) -> Option<ResourceId> {
        if day < kind.first_day() || day > kind.last_day() {
            return None;
        }
        Some(ResourceId(kind.group() * Self::DAYS_PER_TYPE + (day - kind.first_day())))
    }

    /// Describes the auction with the given id.
    #[must_use]
    pub fn describe(self, id: ResourceId) -> Option<Resource> {
        let group = id.0 / Self::DAYS_PER_TYPE;
        let offset = id.0 % Self::DAYS_PER_TYPE;
        let kind = *ResourceType::ALL.get(group as usize)?;
        Some(Resource {
            id,
            kind,
            day: kind.first_day() + offset,
        })
    }

    /// Iterates over every auction in id order.
    pub fn resources(self) -> impl Iterator<Item = Resource> {
        (0..Self::AUCTION_COUNT as u8).filter_map(move |raw| self.describe(ResourceId(raw)))
    }

    /// Iterates over flight auctions in ordinal order.
    pub fn flights(self) -> impl Iterator<Item = Resource> {
        self.resources()
            .filter(|resource| resource.category() == Category::Flight)
    }
}
