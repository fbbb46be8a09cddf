//! Visit data contract consumed by the billing calculator.
//!
//! Records arrive from the external store as camelCase JSON. Defaults
//! (`numberOfPeople = 1`, `roomTier = standard`) are resolved here, at
//! construction or deserialization, so read sites never need fallbacks.

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Amount, Timestamp, VisitId};

/// Headcount used when a record omits it or stores zero.
pub const DEFAULT_NUMBER_OF_PEOPLE: u32 = 1;

// ---------------------------------------------------------------------------
// Room tier
// ---------------------------------------------------------------------------

/// Pricing category selecting which hourly formula applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomTier {
    /// Open space, tiered first-hour / next-hour pricing.
    #[default]
    Standard,
    /// Large hall, flat hourly rate per person.
    Large,
    /// Small hall, flat hourly rate per person.
    Small,
}

impl RoomTier {
    pub const ALL: [RoomTier; 3] = [RoomTier::Standard, RoomTier::Large, RoomTier::Small];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Large => "Large hall",
            Self::Small => "Small hall",
        }
    }
}

// ---------------------------------------------------------------------------
// Visit status
// ---------------------------------------------------------------------------

/// Lifecycle state derived from a visit's timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    Ongoing,
    Paused,
    Ended,
}

impl VisitStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ongoing => "Ongoing",
            Self::Paused => "Paused",
            Self::Ended => "Ended",
        }
    }
}

// ---------------------------------------------------------------------------
// Pause interval
// ---------------------------------------------------------------------------

/// A span of a visit during which billable time does not accrue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseInterval {
    pub start_time: Timestamp,
    /// `None` while the visit is still paused.
    #[serde(default)]
    pub end_time: Option<Timestamp>,
}

impl PauseInterval {
    /// An open pause starting at `start_time`.
    pub fn open(start_time: Timestamp) -> Self {
        Self {
            start_time,
            end_time: None,
        }
    }

    pub fn closed(start_time: Timestamp, end_time: Timestamp) -> Self {
        Self {
            start_time,
            end_time: Some(end_time),
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Paused duration, measuring an open pause up to `now`.
    pub fn duration(&self, now: Timestamp) -> Duration {
        self.end_time.unwrap_or(now) - self.start_time
    }
}

// ---------------------------------------------------------------------------
// Product line
// ---------------------------------------------------------------------------

/// An add-on purchase attached to a visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub product_id: String,
    pub unit_price: Amount,
    pub quantity: u32,
}

impl ProductLine {
    pub fn new(product_id: impl Into<String>, unit_price: Amount, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            unit_price,
            quantity,
        }
    }

    pub fn subtotal(&self) -> Amount {
        self.unit_price * f64::from(self.quantity)
    }
}

// ---------------------------------------------------------------------------
// Visit
// ---------------------------------------------------------------------------

/// A timed occupancy session by one or more people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: VisitId,
    pub start_time: Timestamp,
    /// `None` while the visit is ongoing.
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    /// Pauses in insertion order.
    #[serde(default)]
    pub pause_history: Vec<PauseInterval>,
    #[serde(
        default = "default_number_of_people",
        deserialize_with = "deserialize_number_of_people"
    )]
    pub number_of_people: u32,
    #[serde(default)]
    pub room_tier: RoomTier,
    #[serde(default)]
    pub products: Vec<ProductLine>,
}

impl Visit {
    /// An open visit for one person in the standard tier.
    pub fn new(id: VisitId, start_time: Timestamp) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            pause_history: Vec::new(),
            number_of_people: DEFAULT_NUMBER_OF_PEOPLE,
            room_tier: RoomTier::default(),
            products: Vec::new(),
        }
    }

    /// Set the headcount; zero is raised to one.
    pub fn with_people(mut self, number_of_people: u32) -> Self {
        self.number_of_people = number_of_people.max(DEFAULT_NUMBER_OF_PEOPLE);
        self
    }

    pub fn with_tier(mut self, room_tier: RoomTier) -> Self {
        self.room_tier = room_tier;
        self
    }

    pub fn with_end(mut self, end_time: Timestamp) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_pause(mut self, pause: PauseInterval) -> Self {
        self.pause_history.push(pause);
        self
    }

    pub fn with_product(mut self, line: ProductLine) -> Self {
        self.products.push(line);
        self
    }

    /// The pause currently in progress, if any.
    pub fn open_pause(&self) -> Option<&PauseInterval> {
        self.pause_history.last().filter(|p| p.is_open())
    }

    pub fn status(&self) -> VisitStatus {
        if self.end_time.is_some() {
            VisitStatus::Ended
        } else if self.open_pause().is_some() {
            VisitStatus::Paused
        } else {
            VisitStatus::Ongoing
        }
    }

    /// `end_time` if set, otherwise `now`.
    pub fn effective_end(&self, now: Timestamp) -> Timestamp {
        self.end_time.unwrap_or(now)
    }
}

fn default_number_of_people() -> u32 {
    DEFAULT_NUMBER_OF_PEOPLE
}

/// Accepts a missing, null or zero headcount as one person.
fn deserialize_number_of_people<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u32>::deserialize(deserializer)?;
    Ok(value
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_NUMBER_OF_PEOPLE))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
