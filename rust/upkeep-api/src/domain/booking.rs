//! Guest booking read model.
//!
//! Bookings are owned by the reservations service. The scheduling engine
//! reads them solely to decide whether a property is occupied on a date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a guest booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Reserved for a future stay.
    Confirmed,
    /// Guest is currently on site.
    Arrived,
    /// Stay finished.
    Departed,
    /// Reservation withdrawn.
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Arrived => "arrived",
            Self::Departed => "departed",
            Self::Cancelled => "cancelled",
        }
    }

    #[allow(clippy::should_implement_trait, reason = "Different signature than std::str::FromStr")]
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "confirmed" => Some(Self::Confirmed),
            "arrived" => Some(Self::Arrived),
            "departed" => Some(Self::Departed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether a booking in this status occupies the property.
    #[must_use]
    pub fn occupies(self) -> bool {
        matches!(self, Self::Confirmed | Self::Arrived)
    }
}

/// A guest stay at a property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub property_id: Uuid,
    /// First day of the stay.
    pub arrival: NaiveDate,
    /// Last day of the stay, inclusive.
    pub departure: NaiveDate,
    pub status: BookingStatus,
}

impl Booking {
    pub fn new(
        property_id: Uuid,
        arrival: NaiveDate,
        departure: NaiveDate,
        status: BookingStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            arrival,
            departure,
            status,
        }
    }

    /// Whether this booking blocks maintenance on `date`.
    ///
    /// Both endpoints count as occupied; a departure-day visit would
    /// collide with checkout.
    #[must_use]
    pub fn blocks(&self, date: NaiveDate) -> bool {
        self.status.occupies() && self.arrival <= date && date <= self.departure
    }
}
