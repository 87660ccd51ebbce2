//! Vendor directory read model.
//!
//! Vendors live in an external directory service; the scheduling engine
//! only reads them to pick an assignee for generated tasks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational status of a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    /// Accepting work.
    Active,
    /// Accepting work and favored during auto-assignment.
    Preferred,
    /// Temporarily not accepting work.
    Inactive,
    /// Barred from assignment.
    Blocked,
}

impl VendorStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Preferred => "preferred",
            Self::Inactive => "inactive",
            Self::Blocked => "blocked",
        }
    }

    #[allow(clippy::should_implement_trait, reason = "Different signature than std::str::FromStr")]
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "preferred" => Some(Self::Preferred),
            "inactive" => Some(Self::Inactive),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }

    /// Whether vendors in this status may receive auto-assigned work.
    #[must_use]
    pub fn is_assignable(self) -> bool {
        matches!(self, Self::Active | Self::Preferred)
    }
}

/// A service vendor from the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub status: VendorStatus,
    /// Maintenance categories this vendor covers (e.g. "HVAC", "Plumbing").
    pub specialties: Vec<String>,
    /// Average review rating on a 0-5 scale.
    pub average_rating: f64,
    /// Typical hours until the vendor responds to a job offer, when known.
    pub response_hours: Option<f64>,
    /// Completed jobs on the platform.
    pub jobs_completed: u32,
    pub insurance_verified: bool,
}

impl Vendor {
    /// Create a vendor with a neutral track record.
    pub fn new(name: impl Into<String>, status: VendorStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status,
            specialties: Vec::new(),
            average_rating: 0.0,
            response_hours: None,
            jobs_completed: 0,
            insurance_verified: false,
        }
    }

    // Builder methods
    #[must_use]
    pub fn with_specialty(mut self, category: impl Into<String>) -> Self {
        self.specialties.push(category.into());
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.average_rating = rating;
        self
    }

    #[must_use]
    pub fn with_response_hours(mut self, hours: f64) -> Self {
        self.response_hours = Some(hours);
        self
    }

    #[must_use]
    pub fn with_jobs_completed(mut self, jobs: u32) -> Self {
        self.jobs_completed = jobs;
        self
    }

    #[must_use]
    pub fn with_insurance(mut self, verified: bool) -> Self {
        self.insurance_verified = verified;
        self
    }

    /// Whether this vendor covers the given maintenance category.
    #[must_use]
    pub fn covers(&self, category: &str) -> bool {
        self.specialties.iter().any(|s| s == category)
    }
}
