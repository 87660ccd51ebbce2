//! Recurring maintenance schedule model.
//!
//! A `MaintenanceTemplate` describes a kind of recurring work (what, how
//! often, under which constraints); a `MaintenanceSchedule` binds a
//! template to one property with its own due date and overrides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reusable definition of a recurring maintenance job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTemplate {
    pub id: Uuid,
    pub name: String,
    /// Maintenance category, matched against vendor specialties (e.g. "HVAC").
    pub category: String,
    /// Base recurrence interval in months; always at least one.
    pub frequency_months: u32,
    /// Calendar months (1-12) this work should land in; empty means any month.
    pub preferred_months: Vec<u32>,
    /// Whether the property must be guest-free on the scheduled date.
    pub requires_vacancy: bool,
}

impl MaintenanceTemplate {
    pub fn new(name: impl Into<String>, category: impl Into<String>, frequency_months: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            frequency_months: frequency_months.max(1),
            preferred_months: Vec::new(),
            requires_vacancy: false,
        }
    }

    // Builder methods
    #[must_use]
    pub fn with_preferred_months(mut self, months: Vec<u32>) -> Self {
        // Only real calendar months survive.
        self.preferred_months = months.into_iter().filter(|m| (1..=12).contains(m)).collect();
        self
    }

    #[must_use]
    pub fn requiring_vacancy(mut self) -> Self {
        self.requires_vacancy = true;
        self
    }
}

/// A property's recurring maintenance obligation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub id: Uuid,
    pub property_id: Uuid,
    pub template_id: Uuid,
    /// Disabled schedules are never selected for generation. Retiring a
    /// schedule means disabling it; nothing in this subsystem deletes.
    pub enabled: bool,
    /// Pinned vendor that bypasses scoring while assignable.
    pub preferred_vendor_id: Option<Uuid>,
    /// Day the next occurrence is due; no time-of-day component.
    pub next_due_at: NaiveDate,
    /// Overrides the template interval when set.
    pub custom_frequency_months: Option<u32>,
}

impl MaintenanceSchedule {
    pub fn new(property_id: Uuid, template_id: Uuid, next_due_at: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            template_id,
            enabled: true,
            preferred_vendor_id: None,
            next_due_at,
            custom_frequency_months: None,
        }
    }

    // Builder methods
    #[must_use]
    pub fn with_preferred_vendor(mut self, vendor_id: Uuid) -> Self {
        self.preferred_vendor_id = Some(vendor_id);
        self
    }

    #[must_use]
    pub fn with_custom_frequency(mut self, months: u32) -> Self {
        self.custom_frequency_months = Some(months.max(1));
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// A schedule joined with its template, as the generation pass reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRecord {
    pub schedule: MaintenanceSchedule,
    pub template: MaintenanceTemplate,
}

impl ScheduleRecord {
    pub fn new(schedule: MaintenanceSchedule, template: MaintenanceTemplate) -> Self {
        Self { schedule, template }
    }

    /// Recurrence interval in months, honoring the per-schedule override.
    #[must_use]
    pub fn effective_frequency_months(&self) -> u32 {
        self.schedule
            .custom_frequency_months
            .unwrap_or(self.template.frequency_months)
            .max(1)
    }
}
