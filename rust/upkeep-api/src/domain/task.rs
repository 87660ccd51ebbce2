//! Generated maintenance task model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a maintenance task.
///
/// Generation only ever produces `Scheduled` tasks; the later states are
/// owned by work-order execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[allow(clippy::should_implement_trait, reason = "Different signature than std::str::FromStr")]
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "in_progress" | "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One concrete occurrence generated from a maintenance schedule.
///
/// At most one task may exist per `(schedule_id, scheduled_date)` pair;
/// the stores enforce this as a uniqueness constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub property_id: Uuid,
    pub template_id: Uuid,
    /// Assigned vendor; `None` means the task awaits manual assignment.
    pub vendor_id: Option<Uuid>,
    /// Day the work should happen; no time-of-day component.
    pub scheduled_date: NaiveDate,
    pub status: TaskStatus,
    /// True when the vendor was chosen by the scoring engine.
    pub auto_assigned: bool,
    /// Operator-facing note explaining the vendor decision and any date override.
    pub assignment_reason: String,
    pub created_at: DateTime<Utc>,
}

impl MaintenanceTask {
    /// Create a freshly scheduled task with no vendor yet.
    pub fn new(
        schedule_id: Uuid,
        property_id: Uuid,
        template_id: Uuid,
        scheduled_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            schedule_id,
            property_id,
            template_id,
            vendor_id: None,
            scheduled_date,
            status: TaskStatus::Scheduled,
            auto_assigned: false,
            assignment_reason: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Record the outcome of vendor selection.
    #[must_use]
    pub fn with_assignment(mut self, vendor_id: Option<Uuid>, reason: impl Into<String>) -> Self {
        self.auto_assigned = vendor_id.is_some();
        self.vendor_id = vendor_id;
        self.assignment_reason = reason.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            TaskStatus::Scheduled,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ] {
            assert_eq!(TaskStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::from_str("paused"), None);
    }

    #[test]
    fn assignment_marks_auto_assigned_only_with_a_vendor() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let base = MaintenanceTask::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), date);

        let assigned = base.clone().with_assignment(Some(Uuid::new_v4()), "Preferred vendor");
        assert!(assigned.auto_assigned);

        let unassigned = base.with_assignment(None, "No vendors available");
        assert!(!unassigned.auto_assigned);
        assert_eq!(unassigned.vendor_id, None);
    }
}
