//! Store trait abstractions for data access.
//!
//! The generation engine only ever talks to these traits; backends
//! (SQLite, in-memory) implement them behind the [`Store`] enum.
//!
//! [`Store`]: crate::store::Store

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{
    Booking, MaintenanceSchedule, MaintenanceTask, MaintenanceTemplate, ScheduleRecord, Vendor,
};
use crate::store::StoreResult;

/// Repository trait for maintenance schedules and their templates.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Enabled schedules joined with their templates, due within the
    /// inclusive window, ordered by due date then schedule id.
    async fn list_due_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<ScheduleRecord>>;

    /// Get a schedule by id.
    async fn get_schedule(&self, id: Uuid) -> StoreResult<Option<MaintenanceSchedule>>;

    /// Insert or replace a template.
    async fn upsert_template(&self, template: &MaintenanceTemplate) -> StoreResult<()>;

    /// Insert or replace a schedule.
    async fn upsert_schedule(&self, schedule: &MaintenanceSchedule) -> StoreResult<()>;

    /// Count enabled schedules whose due date already passed.
    async fn count_overdue(&self, before: NaiveDate) -> StoreResult<u64>;
}

/// Repository trait for generated maintenance tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether a task already exists for this schedule and date.
    async fn task_exists(&self, schedule_id: Uuid, scheduled_date: NaiveDate) -> StoreResult<bool>;

    /// Insert a task; fails with [`StoreError::DuplicateTask`] when one
    /// already exists for the same schedule and date.
    ///
    /// [`StoreError::DuplicateTask`]: crate::store::StoreError::DuplicateTask
    async fn insert_task(&self, task: &MaintenanceTask) -> StoreResult<()>;

    /// All tasks generated for a schedule, oldest scheduled date first.
    async fn list_tasks_for_schedule(&self, schedule_id: Uuid)
    -> StoreResult<Vec<MaintenanceTask>>;
}

/// Repository trait over the bookings read model.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Whether an occupying booking covers `date` at the property.
    async fn has_conflict(&self, property_id: Uuid, date: NaiveDate) -> StoreResult<bool>;

    /// Insert a booking (test and sync tooling only; bookings are owned
    /// by the reservations service).
    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()>;
}

/// Repository trait over the vendor directory read model.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Get a vendor by id.
    async fn get_vendor(&self, id: Uuid) -> StoreResult<Option<Vendor>>;

    /// Assignable vendors covering `category`, best rating first with
    /// vendor id as the tie-break, capped at `limit`.
    async fn top_vendors_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> StoreResult<Vec<Vendor>>;

    /// Insert or replace a vendor.
    async fn upsert_vendor(&self, vendor: &Vendor) -> StoreResult<()>;
}
