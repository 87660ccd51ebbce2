//! In-memory store backend.
//!
//! Default backend when no database path is configured, and the one the
//! test suites run against. All tables live behind a single lock so the
//! task-insert plus due-date-advance commit stays atomic.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{
    Booking, MaintenanceSchedule, MaintenanceTask, MaintenanceTemplate, ScheduleRecord, Vendor,
};
use crate::store::repository::{BookingStore, ScheduleStore, TaskStore, VendorStore};
use crate::store::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct MemoryInner {
    templates: HashMap<Uuid, MaintenanceTemplate>,
    schedules: HashMap<Uuid, MaintenanceSchedule>,
    tasks: Vec<MaintenanceTask>,
    bookings: Vec<Booking>,
    vendors: HashMap<Uuid, Vendor>,
}

impl MemoryInner {
    fn task_exists(&self, schedule_id: Uuid, scheduled_date: NaiveDate) -> bool {
        self.tasks
            .iter()
            .any(|t| t.schedule_id == schedule_id && t.scheduled_date == scheduled_date)
    }

    fn insert_task(&mut self, task: &MaintenanceTask) -> StoreResult<()> {
        if self.task_exists(task.schedule_id, task.scheduled_date) {
            return Err(StoreError::DuplicateTask {
                schedule_id: task.schedule_id,
                scheduled_date: task.scheduled_date,
            });
        }
        self.tasks.push(task.clone());
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl InMemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a generated task and advance its schedule as one atomic
    /// section; either both changes land or neither does.
    pub async fn commit_generation(
        &self,
        task: &MaintenanceTask,
        next_due_at: NaiveDate,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if !inner.schedules.contains_key(&task.schedule_id) {
            return Err(StoreError::NotFound {
                entity: "schedule",
                id: task.schedule_id,
            });
        }
        inner.insert_task(task)?;
        if let Some(schedule) = inner.schedules.get_mut(&task.schedule_id) {
            schedule.next_due_at = next_due_at;
        }
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn list_due_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<ScheduleRecord>> {
        let inner = self.inner.read();
        let mut records: Vec<ScheduleRecord> = inner
            .schedules
            .values()
            .filter(|s| s.enabled && s.next_due_at >= from && s.next_due_at <= to)
            .filter_map(|s| {
                inner
                    .templates
                    .get(&s.template_id)
                    .map(|t| ScheduleRecord::new(s.clone(), t.clone()))
            })
            .collect();
        records.sort_by(|a, b| {
            a.schedule
                .next_due_at
                .cmp(&b.schedule.next_due_at)
                .then_with(|| a.schedule.id.cmp(&b.schedule.id))
        });
        Ok(records)
    }

    async fn get_schedule(&self, id: Uuid) -> StoreResult<Option<MaintenanceSchedule>> {
        let inner = self.inner.read();
        Ok(inner.schedules.get(&id).cloned())
    }

    async fn upsert_template(&self, template: &MaintenanceTemplate) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.templates.insert(template.id, template.clone());
        Ok(())
    }

    async fn upsert_schedule(&self, schedule: &MaintenanceSchedule) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.schedules.insert(schedule.id, schedule.clone());
        Ok(())
    }

    async fn count_overdue(&self, before: NaiveDate) -> StoreResult<u64> {
        let inner = self.inner.read();
        let count = inner
            .schedules
            .values()
            .filter(|s| s.enabled && s.next_due_at < before)
            .count();
        Ok(count as u64)
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn task_exists(&self, schedule_id: Uuid, scheduled_date: NaiveDate) -> StoreResult<bool> {
        let inner = self.inner.read();
        Ok(inner.task_exists(schedule_id, scheduled_date))
    }

    async fn insert_task(&self, task: &MaintenanceTask) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.insert_task(task)
    }

    async fn list_tasks_for_schedule(
        &self,
        schedule_id: Uuid,
    ) -> StoreResult<Vec<MaintenanceTask>> {
        let inner = self.inner.read();
        let mut tasks: Vec<MaintenanceTask> = inner
            .tasks
            .iter()
            .filter(|t| t.schedule_id == schedule_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.scheduled_date);
        Ok(tasks)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn has_conflict(&self, property_id: Uuid, date: NaiveDate) -> StoreResult<bool> {
        let inner = self.inner.read();
        Ok(inner
            .bookings
            .iter()
            .any(|b| b.property_id == property_id && b.blocks(date)))
    }

    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.bookings.push(booking.clone());
        Ok(())
    }
}

#[async_trait]
impl VendorStore for InMemoryStore {
    async fn get_vendor(&self, id: Uuid) -> StoreResult<Option<Vendor>> {
        let inner = self.inner.read();
        Ok(inner.vendors.get(&id).cloned())
    }

    async fn top_vendors_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> StoreResult<Vec<Vendor>> {
        let inner = self.inner.read();
        let mut vendors: Vec<Vendor> = inner
            .vendors
            .values()
            .filter(|v| v.status.is_assignable() && v.covers(category))
            .cloned()
            .collect();
        vendors.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| a.id.cmp(&b.id))
        });
        vendors.truncate(limit);
        Ok(vendors)
    }

    async fn upsert_vendor(&self, vendor: &Vendor) -> StoreResult<()> {
        let mut inner = self.inner.write();
        inner.vendors.insert(vendor.id, vendor.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, VendorStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seed_schedule(store: &InMemoryStore, due: NaiveDate) -> ScheduleRecord {
        let template = MaintenanceTemplate::new("HVAC service", "HVAC", 3);
        let schedule = MaintenanceSchedule::new(Uuid::new_v4(), template.id, due);
        store.upsert_template(&template).await.unwrap();
        store.upsert_schedule(&schedule).await.unwrap();
        ScheduleRecord::new(schedule, template)
    }

    #[tokio::test]
    async fn due_window_excludes_disabled_and_out_of_range() {
        let store = InMemoryStore::new();
        seed_schedule(&store, date(2025, 7, 10)).await;
        seed_schedule(&store, date(2025, 9, 1)).await;

        let template = MaintenanceTemplate::new("Gutter clean", "Exterior", 6);
        let disabled =
            MaintenanceSchedule::new(Uuid::new_v4(), template.id, date(2025, 7, 12)).disabled();
        store.upsert_template(&template).await.unwrap();
        store.upsert_schedule(&disabled).await.unwrap();

        let due = store
            .list_due_between(date(2025, 7, 1), date(2025, 8, 1))
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].schedule.next_due_at, date(2025, 7, 10));
    }

    #[tokio::test]
    async fn duplicate_task_insert_is_rejected() {
        let store = InMemoryStore::new();
        let record = seed_schedule(&store, date(2025, 7, 10)).await;

        let task = MaintenanceTask::new(
            record.schedule.id,
            record.schedule.property_id,
            record.template.id,
            date(2025, 7, 10),
        );
        store.insert_task(&task).await.unwrap();

        let again = MaintenanceTask::new(
            record.schedule.id,
            record.schedule.property_id,
            record.template.id,
            date(2025, 7, 10),
        );
        let err = store.insert_task(&again).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTask { .. }));
    }

    #[tokio::test]
    async fn commit_generation_is_all_or_nothing() {
        let store = InMemoryStore::new();
        let record = seed_schedule(&store, date(2025, 7, 10)).await;

        let task = MaintenanceTask::new(
            record.schedule.id,
            record.schedule.property_id,
            record.template.id,
            date(2025, 7, 10),
        );
        store
            .commit_generation(&task, date(2025, 10, 10))
            .await
            .unwrap();

        let schedule = store.get_schedule(record.schedule.id).await.unwrap().unwrap();
        assert_eq!(schedule.next_due_at, date(2025, 10, 10));

        // A second commit for the same date must leave the schedule untouched.
        let dup = MaintenanceTask::new(
            record.schedule.id,
            record.schedule.property_id,
            record.template.id,
            date(2025, 7, 10),
        );
        let err = store.commit_generation(&dup, date(2026, 1, 10)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTask { .. }));

        let schedule = store.get_schedule(record.schedule.id).await.unwrap().unwrap();
        assert_eq!(schedule.next_due_at, date(2025, 10, 10));
    }

    #[tokio::test]
    async fn vendor_ranking_orders_by_rating_then_id() {
        let store = InMemoryStore::new();
        let low = Vendor::new("Low", VendorStatus::Active)
            .with_specialty("Plumbing")
            .with_rating(3.5);
        let high = Vendor::new("High", VendorStatus::Preferred)
            .with_specialty("Plumbing")
            .with_rating(4.8);
        let blocked = Vendor::new("Blocked", VendorStatus::Blocked)
            .with_specialty("Plumbing")
            .with_rating(5.0);
        for v in [&low, &high, &blocked] {
            store.upsert_vendor(v).await.unwrap();
        }

        let top = store.top_vendors_for_category("Plumbing", 5).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, high.id);
        assert_eq!(top[1].id, low.id);
    }

    #[tokio::test]
    async fn booking_conflicts_respect_status_and_range() {
        let store = InMemoryStore::new();
        let property_id = Uuid::new_v4();
        let stay = Booking::new(
            property_id,
            date(2025, 7, 10),
            date(2025, 7, 14),
            BookingStatus::Confirmed,
        );
        let cancelled = Booking::new(
            property_id,
            date(2025, 7, 20),
            date(2025, 7, 25),
            BookingStatus::Cancelled,
        );
        store.insert_booking(&stay).await.unwrap();
        store.insert_booking(&cancelled).await.unwrap();

        assert!(store.has_conflict(property_id, date(2025, 7, 12)).await.unwrap());
        assert!(!store.has_conflict(property_id, date(2025, 7, 15)).await.unwrap());
        assert!(!store.has_conflict(property_id, date(2025, 7, 22)).await.unwrap());
        assert!(
            !store
                .has_conflict(Uuid::new_v4(), date(2025, 7, 12))
                .await
                .unwrap()
        );
    }
}
