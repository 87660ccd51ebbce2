//! Storage layer for the scheduling engine.
//!
//! Trait-based data access ([`repository`]) with two backends: a durable
//! SQLite store and an in-memory store for tests and path-less deployments.
//! The [`Store`] enum dispatches to whichever backend the configuration
//! selected.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::domain::MaintenanceTask;

pub mod memory;
pub mod repository;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryStore;
pub use repository::{BookingStore, ScheduleStore, TaskStore, VendorStore};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use crate::domain::{
    Booking, MaintenanceSchedule, MaintenanceTemplate, ScheduleRecord, Vendor,
};
use async_trait::async_trait;

/// Errors surfaced by the stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `(schedule, date)` uniqueness backstop fired.
    #[error("task already exists for schedule {schedule_id} on {scheduled_date}")]
    DuplicateTask {
        schedule_id: Uuid,
        scheduled_date: NaiveDate,
    },

    /// A referenced row is missing.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A stored row failed to decode into its domain type.
    #[error("invalid stored data: {0}")]
    InvalidData(String),

    /// Backend failure (database, IO, blocking-task join).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store abstraction over the available backends.
#[derive(Debug, Clone)]
pub enum Store {
    /// Durable SQLite backend.
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStore),
    /// In-memory backend for tests and path-less deployments.
    InMemory(InMemoryStore),
}

impl Store {
    /// Create a store from configuration. A configured database path
    /// selects SQLite; otherwise data lives in memory.
    pub async fn from_config(config: &DatabaseConfig) -> StoreResult<Self> {
        match &config.path {
            #[cfg(feature = "sqlite")]
            Some(path) => {
                let store = SqliteStore::new(path.clone()).await?;
                Ok(Self::Sqlite(store))
            }
            #[cfg(not(feature = "sqlite"))]
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "sqlite feature not enabled, falling back to in-memory store"
                );
                Ok(Self::in_memory())
            }
            None => Ok(Self::in_memory()),
        }
    }

    /// Create an in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryStore::new())
    }

    /// Backend name for logs and readiness reporting.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "sqlite",
            Self::InMemory(_) => "memory",
        }
    }

    /// Persist a generated task and advance its schedule's due date in
    /// one transaction; either both writes land or neither does.
    pub async fn commit_generation(
        &self,
        task: &MaintenanceTask,
        next_due_at: NaiveDate,
    ) -> StoreResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.commit_generation(task, next_due_at).await,
            Self::InMemory(store) => store.commit_generation(task, next_due_at).await,
        }
    }
}

#[async_trait]
impl ScheduleStore for Store {
    async fn list_due_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<ScheduleRecord>> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.list_due_between(from, to).await,
            Self::InMemory(store) => store.list_due_between(from, to).await,
        }
    }

    async fn get_schedule(&self, id: Uuid) -> StoreResult<Option<MaintenanceSchedule>> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.get_schedule(id).await,
            Self::InMemory(store) => store.get_schedule(id).await,
        }
    }

    async fn upsert_template(&self, template: &MaintenanceTemplate) -> StoreResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.upsert_template(template).await,
            Self::InMemory(store) => store.upsert_template(template).await,
        }
    }

    async fn upsert_schedule(&self, schedule: &MaintenanceSchedule) -> StoreResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.upsert_schedule(schedule).await,
            Self::InMemory(store) => store.upsert_schedule(schedule).await,
        }
    }

    async fn count_overdue(&self, before: NaiveDate) -> StoreResult<u64> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.count_overdue(before).await,
            Self::InMemory(store) => store.count_overdue(before).await,
        }
    }
}

#[async_trait]
impl TaskStore for Store {
    async fn task_exists(&self, schedule_id: Uuid, scheduled_date: NaiveDate) -> StoreResult<bool> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.task_exists(schedule_id, scheduled_date).await,
            Self::InMemory(store) => store.task_exists(schedule_id, scheduled_date).await,
        }
    }

    async fn insert_task(&self, task: &MaintenanceTask) -> StoreResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.insert_task(task).await,
            Self::InMemory(store) => store.insert_task(task).await,
        }
    }

    async fn list_tasks_for_schedule(
        &self,
        schedule_id: Uuid,
    ) -> StoreResult<Vec<MaintenanceTask>> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.list_tasks_for_schedule(schedule_id).await,
            Self::InMemory(store) => store.list_tasks_for_schedule(schedule_id).await,
        }
    }
}

#[async_trait]
impl BookingStore for Store {
    async fn has_conflict(&self, property_id: Uuid, date: NaiveDate) -> StoreResult<bool> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.has_conflict(property_id, date).await,
            Self::InMemory(store) => store.has_conflict(property_id, date).await,
        }
    }

    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.insert_booking(booking).await,
            Self::InMemory(store) => store.insert_booking(booking).await,
        }
    }
}

#[async_trait]
impl VendorStore for Store {
    async fn get_vendor(&self, id: Uuid) -> StoreResult<Option<Vendor>> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.get_vendor(id).await,
            Self::InMemory(store) => store.get_vendor(id).await,
        }
    }

    async fn top_vendors_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> StoreResult<Vec<Vendor>> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.top_vendors_for_category(category, limit).await,
            Self::InMemory(store) => store.top_vendors_for_category(category, limit).await,
        }
    }

    async fn upsert_vendor(&self, vendor: &Vendor) -> StoreResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.upsert_vendor(vendor).await,
            Self::InMemory(store) => store.upsert_vendor(vendor).await,
        }
    }
}
