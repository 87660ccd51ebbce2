//! SQLite store backend.
//!
//! Durable backend for schedules, templates, tasks, bookings, and the
//! vendor directory read model. Uses write-ahead logging and runs every
//! operation on the blocking thread pool, making the store safe for
//! concurrent async access.
//!
//! The `(schedule_id, scheduled_date)` uniqueness constraint on tasks is
//! the storage backstop behind the engine's idempotence check.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use tokio::task;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, MaintenanceSchedule, MaintenanceTask, MaintenanceTemplate,
    ScheduleRecord, TaskStatus, Vendor, VendorStatus,
};
use crate::store::repository::{BookingStore, ScheduleStore, TaskStore, VendorStore};
use crate::store::{StoreError, StoreResult};

const DATE_FMT: &str = "%Y-%m-%d";

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(anyhow::Error::new(err))
    }
}

/// SQLite-backed store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    /// Path to the `SQLite` database file.
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and migrate its schema.
    pub async fn new<P: Into<PathBuf>>(path: P) -> StoreResult<Self> {
        let store = Self {
            db_path: path.into(),
        };
        store.migrate_schema().await?;
        Ok(store)
    }

    /// Create all required tables and indexes.
    async fn migrate_schema(&self) -> StoreResult<()> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<()> {
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }

            let conn = Connection::open(&db_path).context("Failed to open database")?;

            // Enable WAL mode
            conn.pragma_update(None, "journal_mode", "WAL")
                .context("Failed to enable WAL mode")?;

            conn.execute(
                r"
                CREATE TABLE IF NOT EXISTS maintenance_templates (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    category TEXT NOT NULL,
                    frequency_months INTEGER NOT NULL,
                    preferred_months TEXT NOT NULL,
                    requires_vacancy INTEGER NOT NULL
                )
                ",
                [],
            )
            .context("Failed to create maintenance_templates table")?;

            conn.execute(
                r"
                CREATE TABLE IF NOT EXISTS maintenance_schedules (
                    id TEXT PRIMARY KEY,
                    property_id TEXT NOT NULL,
                    template_id TEXT NOT NULL,
                    enabled INTEGER NOT NULL,
                    preferred_vendor_id TEXT,
                    next_due_at TEXT NOT NULL,
                    custom_frequency_months INTEGER
                )
                ",
                [],
            )
            .context("Failed to create maintenance_schedules table")?;

            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_schedules_due
                 ON maintenance_schedules(enabled, next_due_at)",
                [],
            )?;

            conn.execute(
                r"
                CREATE TABLE IF NOT EXISTS maintenance_tasks (
                    id TEXT PRIMARY KEY,
                    schedule_id TEXT NOT NULL,
                    property_id TEXT NOT NULL,
                    template_id TEXT NOT NULL,
                    vendor_id TEXT,
                    scheduled_date TEXT NOT NULL,
                    status TEXT NOT NULL,
                    auto_assigned INTEGER NOT NULL,
                    assignment_reason TEXT NOT NULL,
                    created_at TEXT NOT NULL
                )
                ",
                [],
            )
            .context("Failed to create maintenance_tasks table")?;

            // Uniqueness backstop for generation idempotence
            conn.execute(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_schedule_date
                 ON maintenance_tasks(schedule_id, scheduled_date)",
                [],
            )?;

            conn.execute(
                r"
                CREATE TABLE IF NOT EXISTS bookings (
                    id TEXT PRIMARY KEY,
                    property_id TEXT NOT NULL,
                    arrival TEXT NOT NULL,
                    departure TEXT NOT NULL,
                    status TEXT NOT NULL
                )
                ",
                [],
            )
            .context("Failed to create bookings table")?;

            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_bookings_property
                 ON bookings(property_id, arrival, departure)",
                [],
            )?;

            conn.execute(
                r"
                CREATE TABLE IF NOT EXISTS vendors (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    status TEXT NOT NULL,
                    specialties TEXT NOT NULL,
                    average_rating REAL NOT NULL,
                    response_hours REAL,
                    jobs_completed INTEGER NOT NULL,
                    insurance_verified INTEGER NOT NULL
                )
                ",
                [],
            )
            .context("Failed to create vendors table")?;

            conn.execute(
                "CREATE INDEX IF NOT EXISTS idx_vendors_status ON vendors(status)",
                [],
            )?;

            Ok(())
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    /// Persist a generated task and advance its schedule in a single
    /// transaction; a failure of either write rolls back both.
    pub async fn commit_generation(
        &self,
        task: &MaintenanceTask,
        next_due_at: NaiveDate,
    ) -> StoreResult<()> {
        let task = task.clone();
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<()> {
            let conn = Connection::open(&db_path)?;

            conn.execute("BEGIN IMMEDIATE", [])?;

            match (|| -> StoreResult<()> {
                insert_task_row(&conn, &task)?;

                let updated = conn.execute(
                    "UPDATE maintenance_schedules SET next_due_at = ?1 WHERE id = ?2",
                    params![
                        next_due_at.format(DATE_FMT).to_string(),
                        task.schedule_id.to_string()
                    ],
                )?;
                if updated == 0 {
                    return Err(StoreError::NotFound {
                        entity: "schedule",
                        id: task.schedule_id,
                    });
                }

                Ok(())
            })() {
                Ok(()) => {
                    conn.execute("COMMIT", [])?;
                    Ok(())
                }
                Err(e) => {
                    conn.execute("ROLLBACK", []).ok();
                    Err(e)
                }
            }
        })
        .await
        .context("Failed to spawn blocking task")?
    }
}

#[async_trait]
impl ScheduleStore for SqliteStore {
    async fn list_due_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreResult<Vec<ScheduleRecord>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<Vec<ScheduleRecord>> {
            let conn = Connection::open(&db_path)?;

            let mut stmt = conn.prepare(
                r"
                SELECT s.id, s.property_id, s.template_id, s.enabled,
                       s.preferred_vendor_id, s.next_due_at, s.custom_frequency_months,
                       t.name, t.category, t.frequency_months, t.preferred_months,
                       t.requires_vacancy
                FROM maintenance_schedules s
                JOIN maintenance_templates t ON t.id = s.template_id
                WHERE s.enabled = 1 AND s.next_due_at >= ?1 AND s.next_due_at <= ?2
                ORDER BY s.next_due_at ASC, s.id ASC
                ",
            )?;

            let rows = stmt.query_map(
                params![
                    from.format(DATE_FMT).to_string(),
                    to.format(DATE_FMT).to_string()
                ],
                |row| {
                    Ok(DueRow {
                        schedule_id: row.get(0)?,
                        property_id: row.get(1)?,
                        template_id: row.get(2)?,
                        enabled: row.get(3)?,
                        preferred_vendor_id: row.get(4)?,
                        next_due_at: row.get(5)?,
                        custom_frequency_months: row.get(6)?,
                        template_name: row.get(7)?,
                        category: row.get(8)?,
                        frequency_months: row.get(9)?,
                        preferred_months: row.get(10)?,
                        requires_vacancy: row.get(11)?,
                    })
                },
            )?;

            let mut records = Vec::new();
            for row in rows {
                records.push(schedule_record_from(row?)?);
            }
            Ok(records)
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn get_schedule(&self, id: Uuid) -> StoreResult<Option<MaintenanceSchedule>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<Option<MaintenanceSchedule>> {
            let conn = Connection::open(&db_path)?;

            let row: Option<ScheduleRow> = conn
                .query_row(
                    r"
                    SELECT id, property_id, template_id, enabled, preferred_vendor_id,
                           next_due_at, custom_frequency_months
                    FROM maintenance_schedules
                    WHERE id = ?1
                    ",
                    params![id.to_string()],
                    |row| {
                        Ok(ScheduleRow {
                            id: row.get(0)?,
                            property_id: row.get(1)?,
                            template_id: row.get(2)?,
                            enabled: row.get(3)?,
                            preferred_vendor_id: row.get(4)?,
                            next_due_at: row.get(5)?,
                            custom_frequency_months: row.get(6)?,
                        })
                    },
                )
                .optional()?;

            row.map(schedule_from).transpose()
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn upsert_template(&self, template: &MaintenanceTemplate) -> StoreResult<()> {
        let template = template.clone();
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<()> {
            let conn = Connection::open(&db_path)?;

            conn.execute(
                r"
                INSERT OR REPLACE INTO maintenance_templates
                    (id, name, category, frequency_months, preferred_months, requires_vacancy)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
                params![
                    template.id.to_string(),
                    template.name,
                    template.category,
                    template.frequency_months,
                    encode_list(&template.preferred_months)?,
                    template.requires_vacancy,
                ],
            )
            .context("Failed to upsert template")?;

            Ok(())
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn upsert_schedule(&self, schedule: &MaintenanceSchedule) -> StoreResult<()> {
        let schedule = schedule.clone();
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<()> {
            let conn = Connection::open(&db_path)?;

            conn.execute(
                r"
                INSERT OR REPLACE INTO maintenance_schedules
                    (id, property_id, template_id, enabled, preferred_vendor_id,
                     next_due_at, custom_frequency_months)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
                params![
                    schedule.id.to_string(),
                    schedule.property_id.to_string(),
                    schedule.template_id.to_string(),
                    schedule.enabled,
                    schedule.preferred_vendor_id.map(|id| id.to_string()),
                    schedule.next_due_at.format(DATE_FMT).to_string(),
                    schedule.custom_frequency_months,
                ],
            )
            .context("Failed to upsert schedule")?;

            Ok(())
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn count_overdue(&self, before: NaiveDate) -> StoreResult<u64> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<u64> {
            let conn = Connection::open(&db_path)?;

            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM maintenance_schedules
                 WHERE enabled = 1 AND next_due_at < ?1",
                params![before.format(DATE_FMT).to_string()],
                |row| row.get(0),
            )?;

            #[allow(clippy::cast_sign_loss, reason = "COUNT(*) is never negative")]
            Ok(count as u64)
        })
        .await
        .context("Failed to spawn blocking task")?
    }
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn task_exists(&self, schedule_id: Uuid, scheduled_date: NaiveDate) -> StoreResult<bool> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<bool> {
            let conn = Connection::open(&db_path)?;

            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM maintenance_tasks
                     WHERE schedule_id = ?1 AND scheduled_date = ?2",
                    params![
                        schedule_id.to_string(),
                        scheduled_date.format(DATE_FMT).to_string()
                    ],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(found.is_some())
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn insert_task(&self, task: &MaintenanceTask) -> StoreResult<()> {
        let task = task.clone();
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<()> {
            let conn = Connection::open(&db_path)?;
            insert_task_row(&conn, &task)
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn list_tasks_for_schedule(
        &self,
        schedule_id: Uuid,
    ) -> StoreResult<Vec<MaintenanceTask>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<Vec<MaintenanceTask>> {
            let conn = Connection::open(&db_path)?;

            let mut stmt = conn.prepare(
                r"
                SELECT id, schedule_id, property_id, template_id, vendor_id,
                       scheduled_date, status, auto_assigned, assignment_reason, created_at
                FROM maintenance_tasks
                WHERE schedule_id = ?1
                ORDER BY scheduled_date ASC
                ",
            )?;

            let rows = stmt.query_map(params![schedule_id.to_string()], |row| {
                Ok(TaskRow {
                    id: row.get(0)?,
                    schedule_id: row.get(1)?,
                    property_id: row.get(2)?,
                    template_id: row.get(3)?,
                    vendor_id: row.get(4)?,
                    scheduled_date: row.get(5)?,
                    status: row.get(6)?,
                    auto_assigned: row.get(7)?,
                    assignment_reason: row.get(8)?,
                    created_at: row.get(9)?,
                })
            })?;

            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(task_from(row?)?);
            }
            Ok(tasks)
        })
        .await
        .context("Failed to spawn blocking task")?
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn has_conflict(&self, property_id: Uuid, date: NaiveDate) -> StoreResult<bool> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<bool> {
            let conn = Connection::open(&db_path)?;

            let found: Option<i64> = conn
                .query_row(
                    r"
                    SELECT 1 FROM bookings
                    WHERE property_id = ?1
                      AND status IN ('confirmed', 'arrived')
                      AND arrival <= ?2 AND departure >= ?2
                    LIMIT 1
                    ",
                    params![property_id.to_string(), date.format(DATE_FMT).to_string()],
                    |row| row.get(0),
                )
                .optional()?;

            Ok(found.is_some())
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn insert_booking(&self, booking: &Booking) -> StoreResult<()> {
        let booking = booking.clone();
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<()> {
            let conn = Connection::open(&db_path)?;

            conn.execute(
                r"
                INSERT OR REPLACE INTO bookings (id, property_id, arrival, departure, status)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
                params![
                    booking.id.to_string(),
                    booking.property_id.to_string(),
                    booking.arrival.format(DATE_FMT).to_string(),
                    booking.departure.format(DATE_FMT).to_string(),
                    booking.status.as_str(),
                ],
            )
            .context("Failed to insert booking")?;

            Ok(())
        })
        .await
        .context("Failed to spawn blocking task")?
    }
}

#[async_trait]
impl VendorStore for SqliteStore {
    async fn get_vendor(&self, id: Uuid) -> StoreResult<Option<Vendor>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<Option<Vendor>> {
            let conn = Connection::open(&db_path)?;

            let row: Option<VendorRow> = conn
                .query_row(
                    r"
                    SELECT id, name, status, specialties, average_rating,
                           response_hours, jobs_completed, insurance_verified
                    FROM vendors
                    WHERE id = ?1
                    ",
                    params![id.to_string()],
                    |row| {
                        Ok(VendorRow {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            status: row.get(2)?,
                            specialties: row.get(3)?,
                            average_rating: row.get(4)?,
                            response_hours: row.get(5)?,
                            jobs_completed: row.get(6)?,
                            insurance_verified: row.get(7)?,
                        })
                    },
                )
                .optional()?;

            row.map(vendor_from).transpose()
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn top_vendors_for_category(
        &self,
        category: &str,
        limit: usize,
    ) -> StoreResult<Vec<Vendor>> {
        let category = category.to_string();
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<Vec<Vendor>> {
            let conn = Connection::open(&db_path)?;

            let mut stmt = conn.prepare(
                r"
                SELECT id, name, status, specialties, average_rating,
                       response_hours, jobs_completed, insurance_verified
                FROM vendors
                WHERE status IN ('active', 'preferred')
                ORDER BY average_rating DESC, id ASC
                ",
            )?;

            let rows = stmt.query_map([], |row| {
                Ok(VendorRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    status: row.get(2)?,
                    specialties: row.get(3)?,
                    average_rating: row.get(4)?,
                    response_hours: row.get(5)?,
                    jobs_completed: row.get(6)?,
                    insurance_verified: row.get(7)?,
                })
            })?;

            // Specialty lists are stored as JSON, so the category filter
            // happens after decoding.
            let mut vendors = Vec::new();
            for row in rows {
                let vendor = vendor_from(row?)?;
                if vendor.covers(&category) {
                    vendors.push(vendor);
                }
                if vendors.len() == limit {
                    break;
                }
            }
            Ok(vendors)
        })
        .await
        .context("Failed to spawn blocking task")?
    }

    async fn upsert_vendor(&self, vendor: &Vendor) -> StoreResult<()> {
        let vendor = vendor.clone();
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || -> StoreResult<()> {
            let conn = Connection::open(&db_path)?;

            conn.execute(
                r"
                INSERT OR REPLACE INTO vendors
                    (id, name, status, specialties, average_rating,
                     response_hours, jobs_completed, insurance_verified)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
                params![
                    vendor.id.to_string(),
                    vendor.name,
                    vendor.status.as_str(),
                    encode_list(&vendor.specialties)?,
                    vendor.average_rating,
                    vendor.response_hours,
                    vendor.jobs_completed,
                    vendor.insurance_verified,
                ],
            )
            .context("Failed to upsert vendor")?;

            Ok(())
        })
        .await
        .context("Failed to spawn blocking task")?
    }
}

// ============================================================================
// Row mapping
// ============================================================================

struct ScheduleRow {
    id: String,
    property_id: String,
    template_id: String,
    enabled: bool,
    preferred_vendor_id: Option<String>,
    next_due_at: String,
    custom_frequency_months: Option<u32>,
}

struct DueRow {
    schedule_id: String,
    property_id: String,
    template_id: String,
    enabled: bool,
    preferred_vendor_id: Option<String>,
    next_due_at: String,
    custom_frequency_months: Option<u32>,
    template_name: String,
    category: String,
    frequency_months: u32,
    preferred_months: String,
    requires_vacancy: bool,
}

struct TaskRow {
    id: String,
    schedule_id: String,
    property_id: String,
    template_id: String,
    vendor_id: Option<String>,
    scheduled_date: String,
    status: String,
    auto_assigned: bool,
    assignment_reason: String,
    created_at: String,
}

struct VendorRow {
    id: String,
    name: String,
    status: String,
    specialties: String,
    average_rating: f64,
    response_hours: Option<f64>,
    jobs_completed: u32,
    insurance_verified: bool,
}

fn insert_task_row(conn: &Connection, task: &MaintenanceTask) -> StoreResult<()> {
    conn.execute(
        r"
        INSERT INTO maintenance_tasks
            (id, schedule_id, property_id, template_id, vendor_id,
             scheduled_date, status, auto_assigned, assignment_reason, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        ",
        params![
            task.id.to_string(),
            task.schedule_id.to_string(),
            task.property_id.to_string(),
            task.template_id.to_string(),
            task.vendor_id.map(|id| id.to_string()),
            task.scheduled_date.format(DATE_FMT).to_string(),
            task.status.as_str(),
            task.auto_assigned,
            task.assignment_reason,
            task.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| {
        if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) {
            StoreError::DuplicateTask {
                schedule_id: task.schedule_id,
                scheduled_date: task.scheduled_date,
            }
        } else {
            StoreError::from(e)
        }
    })?;

    Ok(())
}

fn schedule_from(row: ScheduleRow) -> StoreResult<MaintenanceSchedule> {
    Ok(MaintenanceSchedule {
        id: parse_uuid(&row.id)?,
        property_id: parse_uuid(&row.property_id)?,
        template_id: parse_uuid(&row.template_id)?,
        enabled: row.enabled,
        preferred_vendor_id: row
            .preferred_vendor_id
            .as_deref()
            .map(parse_uuid)
            .transpose()?,
        next_due_at: parse_date(&row.next_due_at)?,
        custom_frequency_months: row.custom_frequency_months,
    })
}

fn schedule_record_from(row: DueRow) -> StoreResult<ScheduleRecord> {
    let template_id = parse_uuid(&row.template_id)?;
    let schedule = MaintenanceSchedule {
        id: parse_uuid(&row.schedule_id)?,
        property_id: parse_uuid(&row.property_id)?,
        template_id,
        enabled: row.enabled,
        preferred_vendor_id: row
            .preferred_vendor_id
            .as_deref()
            .map(parse_uuid)
            .transpose()?,
        next_due_at: parse_date(&row.next_due_at)?,
        custom_frequency_months: row.custom_frequency_months,
    };
    let template = MaintenanceTemplate {
        id: template_id,
        name: row.template_name,
        category: row.category,
        frequency_months: row.frequency_months,
        preferred_months: decode_list(&row.preferred_months)?,
        requires_vacancy: row.requires_vacancy,
    };
    Ok(ScheduleRecord::new(schedule, template))
}

fn task_from(row: TaskRow) -> StoreResult<MaintenanceTask> {
    let status = TaskStatus::from_str(&row.status)
        .ok_or_else(|| StoreError::InvalidData(format!("unknown task status: {}", row.status)))?;
    Ok(MaintenanceTask {
        id: parse_uuid(&row.id)?,
        schedule_id: parse_uuid(&row.schedule_id)?,
        property_id: parse_uuid(&row.property_id)?,
        template_id: parse_uuid(&row.template_id)?,
        vendor_id: row.vendor_id.as_deref().map(parse_uuid).transpose()?,
        scheduled_date: parse_date(&row.scheduled_date)?,
        status,
        auto_assigned: row.auto_assigned,
        assignment_reason: row.assignment_reason,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

fn vendor_from(row: VendorRow) -> StoreResult<Vendor> {
    let status = VendorStatus::from_str(&row.status)
        .ok_or_else(|| StoreError::InvalidData(format!("unknown vendor status: {}", row.status)))?;
    Ok(Vendor {
        id: parse_uuid(&row.id)?,
        name: row.name,
        status,
        specialties: decode_list(&row.specialties)?,
        average_rating: row.average_rating,
        response_hours: row.response_hours,
        jobs_completed: row.jobs_completed,
        insurance_verified: row.insurance_verified,
    })
}

fn parse_uuid(value: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| StoreError::InvalidData(format!("invalid uuid {value}: {e}")))
}

fn parse_date(value: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FMT)
        .map_err(|e| StoreError::InvalidData(format!("invalid date {value}: {e}")))
}

fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidData(format!("invalid timestamp {value}: {e}")))
}

fn encode_list<T: serde::Serialize>(values: &[T]) -> StoreResult<String> {
    serde_json::to_string(values)
        .map_err(|e| StoreError::InvalidData(format!("failed to encode list: {e}")))
}

fn decode_list<T: serde::de::DeserializeOwned>(raw: &str) -> StoreResult<Vec<T>> {
    serde_json::from_str(raw)
        .map_err(|e| StoreError::InvalidData(format!("invalid stored list {raw}: {e}")))
}
