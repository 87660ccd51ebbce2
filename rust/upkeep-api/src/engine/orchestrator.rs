//! Generation pass orchestration.
//!
//! Walks every enabled schedule due inside the selection window and, for
//! each one, resolves a guest-free date, selects a vendor, then persists
//! the task and advances the schedule in a single store transaction.
//! Per-schedule failures land in the pass summary; only the initial
//! schedule enumeration can abort a pass.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::config::GenerationConfig;
use crate::domain::{MaintenanceTask, ScheduleRecord};
use crate::engine::rollforward::{add_months_clamped, next_due_date};
use crate::engine::{
    FailureStage, LookupPolicy, PassError, PassOptions, PassSummary, ScheduleFailure,
    VacancyFinder, VendorScorer, VendorSelection,
};
use crate::logging::OpTimer;
use crate::store::{ScheduleStore, Store, TaskStore};

/// Completed passes kept for the history endpoints.
const PASS_HISTORY_LIMIT: usize = 32;

/// What processing one schedule produced.
enum ScheduleOutcome {
    /// A task was persisted and the schedule advanced.
    Created,
    /// A task already covered the due date; nothing was written.
    Skipped,
}

/// Runs generation passes over the schedule store.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    store: Store,
    vacancy: VacancyFinder,
    scorer: VendorScorer,
    horizon_months: u32,
    vacancy_window_days: u32,
    /// Most recent pass first, bounded at [`PASS_HISTORY_LIMIT`].
    history: Arc<RwLock<VecDeque<PassSummary>>>,
}

impl GenerationEngine {
    #[must_use]
    pub fn new(store: Store, config: &GenerationConfig) -> Self {
        let lookup = LookupPolicy::new(
            Duration::from_secs(config.lookup_timeout_secs),
            config.lookup_retries,
        );
        let vacancy = VacancyFinder::new(store.clone(), lookup);
        let scorer = VendorScorer::new(
            store.clone(),
            config.scoring.clone(),
            config.vendor_pool_size,
            lookup,
        );
        Self {
            store,
            vacancy,
            scorer,
            horizon_months: config.horizon_months,
            vacancy_window_days: config.vacancy_window_days,
            history: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    /// Completed passes, most recent first, capped at `limit`.
    #[must_use]
    pub fn recent_passes(&self, limit: usize) -> Vec<PassSummary> {
        self.history.read().iter().take(limit).cloned().collect()
    }

    /// The most recently completed pass, if any has run.
    #[must_use]
    pub fn latest_pass(&self) -> Option<PassSummary> {
        self.history.read().front().cloned()
    }

    /// Run one generation pass.
    ///
    /// Selects every enabled schedule whose due date falls between today
    /// and today plus the horizon (both inclusive) and processes them
    /// sequentially. A schedule that fails mid-processing is recorded in
    /// the summary's `errors` and never stops its neighbors.
    ///
    /// # Errors
    ///
    /// Returns [`PassError::ScheduleQuery`] when the due-schedule
    /// enumeration itself fails and nothing could be processed.
    pub async fn run_pass(&self, options: PassOptions) -> Result<PassSummary, PassError> {
        let timer = OpTimer::new("engine", "generation_pass");
        let result = self.run_pass_inner(options).await;
        timer.finish_with_result(&result);
        if let Ok(summary) = &result {
            let mut history = self.history.write();
            history.push_front(summary.clone());
            history.truncate(PASS_HISTORY_LIMIT);
        }
        result
    }

    async fn run_pass_inner(&self, options: PassOptions) -> Result<PassSummary, PassError> {
        let started_at = Utc::now();
        let today = options.today.unwrap_or_else(|| started_at.date_naive());
        let horizon = options.horizon_months.unwrap_or(self.horizon_months);
        let window_end = add_months_clamped(today, horizon);

        let due = self
            .store
            .list_due_between(today, window_end)
            .await
            .map_err(PassError::ScheduleQuery)?;

        info!(
            schedules = due.len(),
            from = %today,
            to = %window_end,
            "starting generation pass"
        );

        // Schedules already past due sit outside the window and stay
        // untouched; surface them so operators notice the backlog.
        match self.store.count_overdue(today).await {
            Ok(0) => {}
            Ok(overdue) => warn!(overdue, "enabled schedules are overdue and left unprocessed"),
            Err(error) => warn!(%error, "failed to count overdue schedules"),
        }

        let mut tasks_created = 0;
        let mut tasks_skipped = 0;
        let mut errors = Vec::new();

        for record in &due {
            match self.process_schedule(record).await {
                Ok(ScheduleOutcome::Created) => tasks_created += 1,
                Ok(ScheduleOutcome::Skipped) => tasks_skipped += 1,
                Err(failure) => {
                    warn!(
                        schedule_id = %failure.schedule_id,
                        stage = failure.stage.as_str(),
                        message = %failure.message,
                        "schedule processing failed"
                    );
                    errors.push(failure);
                }
            }
        }

        Ok(PassSummary {
            tasks_created,
            tasks_skipped,
            schedules_processed: tasks_created + tasks_skipped,
            errors,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Process a single due schedule through all of its steps.
    async fn process_schedule(
        &self,
        record: &ScheduleRecord,
    ) -> Result<ScheduleOutcome, ScheduleFailure> {
        let schedule = &record.schedule;
        let template = &record.template;
        let due_date = schedule.next_due_at;

        // A task already recorded for this exact due date means an
        // earlier pass handled the occurrence. Nothing is written.
        let exists = self
            .store
            .task_exists(schedule.id, due_date)
            .await
            .map_err(|e| ScheduleFailure::new(schedule.id, FailureStage::Persist, &e))?;
        if exists {
            debug!(schedule_id = %schedule.id, date = %due_date, "task already exists, skipping");
            return Ok(ScheduleOutcome::Skipped);
        }

        let mut scheduled_date = due_date;
        let mut override_note = None;
        if template.requires_vacancy {
            let occupied = self
                .vacancy
                .is_occupied(schedule.property_id, due_date)
                .await
                .map_err(|e| ScheduleFailure::new(schedule.id, FailureStage::BookingLookup, &e))?;
            if occupied {
                let vacant = self
                    .vacancy
                    .find_vacant_date(schedule.property_id, due_date, self.vacancy_window_days)
                    .await
                    .map_err(|e| {
                        ScheduleFailure::new(schedule.id, FailureStage::BookingLookup, &e)
                    })?;
                match vacant {
                    Some(date) => {
                        debug!(
                            schedule_id = %schedule.id,
                            from = %due_date,
                            to = %date,
                            "moved task to a vacant date"
                        );
                        scheduled_date = date;
                    }
                    None => {
                        info!(
                            schedule_id = %schedule.id,
                            date = %due_date,
                            "no vacant date in window, keeping the occupied date"
                        );
                        override_note = Some(format!(
                            "no vacant date within {} days either side, keeping original date",
                            self.vacancy_window_days
                        ));
                    }
                }
            }
        }

        let VendorSelection { vendor_id, reason } = self
            .scorer
            .select(&template.category, schedule.preferred_vendor_id)
            .await
            .map_err(|e| ScheduleFailure::new(schedule.id, FailureStage::VendorLookup, &e))?;
        if vendor_id.is_none() {
            info!(
                schedule_id = %schedule.id,
                category = %template.category,
                "no vendor available, task needs manual assignment"
            );
        }
        let reason = match &override_note {
            Some(note) => format!("{reason}; {note}"),
            None => reason,
        };

        // The advance stays anchored on the original due date even when
        // the task itself moved to a nearby vacant day.
        let task = MaintenanceTask::new(schedule.id, schedule.property_id, template.id, scheduled_date)
            .with_assignment(vendor_id, reason);
        let new_due = next_due_date(
            due_date,
            record.effective_frequency_months(),
            &template.preferred_months,
        );

        self.store
            .commit_generation(&task, new_due)
            .await
            .map_err(|e| ScheduleFailure::new(schedule.id, FailureStage::Persist, &e))?;

        info!(
            schedule_id = %schedule.id,
            task_id = %task.id,
            date = %task.scheduled_date,
            vendor_id = ?task.vendor_id,
            next_due = %new_due,
            "generated maintenance task"
        );
        Ok(ScheduleOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Booking, BookingStatus, MaintenanceSchedule, MaintenanceTemplate, Vendor, VendorStatus,
    };
    use crate::engine::scoring::ScoringWeights;
    use crate::store::{BookingStore, VendorStore};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            horizon_months: 1,
            vacancy_window_days: 7,
            vendor_pool_size: 5,
            lookup_retries: 2,
            lookup_timeout_secs: 5,
            scoring: ScoringWeights::default(),
        }
    }

    async fn seed_schedule(store: &Store, due: NaiveDate) -> ScheduleRecord {
        let template = MaintenanceTemplate::new("HVAC service", "HVAC", 3);
        let schedule = MaintenanceSchedule::new(Uuid::new_v4(), template.id, due);
        store.upsert_template(&template).await.unwrap();
        store.upsert_schedule(&schedule).await.unwrap();
        ScheduleRecord::new(schedule, template)
    }

    async fn seed_vendor(store: &Store) -> Vendor {
        let vendor = Vendor::new("Apex HVAC", VendorStatus::Active)
            .with_specialty("HVAC")
            .with_rating(4.5)
            .with_response_hours(2.0)
            .with_jobs_completed(120)
            .with_insurance(true);
        store.upsert_vendor(&vendor).await.unwrap();
        vendor
    }

    #[tokio::test]
    async fn pass_creates_task_and_advances_schedule() {
        let store = Store::in_memory();
        let record = seed_schedule(&store, date(2026, 3, 10)).await;
        let vendor = seed_vendor(&store).await;

        let engine = GenerationEngine::new(store.clone(), &test_config());
        let summary = engine
            .run_pass(PassOptions {
                today: Some(date(2026, 3, 1)),
                horizon_months: None,
            })
            .await
            .unwrap();

        assert_eq!(summary.tasks_created, 1);
        assert_eq!(summary.tasks_skipped, 0);
        assert_eq!(summary.schedules_processed, 1);
        assert!(summary.errors.is_empty());

        let tasks = store.list_tasks_for_schedule(record.schedule.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].scheduled_date, date(2026, 3, 10));
        assert_eq!(tasks[0].vendor_id, Some(vendor.id));
        assert!(tasks[0].auto_assigned);

        let advanced = store.get_schedule(record.schedule.id).await.unwrap().unwrap();
        assert_eq!(advanced.next_due_at, date(2026, 6, 10));
    }

    #[tokio::test]
    async fn existing_task_is_skipped_without_mutation() {
        let store = Store::in_memory();
        let record = seed_schedule(&store, date(2026, 3, 10)).await;
        seed_vendor(&store).await;

        let prior = MaintenanceTask::new(
            record.schedule.id,
            record.schedule.property_id,
            record.template.id,
            date(2026, 3, 10),
        );
        store.insert_task(&prior).await.unwrap();

        let engine = GenerationEngine::new(store.clone(), &test_config());
        let summary = engine
            .run_pass(PassOptions {
                today: Some(date(2026, 3, 1)),
                horizon_months: None,
            })
            .await
            .unwrap();

        assert_eq!(summary.tasks_created, 0);
        assert_eq!(summary.tasks_skipped, 1);
        assert_eq!(summary.schedules_processed, 1);

        // The schedule must not advance on the skip path.
        let untouched = store.get_schedule(record.schedule.id).await.unwrap().unwrap();
        assert_eq!(untouched.next_due_at, date(2026, 3, 10));
        let tasks = store.list_tasks_for_schedule(record.schedule.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn empty_vendor_pool_leaves_task_unassigned() {
        let store = Store::in_memory();
        let record = seed_schedule(&store, date(2026, 3, 10)).await;

        let engine = GenerationEngine::new(store.clone(), &test_config());
        let summary = engine
            .run_pass(PassOptions {
                today: Some(date(2026, 3, 1)),
                horizon_months: None,
            })
            .await
            .unwrap();

        assert_eq!(summary.tasks_created, 1);
        let tasks = store.list_tasks_for_schedule(record.schedule.id).await.unwrap();
        assert_eq!(tasks[0].vendor_id, None);
        assert!(!tasks[0].auto_assigned);
        assert_eq!(tasks[0].assignment_reason, "No vendors available");
    }

    #[tokio::test]
    async fn horizon_override_widens_the_window() {
        let store = Store::in_memory();
        seed_schedule(&store, date(2026, 5, 20)).await;
        seed_vendor(&store).await;

        let engine = GenerationEngine::new(store.clone(), &test_config());

        let narrow = engine
            .run_pass(PassOptions {
                today: Some(date(2026, 3, 1)),
                horizon_months: None,
            })
            .await
            .unwrap();
        assert_eq!(narrow.schedules_processed, 0);

        let wide = engine
            .run_pass(PassOptions {
                today: Some(date(2026, 3, 1)),
                horizon_months: Some(3),
            })
            .await
            .unwrap();
        assert_eq!(wide.tasks_created, 1);
    }

    #[tokio::test]
    async fn pass_history_keeps_most_recent_first() {
        let store = Store::in_memory();
        seed_schedule(&store, date(2026, 3, 10)).await;
        seed_vendor(&store).await;

        let engine = GenerationEngine::new(store.clone(), &test_config());
        assert!(engine.latest_pass().is_none());

        let options = PassOptions {
            today: Some(date(2026, 3, 1)),
            horizon_months: None,
        };
        engine.run_pass(options).await.unwrap();
        engine.run_pass(options).await.unwrap();

        let passes = engine.recent_passes(10);
        assert_eq!(passes.len(), 2);
        // The second pass found nothing due (the schedule advanced to June).
        assert_eq!(passes[0].tasks_created, 0);
        assert_eq!(passes[1].tasks_created, 1);
        let latest = engine.latest_pass().unwrap();
        assert_eq!(latest.tasks_created, 0);
    }

    #[tokio::test]
    async fn vacancy_conflict_moves_the_task_date() {
        let store = Store::in_memory();

        let template = MaintenanceTemplate::new("Deep clean", "Cleaning", 1).requiring_vacancy();
        let schedule = MaintenanceSchedule::new(Uuid::new_v4(), template.id, date(2026, 3, 10));
        store.upsert_template(&template).await.unwrap();
        store.upsert_schedule(&schedule).await.unwrap();

        let booking = Booking::new(
            schedule.property_id,
            date(2026, 3, 9),
            date(2026, 3, 11),
            BookingStatus::Confirmed,
        );
        store.insert_booking(&booking).await.unwrap();

        let engine = GenerationEngine::new(store.clone(), &test_config());
        let summary = engine
            .run_pass(PassOptions {
                today: Some(date(2026, 3, 1)),
                horizon_months: None,
            })
            .await
            .unwrap();

        assert_eq!(summary.tasks_created, 1);
        let tasks = store.list_tasks_for_schedule(schedule.id).await.unwrap();
        // Departure day still blocks, so the first free day is the 12th.
        assert_eq!(tasks[0].scheduled_date, date(2026, 3, 12));
        // Roll-forward ignores the moved date.
        let advanced = store.get_schedule(schedule.id).await.unwrap().unwrap();
        assert_eq!(advanced.next_due_at, date(2026, 4, 10));
    }
}
