//! Maintenance generation engine.
//!
//! The engine turns due maintenance schedules into concrete tasks: it
//! resolves a guest-free date where the work demands one, scores and
//! assigns a vendor, persists the task, and rolls the schedule forward.
//! Individual schedule failures are collected into the pass summary and
//! never abort the batch.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

pub mod orchestrator;
pub mod rollforward;
pub mod runner;
pub mod scoring;
pub mod vacancy;

pub use orchestrator::GenerationEngine;
pub use runner::PassRunner;
pub use scoring::{ScoringWeights, VendorScorer, VendorSelection};
pub use vacancy::VacancyFinder;

/// Which step of schedule processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Booking conflict probe or vacancy search.
    BookingLookup,
    /// Vendor directory read during selection.
    VendorLookup,
    /// Task insert or schedule advance.
    Persist,
}

impl FailureStage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingLookup => "booking_lookup",
            Self::VendorLookup => "vendor_lookup",
            Self::Persist => "persist",
        }
    }
}

/// A non-fatal, per-schedule processing failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleFailure {
    pub schedule_id: Uuid,
    pub stage: FailureStage,
    pub message: String,
}

impl ScheduleFailure {
    pub fn new(schedule_id: Uuid, stage: FailureStage, error: &impl std::fmt::Display) -> Self {
        Self {
            schedule_id,
            stage,
            message: error.to_string(),
        }
    }
}

/// Outcome of one generation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassSummary {
    pub tasks_created: u32,
    pub tasks_skipped: u32,
    /// Schedules that ran to a decision (created or skipped).
    pub schedules_processed: u32,
    pub errors: Vec<ScheduleFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Per-pass overrides; all fields fall back to configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassOptions {
    /// Start of the selection window; defaults to the current UTC date.
    pub today: Option<chrono::NaiveDate>,
    /// Lookahead horizon in calendar months.
    pub horizon_months: Option<u32>,
}

/// Pass-fatal errors. Everything else is collected per schedule.
#[derive(Debug, Error)]
pub enum PassError {
    /// Enumerating due schedules failed; nothing could be processed.
    #[error("failed to enumerate due schedules: {0}")]
    ScheduleQuery(#[source] StoreError),
}

/// Timeout and retry policy for booking and vendor reads.
///
/// A timed-out or failed lookup is retried up to `retries` more times;
/// exhaustion surfaces as the schedule's failure, never as "no conflict"
/// or "no vendor".
#[derive(Debug, Clone, Copy)]
pub struct LookupPolicy {
    timeout: Duration,
    retries: u32,
}

impl LookupPolicy {
    #[must_use]
    pub fn new(timeout: Duration, retries: u32) -> Self {
        Self { timeout, retries }
    }

    /// Run `op`, retrying transient failures.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Backend(anyhow::anyhow!(
                    "lookup timed out after {:?}",
                    self.timeout
                ))),
            };
            match result {
                Ok(value) => return Ok(value),
                Err(err) if attempt <= self.retries => {
                    tracing::debug!(attempt, error = %err, "retrying lookup");
                }
                Err(err) => return Err(err),
            }
        }
    }
}
