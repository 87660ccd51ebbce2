//! Background pass runner.
//!
//! Optional periodic driver for the generation engine. When enabled in
//! configuration it fires a pass immediately on startup and then once
//! per interval, using configured defaults for the window.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::engine::{GenerationEngine, PassOptions};

/// Drives generation passes on a fixed interval.
#[derive(Debug)]
pub struct PassRunner {
    engine: Arc<GenerationEngine>,
    interval: Duration,
}

impl PassRunner {
    #[must_use]
    pub fn new(engine: Arc<GenerationEngine>, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// Spawn the runner loop.
    ///
    /// The first pass runs as soon as the loop starts; later passes
    /// follow the configured interval. A pass that overruns its slot
    /// delays the next tick instead of bursting to catch up. The loop
    /// runs until the returned handle is aborted or the runtime shuts
    /// down.
    pub fn spawn(self) -> JoinHandle<()> {
        info!(interval_secs = self.interval.as_secs(), "starting pass runner");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match self.engine.run_pass(PassOptions::default()).await {
                    Ok(summary) => {
                        info!(
                            created = summary.tasks_created,
                            skipped = summary.tasks_skipped,
                            failed = summary.errors.len(),
                            "scheduled generation pass finished"
                        );
                    }
                    Err(error) => {
                        error!(%error, "scheduled generation pass failed");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::domain::{MaintenanceSchedule, MaintenanceTemplate};
    use crate::engine::scoring::ScoringWeights;
    use crate::store::{ScheduleStore, Store, TaskStore};
    use uuid::Uuid;

    #[tokio::test]
    async fn runner_fires_a_pass_on_startup() {
        let store = Store::in_memory();
        let template = MaintenanceTemplate::new("Filter swap", "HVAC", 3);
        let schedule = MaintenanceSchedule::new(
            Uuid::new_v4(),
            template.id,
            chrono::Utc::now().date_naive(),
        );
        store.upsert_template(&template).await.unwrap();
        store.upsert_schedule(&schedule).await.unwrap();

        let config = GenerationConfig {
            horizon_months: 1,
            vacancy_window_days: 7,
            vendor_pool_size: 5,
            lookup_retries: 2,
            lookup_timeout_secs: 5,
            scoring: ScoringWeights::default(),
        };
        let engine = Arc::new(GenerationEngine::new(store.clone(), &config));

        let handle = PassRunner::new(engine.clone(), Duration::from_secs(3600)).spawn();
        tokio::time::sleep(Duration::from_millis(250)).await;
        handle.abort();

        assert!(engine.latest_pass().is_some());
        let tasks = store.list_tasks_for_schedule(schedule.id).await.unwrap();
        assert_eq!(tasks.len(), 1);
    }
}
