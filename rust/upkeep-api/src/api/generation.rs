//! Generation pass endpoints.
//!
//! The trigger endpoint is meant to be hit by an external scheduler
//! (cron) and needs no request body; the history endpoints expose the
//! recent passes kept by the engine.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::engine::{PassOptions, PassSummary, ScheduleFailure};
use crate::AppState;

/// Create the generation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/maintenance/passes",
            post(trigger_pass).get(list_passes),
        )
        .route("/api/v1/maintenance/passes/latest", get(latest_pass))
}

/// Optional trigger overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerPassRequest {
    /// Lookahead horizon in months for this pass only.
    pub horizon_months: Option<u32>,
}

/// Summary of one completed pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassResponse {
    pub success: bool,
    pub tasks_created: u32,
    pub tasks_skipped: u32,
    pub schedules_processed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FailureResponse>>,
    pub started_at: String,
    pub finished_at: String,
}

/// One schedule that failed mid-pass.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub schedule_id: String,
    pub stage: String,
    pub message: String,
}

impl From<ScheduleFailure> for FailureResponse {
    fn from(failure: ScheduleFailure) -> Self {
        Self {
            schedule_id: failure.schedule_id.to_string(),
            stage: failure.stage.as_str().to_string(),
            message: failure.message,
        }
    }
}

impl From<PassSummary> for PassResponse {
    fn from(summary: PassSummary) -> Self {
        let errors = if summary.errors.is_empty() {
            None
        } else {
            Some(summary.errors.into_iter().map(FailureResponse::from).collect())
        };
        Self {
            success: true,
            tasks_created: summary.tasks_created,
            tasks_skipped: summary.tasks_skipped,
            schedules_processed: summary.schedules_processed,
            errors,
            started_at: summary.started_at.to_rfc3339(),
            finished_at: summary.finished_at.to_rfc3339(),
        }
    }
}

/// Pass-fatal error body.
#[derive(Debug, Serialize)]
pub struct PassErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Run one generation pass.
async fn trigger_pass(
    State(state): State<AppState>,
    body: Option<Json<TriggerPassRequest>>,
) -> Result<Json<PassResponse>, (StatusCode, Json<PassErrorResponse>)> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let options = PassOptions {
        today: None,
        horizon_months: request.horizon_months,
    };

    match state.engine.run_pass(options).await {
        Ok(summary) => Ok(Json(PassResponse::from(summary))),
        Err(error) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(PassErrorResponse {
                success: false,
                error: error.to_string(),
            }),
        )),
    }
}

/// List recent passes, most recent first.
async fn list_passes(State(state): State<AppState>) -> Json<Vec<PassResponse>> {
    let passes = state.engine.recent_passes(usize::MAX);
    Json(passes.into_iter().map(PassResponse::from).collect())
}

/// The most recent pass.
async fn latest_pass(State(state): State<AppState>) -> Result<Json<PassResponse>, StatusCode> {
    state
        .engine
        .latest_pass()
        .map(|summary| Json(PassResponse::from(summary)))
        .ok_or(StatusCode::NOT_FOUND)
}
