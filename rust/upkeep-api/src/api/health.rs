//! Health check endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::store::ScheduleStore;
use crate::AppState;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check response.
#[derive(Debug, Serialize)]
struct ReadinessResponse {
    status: &'static str,
    store: StoreStatus,
}

#[derive(Debug, Serialize)]
struct StoreStatus {
    backend: &'static str,
    reachable: bool,
}

/// Readiness check. Probes the store with a cheap count so a backend
/// that cannot be reached reports 503 instead of "ready".
async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let backend = state.store.backend_name();
    match state.store.count_overdue(Utc::now().date_naive()).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                store: StoreStatus {
                    backend,
                    reachable: true,
                },
            }),
        ),
        Err(err) => {
            warn!(backend, error = %err, "Readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "unavailable",
                    store: StoreStatus {
                        backend,
                        reachable: false,
                    },
                }),
            )
        }
    }
}
