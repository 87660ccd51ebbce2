//! HTTP server setup and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::api;
use crate::config::AppConfig;
use crate::engine::{GenerationEngine, PassRunner};
use crate::logging::OpTimer;
use crate::store::Store;
use crate::{log_banner, log_init_step, log_success, AppState};

/// Upkeep API version (from Cargo.toml).
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the application with all routes and middleware.
///
/// Tests and embedders can hand in an `existing_store` to share storage
/// with the server; otherwise the store is built from configuration.
pub async fn create_app(
    config: AppConfig,
    existing_store: Option<Store>,
) -> anyhow::Result<Router> {
    // Start overall timer
    let overall_timer = OpTimer::new("server", "create_app");

    // Log startup banner
    log_banner!(
        format!("🚀 Upkeep API v{}", VERSION),
        "Preventive maintenance scheduling service"
    );

    // [1/4] Open the task store
    let step_timer = OpTimer::new("server", "storage");
    let store = match existing_store {
        Some(store) => {
            log_init_step!(
                1,
                4,
                "Storage",
                format!("🗄️  Using provided {} store", store.backend_name())
            );
            store
        }
        None => {
            let store = Store::from_config(&config.database).await?;
            let detail = match &config.database.path {
                Some(path) if store.backend_name() == "sqlite" => {
                    format!("🗄️  sqlite at {}", path.display())
                }
                _ => format!("🗄️  {} store", store.backend_name()),
            };
            log_init_step!(1, 4, "Storage", detail);
            store
        }
    };
    step_timer.finish();

    // [2/4] Create the generation engine
    let step_timer = OpTimer::new("server", "engine");
    let engine = Arc::new(GenerationEngine::new(store.clone(), &config.generation));
    log_init_step!(
        2,
        4,
        "Generation Engine",
        format!(
            "⚡ horizon {}mo, vacancy window ±{}d, vendor pool {}",
            config.generation.horizon_months,
            config.generation.vacancy_window_days,
            config.generation.vendor_pool_size
        )
    );
    step_timer.finish();

    // [3/4] Start the background runner when configured
    let step_timer = OpTimer::new("server", "runner");
    if config.runner.enabled {
        let interval = Duration::from_secs(config.runner.interval_secs);
        let _handle = PassRunner::new(engine.clone(), interval).spawn();
        log_init_step!(
            3,
            4,
            "Pass Runner",
            format!("🏃 every {}s", config.runner.interval_secs)
        );
    } else {
        log_init_step!(3, 4, "Pass Runner", "🏃 disabled");
    }
    step_timer.finish();

    // Create app state
    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        engine,
    };

    // [4/4] Build main API router with middleware
    let step_timer = OpTimer::new("server", "router");
    let app = api::create_router()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log_init_step!(4, 4, "Router", "🌐 Routes + middleware configured");
    step_timer.finish();

    // Log success banner
    overall_timer.finish();
    log_success!("Upkeep API server created successfully");
    tracing::info!("");

    Ok(app)
}
