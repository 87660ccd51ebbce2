//! Upkeep API - Preventive Maintenance Scheduling Service
//!
//! This crate generates preventive maintenance tasks for short-term
//! rental properties from recurring schedules. Each generation pass
//! walks the schedules coming due, picks a guest-free date, assigns the
//! best available vendor, and rolls the schedule forward so the next
//! occurrence is already queued:
//!
//! - **Due selection**: enabled schedules inside a configurable horizon
//! - **Vacancy search**: tasks move off dates occupied by guest bookings
//! - **Vendor scoring**: rating, responsiveness, experience, insurance
//!   and preferred status decide who gets the job
//! - **Idempotent passes**: re-running a pass never duplicates tasks
//! - **Pluggable storage**: SQLite for deployments, in-memory for tests
//!
//! # Architecture
//!
//! The service is organized into several key modules:
//!
//! - [`config`]: Configuration management and environment loading
//! - [`domain`]: Core domain models (schedules, tasks, bookings, vendors)
//! - [`store`]: Storage traits and the SQLite/in-memory backends
//! - [`engine`]: The generation pass, scoring, vacancy and roll-forward logic
//! - [`api`]: HTTP API endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use upkeep_api::{config::AppConfig, server::create_app};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     let app = create_app(config, None).await?;
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod server;
pub mod store;

use std::sync::Arc;

use config::AppConfig;
use engine::GenerationEngine;
use store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Task, schedule, booking and vendor storage.
    pub store: Store,
    /// Generation engine; also holds the pass history.
    pub engine: Arc<GenerationEngine>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &"AppConfig")
            .field("store", &self.store.backend_name())
            .field("engine", &"GenerationEngine")
            .finish()
    }
}
