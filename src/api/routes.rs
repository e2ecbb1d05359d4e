//! API route definitions
//!
//! - /health - liveness and dataset size
//! - /api/v1/config - active pricing, unit and scoring settings
//! - /api/v1/wells, /api/v1/dates - selector options
//! - /api/v1/summary - KPI totals and deltas
//! - /api/v1/observations - snapshot table, `/all` for the full dataset
//! - /api/v1/history - production chart series
//! - /api/v1/heterogeneity, /api/v1/recommendations - opportunity scoring
//! - /api/v1/dashboard - everything above in one response

use axum::{routing::get, Router};

use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/config", get(handlers::get_config))
        .route("/wells", get(handlers::get_wells))
        .route("/dates", get(handlers::get_dates))
        .route("/summary", get(handlers::get_summary))
        .route("/observations", get(handlers::get_observations))
        .route("/observations/all", get(handlers::get_all_observations))
        .route("/history", get(handlers::get_history))
        .route("/heterogeneity", get(handlers::get_heterogeneity))
        .route("/recommendations", get(handlers::get_recommendations))
        .route("/dashboard", get(handlers::get_dashboard))
        .with_state(state)
}

/// Health endpoint at root level
pub fn root_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
