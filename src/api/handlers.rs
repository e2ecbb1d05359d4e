//! API route handlers
//!
//! Every handler computes its view from the shared, read-only dataset; no
//! handler mutates state. Panel-level failures (empty selection, zero
//! averages) come back as `200` with a `status` field so the dashboard can
//! render a placeholder. Only malformed or unknown query values are errors.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::response::Response;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::envelope::{ApiError, ApiResponse, ApiResult};
use crate::config::DashboardConfig;
use crate::ingest::parse_date;
use crate::pipeline::{
    build_view, filter, scoring, Dataset, HeterogeneityView, ProductionError, TableView,
};
use crate::types::{SeriesPoint, WellRecommendations, WellSelection, ALL_WELLS_LABEL};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Enriched production data, loaded once at startup
    pub dataset: Arc<Dataset>,
    /// Pricing, units and scoring settings the dataset was built with
    pub config: Arc<DashboardConfig>,
    pub started_at: Instant,
}

impl DashboardState {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// Query & response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    /// Well id, or absent / "All Wells" for every well
    #[serde(default)]
    pub well: Option<String>,
    /// Snapshot date; absent means the default date for the selection
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub observations: usize,
    pub wells: usize,
    pub dates: usize,
    pub latest_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct WellsResponse {
    pub options: Vec<String>,
    pub default: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DatesResponse {
    pub well: WellSelection,
    /// Newest first
    pub dates: Vec<NaiveDate>,
    pub default_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub well: WellSelection,
    pub series: Vec<SeriesPoint>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub date: NaiveDate,
    pub wells: Vec<WellRecommendations>,
    /// Why no wells were scored, when scoring was skipped
    pub message: Option<String>,
}

// ============================================================================
// Query resolution
// ============================================================================

fn resolve_well(ds: &Dataset, query: &SelectionQuery) -> Result<WellSelection, ApiError> {
    Ok(filter::resolve_selection(
        ds,
        query.well.as_deref().unwrap_or(ALL_WELLS_LABEL),
    )?)
}

fn parse_query_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_date(s)
            .map(Some)
            .ok_or_else(|| ApiError::InvalidDate(s.to_string())),
    }
}

/// Explicit date, else the selection's default date.
fn resolve_date(ds: &Dataset, selection: &WellSelection, query: &SelectionQuery) -> Result<NaiveDate, ApiError> {
    parse_query_date(query.date.as_deref())?
        .or_else(|| filter::default_date(ds, selection))
        .ok_or_else(|| ProductionError::EmptySelection("an empty dataset".to_string()).into())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
pub async fn health(State(state): State<DashboardState>) -> Response {
    let ds = &state.dataset;
    ApiResponse::ok(HealthResponse {
        status: "ok",
        uptime_seconds: state.started_at.elapsed().as_secs(),
        observations: ds.len(),
        wells: ds.wells().len(),
        dates: ds.dates().len(),
        latest_date: ds.latest_date(),
    })
}

/// GET /api/v1/config
pub async fn get_config(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.config.as_ref())
}

/// GET /api/v1/wells
pub async fn get_wells(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(WellsResponse {
        options: filter::well_options(&state.dataset),
        default: ALL_WELLS_LABEL,
    })
}

/// GET /api/v1/dates?well=W-01
pub async fn get_dates(
    State(state): State<DashboardState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult {
    let ds = &state.dataset;
    let well = resolve_well(ds, &query)?;
    Ok(ApiResponse::ok(DatesResponse {
        default_date: filter::default_date(ds, &well),
        dates: filter::date_options(ds),
        well,
    }))
}

/// GET /api/v1/summary?well=&date=
///
/// Period totals as of the date and their change since the previous period.
pub async fn get_summary(
    State(state): State<DashboardState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult {
    let ds = &state.dataset;
    let well = resolve_well(ds, &query)?;
    let date = resolve_date(ds, &well, &query)?;
    Ok(ApiResponse::ok(filter::kpi_summary(ds, &well, date)))
}

/// GET /api/v1/observations?well=&date=
pub async fn get_observations(
    State(state): State<DashboardState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult {
    let ds = &state.dataset;
    let well = resolve_well(ds, &query)?;
    let date = resolve_date(ds, &well, &query)?;
    Ok(ApiResponse::ok(TableView::from_result(filter::snapshot(ds, &well, date))))
}

/// GET /api/v1/observations/all
///
/// The full enriched dataset, every column, ordered by date then well.
pub async fn get_all_observations(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(state.dataset.rows())
}

/// GET /api/v1/history?well=
pub async fn get_history(
    State(state): State<DashboardState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult {
    let ds = &state.dataset;
    let well = resolve_well(ds, &query)?;
    Ok(ApiResponse::ok(HistoryResponse {
        series: filter::history_series(ds, &well),
        well,
    }))
}

/// GET /api/v1/heterogeneity?date=
///
/// Scores every well on the date; the well filter does not apply.
pub async fn get_heterogeneity(
    State(state): State<DashboardState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult {
    let ds = &state.dataset;
    let date = resolve_date(ds, &WellSelection::All, &query)?;
    let report = scoring::score_heterogeneity(ds, date, &state.config.scoring);
    Ok(ApiResponse::ok(HeterogeneityView::from_result(report)))
}

/// GET /api/v1/recommendations?date=
pub async fn get_recommendations(
    State(state): State<DashboardState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult {
    let ds = &state.dataset;
    let date = resolve_date(ds, &WellSelection::All, &query)?;
    let scoring_config = &state.config.scoring;
    let response = match scoring::score_heterogeneity(ds, date, scoring_config) {
        Ok(report) => RecommendationsResponse {
            date,
            wells: scoring::recommendations(&report, scoring_config),
            message: None,
        },
        Err(e) => RecommendationsResponse {
            date,
            wells: Vec::new(),
            message: Some(e.to_string()),
        },
    };
    Ok(ApiResponse::ok(response))
}

/// GET /api/v1/dashboard?well=&date=
///
/// Consolidated view: KPIs, table, history, heterogeneity and recommendations.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Query(query): Query<SelectionQuery>,
) -> ApiResult {
    let ds = &state.dataset;
    let well = resolve_well(ds, &query)?;
    let date = parse_query_date(query.date.as_deref())?;
    let view = build_view(ds, &state.config.scoring, &well, date)?;
    Ok(ApiResponse::ok(view))
}
