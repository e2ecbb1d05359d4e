//! prodview: Well Production Reporting
//!
//! Loads daily per-well production, derives converted and cumulative volumes
//! plus revenue, and serves the dashboard views built from them.
//!
//! ## Architecture
//!
//! - **Ingest**: production table (CSV) → observations
//! - **Pipeline**: enrichment, filtering/period totals, heterogeneity scoring
//! - **API**: read-only JSON endpoints over a shared dataset
//! - **Report**: plain-text rendering for the command line

pub mod api;
pub mod config;
pub mod ingest;
pub mod pipeline;
pub mod report;
pub mod types;

pub use config::DashboardConfig;

pub use types::{
    EnrichedObservation, HeterogeneityReport, HeterogeneityScore, KpiSummary, Observation,
    Recommendation, WellRecommendations, WellSelection,
};

pub use pipeline::{build_view, enrich, DashboardView, Dataset, ProductionError};

use std::path::Path;

/// Load and enrich the production table at `path` with `config`'s settings.
pub fn load_dataset(path: &Path, config: &DashboardConfig) -> Result<Dataset, ProductionError> {
    let table = ingest::load_observations(path, config.ingest.duplicate_policy)?;
    Ok(enrich(table.observations, &config.units, &config.pricing))
}
