//! Production Metrics Pipeline
//!
//! `load → enrich → {filter, score}`, each stage a pure function over an
//! immutable snapshot:
//!
//! 1. **Ingest** (`crate::ingest`): source table → `Observation`s
//! 2. **Enrich**: unit conversion, revenue, per-well cumulative sums → `Dataset`
//! 3. **Filter**: snapshot table, period totals, KPI deltas, chart series
//! 4. **Score**: heterogeneity index and recommendation rules
//!
//! `view` composes stages 3 and 4 into the dashboard view for one selection.

pub mod conversion;
pub mod dataset;
pub mod enrich;
pub mod filter;
pub mod scoring;
pub mod view;

pub use dataset::Dataset;
pub use enrich::enrich;
pub use view::{build_view, DashboardView, HeterogeneityView, TableView};

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::HiMetric;

/// Pipeline errors.
///
/// `DataSource` is fatal and aborts startup. The other two are recoverable
/// and degrade a single view to an empty or placeholder state.
#[derive(Debug, Error)]
pub enum ProductionError {
    #[error("Data source error ({}): {message}", .path.display())]
    DataSource {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error("No observations match {0}")]
    EmptySelection(String),

    #[error("Insufficient data on {date}: average {metric} is zero")]
    DivisionByZero { metric: HiMetric, date: NaiveDate },
}

impl ProductionError {
    pub(crate) fn data_source(
        path: impl Into<PathBuf>,
        line: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let message = match line {
            Some(n) => format!("line {n}: {message}"),
            None => message,
        };
        Self::DataSource {
            path: path.into(),
            line,
            message,
        }
    }

    /// Whether a view can degrade instead of failing the whole request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::DataSource { .. })
    }
}
