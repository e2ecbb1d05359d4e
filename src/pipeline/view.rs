//! Dashboard view composition.
//!
//! One `(well selection, date)` pair in, everything the dashboard renders out.
//! Recoverable failures of a single panel become an empty or placeholder
//! state inside the view; they never fail the whole view.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::{filter, scoring, Dataset, ProductionError};
use crate::config::ScoringConfig;
use crate::types::{
    HeterogeneityReport, KpiSummary, SeriesPoint, TableRow, WellRecommendations, WellSelection,
};

/// Snapshot table panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableView {
    Rows { rows: Vec<TableRow> },
    Empty { message: String },
}

impl TableView {
    pub fn from_result(result: Result<Vec<TableRow>, ProductionError>) -> Self {
        match result {
            Ok(rows) => Self::Rows { rows },
            Err(e) => {
                debug!(error = %e, "Snapshot table empty");
                Self::Empty {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Heterogeneity scatter panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeterogeneityView {
    Scored(HeterogeneityReport),
    InsufficientData { message: String },
}

impl HeterogeneityView {
    pub fn from_result(result: Result<HeterogeneityReport, ProductionError>) -> Self {
        match result {
            Ok(report) => Self::Scored(report),
            Err(e) => {
                debug!(error = %e, "Heterogeneity scoring skipped");
                Self::InsufficientData {
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn report(&self) -> Option<&HeterogeneityReport> {
        match self {
            Self::Scored(report) => Some(report),
            Self::InsufficientData { .. } => None,
        }
    }
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub well: WellSelection,
    pub date: NaiveDate,
    pub kpis: KpiSummary,
    pub table: TableView,
    pub history: Vec<SeriesPoint>,
    pub heterogeneity: HeterogeneityView,
    pub recommendations: Vec<WellRecommendations>,
}

/// Build the view for `selection` on `date` (default date when `None`).
///
/// Fails only when there is no date to show at all, i.e. the dataset is empty.
pub fn build_view(
    ds: &Dataset,
    scoring_config: &ScoringConfig,
    selection: &WellSelection,
    date: Option<NaiveDate>,
) -> Result<DashboardView, ProductionError> {
    let date = date
        .or_else(|| filter::default_date(ds, selection))
        .ok_or_else(|| ProductionError::EmptySelection("an empty dataset".to_string()))?;

    let heterogeneity =
        HeterogeneityView::from_result(scoring::score_heterogeneity(ds, date, scoring_config));
    let recommendations = heterogeneity
        .report()
        .map(|report| scoring::recommendations(report, scoring_config))
        .unwrap_or_default();

    Ok(DashboardView {
        well: selection.clone(),
        date,
        kpis: filter::kpi_summary(ds, selection, date),
        table: TableView::from_result(filter::snapshot(ds, selection, date)),
        history: filter::history_series(ds, selection),
        heterogeneity,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PricingConfig, UnitConfig};
    use crate::pipeline::enrich;
    use crate::types::Observation;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
    }

    fn obs(well: &str, day: u32, oil: f64, gas: f64, water: f64) -> Observation {
        Observation {
            well: well.to_string(),
            date: d(day),
            oil,
            gas,
            water,
        }
    }

    fn fixture() -> Dataset {
        enrich(
            vec![
                obs("A", 1, 100.0, 10_000.0, 20.0),
                obs("B", 1, 300.0, 30_000.0, 20.0),
                obs("A", 2, 0.0, 0.0, 5.0),
                obs("B", 2, 0.0, 0.0, 5.0),
            ],
            &UnitConfig::default(),
            &PricingConfig::default(),
        )
    }

    #[test]
    fn test_view_defaults_to_latest_date() {
        let view = build_view(&fixture(), &ScoringConfig::default(), &WellSelection::All, None).unwrap();
        assert_eq!(view.date, d(2));
    }

    #[test]
    fn test_view_scored_date_flags_low_producer() {
        let view = build_view(
            &fixture(),
            &ScoringConfig::default(),
            &WellSelection::All,
            Some(d(1)),
        )
        .unwrap();
        assert!(matches!(view.table, TableView::Rows { ref rows } if rows.len() == 2));
        assert!(view.heterogeneity.report().is_some());
        assert_eq!(view.recommendations.len(), 1);
        assert_eq!(view.recommendations[0].well, "A");
    }

    #[test]
    fn test_view_degrades_on_all_zero_oil() {
        let view = build_view(
            &fixture(),
            &ScoringConfig::default(),
            &WellSelection::All,
            Some(d(2)),
        )
        .unwrap();
        assert!(matches!(view.table, TableView::Empty { .. }));
        assert!(matches!(
            view.heterogeneity,
            HeterogeneityView::InsufficientData { .. }
        ));
        assert!(view.recommendations.is_empty());
        // KPIs still report the running totals
        assert!(view.kpis.oil_m3.total > 0.0);
        assert_eq!(view.kpis.oil_m3.delta, 0.0);
    }

    #[test]
    fn test_empty_dataset_fails() {
        let ds = enrich(Vec::new(), &UnitConfig::default(), &PricingConfig::default());
        let err = build_view(&ds, &ScoringConfig::default(), &WellSelection::All, None).unwrap_err();
        assert!(matches!(err, ProductionError::EmptySelection(_)));
    }

    #[test]
    fn test_view_serializes_panel_status() {
        let view = build_view(
            &fixture(),
            &ScoringConfig::default(),
            &WellSelection::All,
            Some(d(2)),
        )
        .unwrap();
        let v = serde_json::to_value(&view).unwrap();
        assert_eq!(v["well"], "All Wells");
        assert_eq!(v["table"]["status"], "empty");
        assert_eq!(v["heterogeneity"]["status"], "insufficient_data");
    }
}
