//! Production data types
//!
//! Raw observations as read from the source table, the enriched per-row
//! record produced by the metrics pipeline, and the aggregate/score types the
//! dashboard views are built from.

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Label used by the well selector for "no well restriction".
pub const ALL_WELLS_LABEL: &str = "All Wells";

// ============================================================================
// Observations
// ============================================================================

/// One day of production for one well, in source units.
///
/// Oil and water are in barrels, gas in standard cubic feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub well: String,
    pub date: NaiveDate,
    /// Oil volume (bbl)
    pub oil: f64,
    /// Gas volume (scf)
    pub gas: f64,
    /// Water volume (bbl)
    pub water: f64,
}

/// An observation with converted volumes, revenue and per-well running totals.
///
/// Cumulative fields are accumulated in date order within one well and reset
/// at each well boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedObservation {
    pub well: String,
    pub date: NaiveDate,
    pub oil: f64,
    pub gas: f64,
    pub water: f64,
    pub oil_m3: f64,
    pub gas_m3: f64,
    pub water_m3: f64,
    pub daily_revenue: f64,
    pub cum_oil: f64,
    pub cum_gas: f64,
    pub cum_water: f64,
    pub cum_oil_m3: f64,
    pub cum_gas_m3: f64,
    pub cum_water_m3: f64,
    pub cum_revenue: f64,
}

/// Projection of an enriched observation used by the snapshot table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub well: String,
    pub date: NaiveDate,
    pub oil_m3: f64,
    pub gas_m3: f64,
    pub water_m3: f64,
    pub daily_revenue: f64,
    pub cum_oil_m3: f64,
    pub cum_gas_m3: f64,
    pub cum_water_m3: f64,
    pub cum_revenue: f64,
}

impl From<&EnrichedObservation> for TableRow {
    fn from(row: &EnrichedObservation) -> Self {
        Self {
            well: row.well.clone(),
            date: row.date,
            oil_m3: row.oil_m3,
            gas_m3: row.gas_m3,
            water_m3: row.water_m3,
            daily_revenue: row.daily_revenue,
            cum_oil_m3: row.cum_oil_m3,
            cum_gas_m3: row.cum_gas_m3,
            cum_water_m3: row.cum_water_m3,
            cum_revenue: row.cum_revenue,
        }
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Well filter axis: every well, or exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WellSelection {
    #[default]
    All,
    Well(String),
}

impl WellSelection {
    /// Interpret a selector value. Empty input and the "All Wells" label both
    /// mean no restriction.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_WELLS_LABEL) {
            Self::All
        } else {
            Self::Well(trimmed.to_string())
        }
    }

    pub fn matches(&self, well: &str) -> bool {
        match self {
            Self::All => true,
            Self::Well(id) => id == well,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_WELLS_LABEL,
            Self::Well(id) => id,
        }
    }
}

impl fmt::Display for WellSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for WellSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Date filter axis for period aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// `date <= cutoff`
    UpTo(NaiveDate),
    /// `date < cutoff`
    Before(NaiveDate),
}

impl DateBound {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::UpTo(cutoff) => date <= cutoff,
            Self::Before(cutoff) => date < cutoff,
        }
    }
}

// ============================================================================
// Aggregates
// ============================================================================

/// Period totals across a well set: the sum of each well's latest cumulative value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub oil_m3: f64,
    pub gas_m3: f64,
    pub water_m3: f64,
    pub revenue: f64,
}

/// A KPI value paired with its change from the previous period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpi {
    pub total: f64,
    pub delta: f64,
}

impl Kpi {
    pub fn new(total: f64, previous: f64) -> Self {
        Self {
            total,
            delta: total - previous,
        }
    }
}

/// The four headline metrics for a well selection as of a cutoff date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    pub well: WellSelection,
    pub cutoff: NaiveDate,
    pub oil_m3: Kpi,
    pub gas_m3: Kpi,
    pub water_m3: Kpi,
    pub revenue: Kpi,
}

/// One point of the production history chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub oil_m3: f64,
    pub gas_m3: f64,
    pub water_m3: f64,
    pub daily_revenue: f64,
}

// ============================================================================
// Heterogeneity scoring
// ============================================================================

/// Metric a heterogeneity average is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HiMetric {
    Oil,
    Gas,
    Water,
}

impl fmt::Display for HiMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HiMetric::Oil => write!(f, "oil_m3"),
            HiMetric::Gas => write!(f, "gas_m3"),
            HiMetric::Water => write!(f, "water_m3"),
        }
    }
}

/// Heterogeneity index of one well on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeterogeneityScore {
    pub well: String,
    pub oil_m3: f64,
    pub gas_m3: f64,
    pub water_m3: f64,
    pub hi_oil: f64,
    pub hi_gas: f64,
    pub hi_water: f64,
}

impl HeterogeneityScore {
    /// Positive oil and gas indices: the well produces below the cross-well average.
    pub fn is_below_average(&self) -> bool {
        self.hi_oil > 0.0 && self.hi_gas > 0.0
    }
}

/// Scores for every well in the scoring set of one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeterogeneityReport {
    pub date: NaiveDate,
    pub avg_oil_m3: f64,
    pub avg_gas_m3: f64,
    pub avg_water_m3: f64,
    pub scores: Vec<HeterogeneityScore>,
}

/// Remedial action suggested for a below-average producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    ArtificialLift,
    GasLiftReview,
    WaterManagement,
    CompletionReview,
    Workover,
}

impl Recommendation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArtificialLift => "artificial_lift",
            Self::GasLiftReview => "gas_lift_review",
            Self::WaterManagement => "water_management",
            Self::CompletionReview => "completion_review",
            Self::Workover => "workover",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::ArtificialLift => "Consider artificial lift optimization or wellbore stimulation",
            Self::GasLiftReview => "Evaluate gas lift system or compression optimization",
            Self::WaterManagement => "Investigate water production management",
            Self::CompletionReview => "Review completion design and reservoir connectivity",
            Self::Workover => "Consider workover operations",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Recommendation", 2)?;
        s.serialize_field("code", self.code())?;
        s.serialize_field("message", self.message())?;
        s.end()
    }
}

/// Ordered recommendations for one flagged well.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellRecommendations {
    pub well: String,
    pub hi_oil: f64,
    pub hi_gas: f64,
    pub hi_water: f64,
    pub actions: Vec<Recommendation>,
}
