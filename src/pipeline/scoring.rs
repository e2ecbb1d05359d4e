//! Heterogeneity Index Scoring
//!
//! Compares each well on one date against the cross-well average:
//!
//! - `HI_oil   = 1 − oil_m3 / avg_oil`
//! - `HI_gas   = 1 − gas_m3 / avg_gas`
//! - `HI_water = |1 − water_m3 / avg_water| + 1`
//!
//! Positive oil and gas indices mark a below-average producer, which is then
//! run through a fixed, non-exclusive rule table to produce recommendations.

use chrono::NaiveDate;
use tracing::debug;

use super::{Dataset, ProductionError};
use crate::config::ScoringConfig;
use crate::types::{
    EnrichedObservation, HeterogeneityReport, HeterogeneityScore, HiMetric, Recommendation,
    WellRecommendations,
};

/// Score every well in the scoring set of `date`.
///
/// The scoring set is all rows of the date, or only rows with positive oil
/// when `exclude_zero_oil` is set. Scoring always spans every well: the well
/// selector narrows tables and KPIs, not the cross-well comparison.
///
/// A zero average makes the index undefined; scoring is skipped and
/// `DivisionByZero` names the first metric (oil, gas, water) that hit it.
pub fn score_heterogeneity(
    ds: &Dataset,
    date: NaiveDate,
    config: &ScoringConfig,
) -> Result<HeterogeneityReport, ProductionError> {
    let set: Vec<&EnrichedObservation> = ds
        .on_date(date)
        .iter()
        .filter(|r| !config.exclude_zero_oil || r.oil > 0.0)
        .collect();

    if set.is_empty() {
        return Err(ProductionError::EmptySelection(format!(
            "heterogeneity scoring set on {date}"
        )));
    }

    let n = set.len() as f64;
    let avg_oil = set.iter().map(|r| r.oil_m3).sum::<f64>() / n;
    let avg_gas = set.iter().map(|r| r.gas_m3).sum::<f64>() / n;
    let avg_water = set.iter().map(|r| r.water_m3).sum::<f64>() / n;

    for (metric, avg) in [
        (HiMetric::Oil, avg_oil),
        (HiMetric::Gas, avg_gas),
        (HiMetric::Water, avg_water),
    ] {
        if avg == 0.0 || !avg.is_finite() {
            debug!(%date, %metric, "Skipping heterogeneity scoring: zero average");
            return Err(ProductionError::DivisionByZero { metric, date });
        }
    }

    let scores = set
        .iter()
        .map(|r| HeterogeneityScore {
            well: r.well.clone(),
            oil_m3: r.oil_m3,
            gas_m3: r.gas_m3,
            water_m3: r.water_m3,
            hi_oil: shortfall(r.oil_m3, avg_oil),
            hi_gas: shortfall(r.gas_m3, avg_gas),
            hi_water: shortfall(r.water_m3, avg_water).abs() + 1.0,
        })
        .collect();

    Ok(HeterogeneityReport {
        date,
        avg_oil_m3: avg_oil,
        avg_gas_m3: avg_gas,
        avg_water_m3: avg_water,
        scores,
    })
}

/// Deviations this close to zero are rounding noise from the average.
const AT_AVERAGE_TOLERANCE: f64 = 1e-9;

/// `1 − value / avg`, exactly zero for a well at the average.
fn shortfall(value: f64, avg: f64) -> f64 {
    let hi = 1.0 - value / avg;
    if hi.abs() < AT_AVERAGE_TOLERANCE {
        0.0
    } else {
        hi
    }
}

/// Rule table for one score. Empty unless the well is a below-average producer.
pub fn recommend_for(score: &HeterogeneityScore, config: &ScoringConfig) -> Vec<Recommendation> {
    if !score.is_below_average() {
        return Vec::new();
    }

    let mut actions = Vec::with_capacity(5);
    if score.hi_oil > config.oil_hi_threshold {
        actions.push(Recommendation::ArtificialLift);
    }
    if score.hi_gas > config.gas_hi_threshold {
        actions.push(Recommendation::GasLiftReview);
    }
    if score.hi_water > config.water_hi_threshold {
        actions.push(Recommendation::WaterManagement);
    }
    actions.push(Recommendation::CompletionReview);
    actions.push(Recommendation::Workover);
    actions
}

/// Recommendations for every flagged well, in scoring-table order.
pub fn recommendations(report: &HeterogeneityReport, config: &ScoringConfig) -> Vec<WellRecommendations> {
    report
        .scores
        .iter()
        .filter(|s| s.is_below_average())
        .map(|s| WellRecommendations {
            well: s.well.clone(),
            hi_oil: s.hi_oil,
            hi_gas: s.hi_gas,
            hi_water: s.hi_water,
            actions: recommend_for(s, config),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PricingConfig, UnitConfig};
    use crate::pipeline::enrich;
    use crate::types::Observation;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn obs(well: &str, oil: f64, gas: f64, water: f64) -> Observation {
        Observation {
            well: well.to_string(),
            date: day(),
            oil,
            gas,
            water,
        }
    }

    /// Unit factors of 1.0 so m3 values equal source values.
    fn dataset(observations: Vec<Observation>) -> Dataset {
        let units = UnitConfig {
            bbl_to_m3: 1.0,
            scf_to_m3: 1.0,
        };
        enrich(observations, &units, &PricingConfig::default())
    }

    fn score<'a>(report: &'a HeterogeneityReport, well: &str) -> &'a HeterogeneityScore {
        report.scores.iter().find(|s| s.well == well).unwrap()
    }

    #[test]
    fn test_two_well_scenario() {
        let ds = dataset(vec![obs("A", 100.0, 50.0, 10.0), obs("B", 300.0, 150.0, 10.0)]);
        let report = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap();

        assert_eq!(report.avg_oil_m3, 200.0);
        assert!((score(&report, "A").hi_oil - 0.5).abs() < 1e-12);
        assert!((score(&report, "B").hi_oil + 0.5).abs() < 1e-12);
        assert!(score(&report, "A").is_below_average());
        assert!(!score(&report, "B").is_below_average());
    }

    #[test]
    fn test_low_oil_but_high_gas_not_flagged() {
        let ds = dataset(vec![obs("A", 100.0, 300.0, 10.0), obs("B", 300.0, 100.0, 10.0)]);
        let report = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap();
        assert!(score(&report, "A").hi_oil > 0.0);
        assert!(score(&report, "A").hi_gas < 0.0);
        assert!(recommendations(&report, &ScoringConfig::default()).is_empty());
    }

    #[test]
    fn test_well_at_average() {
        let ds = dataset(vec![obs("A", 10.0, 10.0, 10.0), obs("B", 10.0, 10.0, 10.0)]);
        let report = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap();
        let a = score(&report, "A");
        assert_eq!(a.hi_oil, 0.0);
        assert_eq!(a.hi_gas, 0.0);
        assert_eq!(a.hi_water, 1.0);
    }

    #[test]
    fn test_well_at_inexact_average_is_not_flagged() {
        // 0.1 + 0.2 + 0.3 does not divide back to 0.2 exactly
        let ds = dataset(vec![
            obs("A", 0.1, 0.1, 0.1),
            obs("B", 0.2, 0.2, 0.2),
            obs("C", 0.3, 0.3, 0.3),
        ]);
        let report = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap();
        let b = score(&report, "B");
        assert_eq!(b.hi_oil, 0.0);
        assert_eq!(b.hi_gas, 0.0);
        assert_eq!(b.hi_water, 1.0);
        assert!(!b.is_below_average());

        let recs = recommendations(&report, &ScoringConfig::default());
        let wells: Vec<&str> = recs.iter().map(|r| r.well.as_str()).collect();
        assert_eq!(wells, vec!["A"]);
    }

    #[test]
    fn test_zero_oil_average_is_insufficient_data() {
        let ds = dataset(vec![obs("A", 0.0, 10.0, 10.0), obs("B", 0.0, 20.0, 5.0)]);
        let err = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ProductionError::DivisionByZero { metric: HiMetric::Oil, .. }
        ));
    }

    #[test]
    fn test_zero_water_average_is_insufficient_data() {
        let ds = dataset(vec![obs("A", 1.0, 10.0, 0.0)]);
        let err = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ProductionError::DivisionByZero { metric: HiMetric::Water, .. }
        ));
    }

    #[test]
    fn test_exclude_zero_oil_flag() {
        let ds = dataset(vec![
            obs("A", 100.0, 100.0, 10.0),
            obs("B", 300.0, 300.0, 10.0),
            obs("C", 0.0, 0.0, 10.0),
        ]);

        let all = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap();
        assert_eq!(all.scores.len(), 3);
        assert!((all.avg_oil_m3 - 400.0 / 3.0).abs() < 1e-9);

        let config = ScoringConfig {
            exclude_zero_oil: true,
            ..ScoringConfig::default()
        };
        let producing = score_heterogeneity(&ds, day(), &config).unwrap();
        assert_eq!(producing.scores.len(), 2);
        assert_eq!(producing.avg_oil_m3, 200.0);
    }

    #[test]
    fn test_no_rows_on_date_is_empty_selection() {
        let ds = dataset(vec![obs("A", 1.0, 1.0, 1.0)]);
        let other = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let err = score_heterogeneity(&ds, other, &ScoringConfig::default()).unwrap_err();
        assert!(matches!(err, ProductionError::EmptySelection(_)));
    }

    #[test]
    fn test_rule_table_all_fire_in_order() {
        let s = HeterogeneityScore {
            well: "A".into(),
            oil_m3: 0.0,
            gas_m3: 0.0,
            water_m3: 0.0,
            hi_oil: 0.8,
            hi_gas: 0.5,
            hi_water: 2.5,
        };
        assert_eq!(
            recommend_for(&s, &ScoringConfig::default()),
            vec![
                Recommendation::ArtificialLift,
                Recommendation::GasLiftReview,
                Recommendation::WaterManagement,
                Recommendation::CompletionReview,
                Recommendation::Workover,
            ]
        );
    }

    #[test]
    fn test_rule_table_thresholds_are_strict() {
        let s = HeterogeneityScore {
            well: "A".into(),
            oil_m3: 0.0,
            gas_m3: 0.0,
            water_m3: 0.0,
            hi_oil: 0.3,
            hi_gas: 0.1,
            hi_water: 2.0,
        };
        assert_eq!(
            recommend_for(&s, &ScoringConfig::default()),
            vec![Recommendation::CompletionReview, Recommendation::Workover]
        );
    }

    #[test]
    fn test_recommendations_keep_table_order() {
        let ds = dataset(vec![
            obs("W2", 10.0, 10.0, 1.0),
            obs("W1", 20.0, 20.0, 1.0),
            obs("W3", 300.0, 300.0, 1.0),
        ]);
        let report = score_heterogeneity(&ds, day(), &ScoringConfig::default()).unwrap();
        let recs = recommendations(&report, &ScoringConfig::default());
        let wells: Vec<&str> = recs.iter().map(|r| r.well.as_str()).collect();
        assert_eq!(wells, vec!["W1", "W2"]);
    }
}
