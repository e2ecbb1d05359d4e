//! Well/date filtering and period aggregation.
//!
//! Period totals never sum raw daily values: they take each well's largest
//! cumulative value inside the date bound and sum those across wells, which
//! yields "most recent running total per well as of the cutoff".

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{Dataset, ProductionError};
use crate::types::{
    DateBound, EnrichedObservation, Kpi, KpiSummary, PeriodTotals, SeriesPoint, TableRow,
    WellSelection, ALL_WELLS_LABEL,
};

/// Resolve a selector label against the dataset; unknown wells are an empty selection.
pub fn resolve_selection(ds: &Dataset, label: &str) -> Result<WellSelection, ProductionError> {
    let selection = WellSelection::from_label(label);
    match &selection {
        WellSelection::Well(id) if !ds.contains_well(id) => {
            Err(ProductionError::EmptySelection(format!("well '{id}'")))
        }
        _ => Ok(selection),
    }
}

/// Well selector options: "All Wells" followed by wells in source order.
pub fn well_options(ds: &Dataset) -> Vec<String> {
    std::iter::once(ALL_WELLS_LABEL.to_string())
        .chain(ds.wells().iter().cloned())
        .collect()
}

/// Date selector options, newest first.
pub fn date_options(ds: &Dataset) -> Vec<NaiveDate> {
    ds.dates().iter().rev().copied().collect()
}

/// Latest date for the selection, falling back to the dataset's latest date
/// when the selected well has no rows.
pub fn default_date(ds: &Dataset, selection: &WellSelection) -> Option<NaiveDate> {
    match selection {
        WellSelection::All => ds.latest_date(),
        WellSelection::Well(_) => ds
            .select(selection)
            .map(|r| r.date)
            .max()
            .or_else(|| ds.latest_date()),
    }
}

/// Snapshot table: rows on `date` matching the selection, zero-oil rows hidden.
pub fn snapshot(
    ds: &Dataset,
    selection: &WellSelection,
    date: NaiveDate,
) -> Result<Vec<TableRow>, ProductionError> {
    let rows: Vec<TableRow> = ds
        .on_date(date)
        .iter()
        .filter(|r| selection.matches(&r.well) && r.oil > 0.0)
        .map(TableRow::from)
        .collect();

    if rows.is_empty() {
        return Err(ProductionError::EmptySelection(format!(
            "{selection} on {date}"
        )));
    }
    Ok(rows)
}

/// Sum across wells of each well's maximum cumulative value within `bound`.
///
/// Zero when no rows fall inside the bound.
pub fn period_totals(ds: &Dataset, selection: &WellSelection, bound: DateBound) -> PeriodTotals {
    let mut per_well: HashMap<&str, PeriodTotals> = HashMap::new();

    for row in ds.select(selection).filter(|r| bound.contains(r.date)) {
        let entry = per_well.entry(row.well.as_str()).or_default();
        entry.oil_m3 = entry.oil_m3.max(row.cum_oil_m3);
        entry.gas_m3 = entry.gas_m3.max(row.cum_gas_m3);
        entry.water_m3 = entry.water_m3.max(row.cum_water_m3);
        entry.revenue = entry.revenue.max(row.cum_revenue);
    }

    // Sum in source well order so results do not depend on hash order
    ds.wells()
        .iter()
        .filter_map(|w| per_well.get(w.as_str()))
        .fold(PeriodTotals::default(), |acc, t| PeriodTotals {
            oil_m3: acc.oil_m3 + t.oil_m3,
            gas_m3: acc.gas_m3 + t.gas_m3,
            water_m3: acc.water_m3 + t.water_m3,
            revenue: acc.revenue + t.revenue,
        })
}

/// Totals as of `cutoff` and their change since the previous period
/// (same selection, strictly before `cutoff`).
pub fn kpi_summary(ds: &Dataset, selection: &WellSelection, cutoff: NaiveDate) -> KpiSummary {
    let current = period_totals(ds, selection, DateBound::UpTo(cutoff));
    let previous = period_totals(ds, selection, DateBound::Before(cutoff));

    KpiSummary {
        well: selection.clone(),
        cutoff,
        oil_m3: Kpi::new(current.oil_m3, previous.oil_m3),
        gas_m3: Kpi::new(current.gas_m3, previous.gas_m3),
        water_m3: Kpi::new(current.water_m3, previous.water_m3),
        revenue: Kpi::new(current.revenue, previous.revenue),
    }
}

/// Production history chart series.
///
/// For all wells each point is the per-date sum across wells; for one well
/// it is that well's daily values.
pub fn history_series(ds: &Dataset, selection: &WellSelection) -> Vec<SeriesPoint> {
    let mut series: Vec<SeriesPoint> = Vec::with_capacity(ds.dates().len());

    for row in ds.select(selection) {
        match series.last_mut() {
            Some(point) if point.date == row.date => accumulate(point, row),
            _ => {
                let mut point = SeriesPoint {
                    date: row.date,
                    oil_m3: 0.0,
                    gas_m3: 0.0,
                    water_m3: 0.0,
                    daily_revenue: 0.0,
                };
                accumulate(&mut point, row);
                series.push(point);
            }
        }
    }

    series
}

fn accumulate(point: &mut SeriesPoint, row: &EnrichedObservation) {
    point.oil_m3 += row.oil_m3;
    point.gas_m3 += row.gas_m3;
    point.water_m3 += row.water_m3;
    point.daily_revenue += row.daily_revenue;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PricingConfig, UnitConfig};
    use crate::pipeline::enrich;
    use crate::types::Observation;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn obs(well: &str, day: u32, oil: f64) -> Observation {
        Observation {
            well: well.to_string(),
            date: d(day),
            oil,
            gas: oil * 100.0,
            water: oil / 2.0,
        }
    }

    fn fixture() -> Dataset {
        enrich(
            vec![
                obs("A", 1, 100.0),
                obs("B", 1, 200.0),
                obs("A", 2, 100.0),
                obs("B", 2, 0.0),
                obs("A", 3, 50.0),
                obs("C", 3, 10.0),
            ],
            &UnitConfig::default(),
            &PricingConfig::default(),
        )
    }

    #[test]
    fn test_snapshot_hides_zero_oil() {
        let ds = fixture();
        let rows = snapshot(&ds, &WellSelection::All, d(2)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].well, "A");
    }

    #[test]
    fn test_snapshot_empty_selection() {
        let ds = fixture();
        let err = snapshot(&ds, &WellSelection::Well("B".into()), d(2)).unwrap_err();
        assert!(matches!(err, ProductionError::EmptySelection(_)));
        assert!(snapshot(&ds, &WellSelection::All, d(20)).is_err());
    }

    #[test]
    fn test_period_totals_use_latest_cumulative() {
        let ds = fixture();
        let t = period_totals(&ds, &WellSelection::All, DateBound::UpTo(d(2)));
        // A: 200 bbl, B: 200 bbl
        assert!((t.oil_m3 - 400.0 * 0.159).abs() < 1e-9);
    }

    #[test]
    fn test_period_totals_no_rows_is_zero() {
        let ds = fixture();
        let t = period_totals(&ds, &WellSelection::All, DateBound::Before(d(1)));
        assert_eq!(t, PeriodTotals::default());
    }

    #[test]
    fn test_kpi_delta_for_single_well() {
        let ds = fixture();
        let kpis = kpi_summary(&ds, &WellSelection::Well("A".into()), d(3));
        assert!((kpis.oil_m3.total - 250.0 * 0.159).abs() < 1e-9);
        assert!((kpis.oil_m3.delta - 50.0 * 0.159).abs() < 1e-9);
        // 50 bbl * 80 + 5 MCF * 3.5
        assert!((kpis.revenue.delta - 4_017.5).abs() < 1e-9);
    }

    #[test]
    fn test_first_date_delta_equals_total() {
        let ds = fixture();
        let kpis = kpi_summary(&ds, &WellSelection::All, d(1));
        assert_eq!(kpis.oil_m3.delta, kpis.oil_m3.total);
    }

    #[test]
    fn test_history_series_sums_per_date() {
        let ds = fixture();
        let series = history_series(&ds, &WellSelection::All);
        assert_eq!(series.len(), 3);
        assert!((series[0].oil_m3 - 300.0 * 0.159).abs() < 1e-9);
        assert!((series[2].oil_m3 - 60.0 * 0.159).abs() < 1e-9);

        let single = history_series(&ds, &WellSelection::Well("C".into()));
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].date, d(3));
    }

    #[test]
    fn test_default_date() {
        let ds = fixture();
        assert_eq!(default_date(&ds, &WellSelection::All), Some(d(3)));
        assert_eq!(default_date(&ds, &WellSelection::Well("B".into())), Some(d(2)));
        assert_eq!(default_date(&ds, &WellSelection::Well("Z".into())), Some(d(3)));
    }

    #[test]
    fn test_selector_options() {
        let ds = fixture();
        assert_eq!(well_options(&ds), vec!["All Wells", "A", "B", "C"]);
        assert_eq!(date_options(&ds), vec![d(3), d(2), d(1)]);
    }

    #[test]
    fn test_resolve_selection() {
        let ds = fixture();
        assert_eq!(resolve_selection(&ds, "All Wells").unwrap(), WellSelection::All);
        assert_eq!(
            resolve_selection(&ds, "B").unwrap(),
            WellSelection::Well("B".to_string())
        );
        assert!(resolve_selection(&ds, "nope").is_err());
    }
}
