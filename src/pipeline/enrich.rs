//! Enrichment stage: converted volumes, revenue and per-well running totals.

use std::collections::HashSet;

use tracing::debug;

use super::conversion::convert;
use super::Dataset;
use crate::config::{PricingConfig, UnitConfig};
use crate::types::{EnrichedObservation, Observation};

#[derive(Debug, Default, Clone, Copy)]
struct RunningTotals {
    oil: f64,
    gas: f64,
    water: f64,
    oil_m3: f64,
    gas_m3: f64,
    water_m3: f64,
    revenue: f64,
}

/// Derive the enriched dataset from raw observations.
///
/// Cumulative sums run over each well's observations in ascending date order
/// and reset at every well boundary. Ingestion guarantees one observation per
/// `(well, date)`, so summation order is fully determined.
pub fn enrich(observations: Vec<Observation>, units: &UnitConfig, pricing: &PricingConfig) -> Dataset {
    let wells: Vec<String> = {
        let mut seen = HashSet::new();
        observations
            .iter()
            .filter(|o| seen.insert(o.well.as_str()))
            .map(|o| o.well.clone())
            .collect()
    };

    let mut observations = observations;
    observations.sort_by(|a, b| a.well.cmp(&b.well).then(a.date.cmp(&b.date)));

    let mut rows = Vec::with_capacity(observations.len());
    let mut totals = RunningTotals::default();
    let mut current_well: Option<String> = None;

    for obs in observations {
        if current_well.as_deref() != Some(obs.well.as_str()) {
            totals = RunningTotals::default();
            current_well = Some(obs.well.clone());
        }

        let c = convert(&obs, units, pricing);
        totals.oil += obs.oil;
        totals.gas += obs.gas;
        totals.water += obs.water;
        totals.oil_m3 += c.oil_m3;
        totals.gas_m3 += c.gas_m3;
        totals.water_m3 += c.water_m3;
        totals.revenue += c.daily_revenue;

        rows.push(EnrichedObservation {
            well: obs.well,
            date: obs.date,
            oil: obs.oil,
            gas: obs.gas,
            water: obs.water,
            oil_m3: c.oil_m3,
            gas_m3: c.gas_m3,
            water_m3: c.water_m3,
            daily_revenue: c.daily_revenue,
            cum_oil: totals.oil,
            cum_gas: totals.gas,
            cum_water: totals.water,
            cum_oil_m3: totals.oil_m3,
            cum_gas_m3: totals.gas_m3,
            cum_water_m3: totals.water_m3,
            cum_revenue: totals.revenue,
        });
    }

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.well.cmp(&b.well)));

    debug!(rows = rows.len(), wells = wells.len(), "Enriched production dataset");
    Dataset::new(rows, wells)
}
