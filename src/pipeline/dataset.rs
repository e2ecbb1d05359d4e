//! Immutable enriched dataset shared by every view.

use chrono::NaiveDate;

use crate::types::{EnrichedObservation, WellSelection};

/// Enriched observations ordered by `(date, well)`.
///
/// Built once by [`super::enrich`]; all accessors are read-only so one
/// instance can be shared across request handlers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<EnrichedObservation>,
    dates: Vec<NaiveDate>,
    wells: Vec<String>,
}

impl Dataset {
    /// `rows` must already be sorted by `(date, well)`.
    pub(crate) fn new(rows: Vec<EnrichedObservation>, wells: Vec<String>) -> Self {
        let mut dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        dates.dedup();
        Self { rows, dates, wells }
    }

    pub fn rows(&self) -> &[EnrichedObservation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct dates, oldest first.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Well ids in order of first appearance in the source.
    pub fn wells(&self) -> &[String] {
        &self.wells
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn contains_well(&self, well: &str) -> bool {
        self.wells.iter().any(|w| w == well)
    }

    /// All rows of one date.
    pub fn on_date(&self, date: NaiveDate) -> &[EnrichedObservation] {
        let start = self.rows.partition_point(|r| r.date < date);
        let end = self.rows.partition_point(|r| r.date <= date);
        &self.rows[start..end]
    }

    /// Rows matching a well selection, in dataset order.
    pub fn select<'a>(
        &'a self,
        selection: &'a WellSelection,
    ) -> impl Iterator<Item = &'a EnrichedObservation> + 'a {
        self.rows.iter().filter(move |r| selection.matches(&r.well))
    }
}
