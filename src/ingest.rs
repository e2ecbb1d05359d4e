//! Production Table Ingestion
//!
//! Reads the all-wells production sheet (exported as CSV) into
//! [`Observation`]s. Expected columns, matched case-insensitively and in any
//! order; other columns are ignored:
//!
//! ```text
//! well,date,oil,gas,water
//! W-01,2024-01-01,812.5,402000,120.0
//! ```
//!
//! Oil and water are barrels, gas is standard cubic feet. Every failure is a
//! fatal [`ProductionError::DataSource`] carrying the offending line.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::{info, warn};

use crate::config::DuplicatePolicy;
use crate::pipeline::ProductionError;
use crate::types::Observation;

const REQUIRED_COLUMNS: [&str; 5] = ["well", "date", "oil", "gas", "water"];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Ingest summary alongside the observations.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub observations: Vec<Observation>,
    pub rows_read: usize,
    pub duplicates_merged: usize,
}

/// Load the production table from a CSV file.
pub fn load_observations(path: &Path, policy: DuplicatePolicy) -> Result<IngestedTable, ProductionError> {
    let file = File::open(path)
        .map_err(|e| ProductionError::data_source(path, None, format!("failed to open: {e}")))?;
    let table = read_observations(file, path, policy)?;
    info!(
        path = %path.display(),
        rows = table.rows_read,
        observations = table.observations.len(),
        duplicates_merged = table.duplicates_merged,
        "Loaded production table"
    );
    Ok(table)
}

/// Parse a production table from any reader. `source` names it in errors.
pub fn read_observations<R: Read>(
    reader: R,
    source: &Path,
    policy: DuplicatePolicy,
) -> Result<IngestedTable, ProductionError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| ProductionError::data_source(source, Some(1), format!("unreadable header: {e}")))?
        .clone();
    let columns = ColumnMap::resolve(&headers)
        .map_err(|missing| {
            ProductionError::data_source(
                source,
                Some(1),
                format!("missing required column(s): {}", missing.join(", ")),
            )
        })?;

    let mut observations: Vec<Observation> = Vec::new();
    let mut index: HashMap<(String, NaiveDate), usize> = HashMap::new();
    let mut rows_read = 0usize;
    let mut duplicates_merged = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().and_then(source_line);
            ProductionError::data_source(source, line, format!("CSV parse error: {e}"))
        })?;
        // Line the record starts on; blank lines and quoted newlines shift it
        // away from the record index
        let line = record.position().and_then(source_line);

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        rows_read += 1;

        let obs = columns
            .parse_row(&record)
            .map_err(|msg| ProductionError::data_source(source, line, msg))?;

        let key = (obs.well.clone(), obs.date);
        match index.get(&key) {
            Some(&existing) => match policy {
                DuplicatePolicy::Sum => {
                    let target = &mut observations[existing];
                    target.oil += obs.oil;
                    target.gas += obs.gas;
                    target.water += obs.water;
                    duplicates_merged += 1;
                }
                DuplicatePolicy::Reject => {
                    return Err(ProductionError::data_source(
                        source,
                        line,
                        format!("duplicate row for well '{}' on {}", obs.well, obs.date),
                    ));
                }
            },
            None => {
                index.insert(key, observations.len());
                observations.push(obs);
            }
        }
    }

    if observations.is_empty() {
        return Err(ProductionError::data_source(source, None, "no data rows"));
    }
    if duplicates_merged > 0 {
        warn!(
            source = %source.display(),
            count = duplicates_merged,
            "Merged duplicate (well, date) rows by summing volumes"
        );
    }

    Ok(IngestedTable {
        observations,
        rows_read,
        duplicates_merged,
    })
}

/// Parse a date cell. Time components are discarded.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// 1-based source line of a csv position.
fn source_line(pos: &csv::Position) -> Option<usize> {
    usize::try_from(pos.line()).ok()
}

/// Column positions of the required fields.
struct ColumnMap {
    well: usize,
    date: usize,
    oil: usize,
    gas: usize,
    water: usize,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, Vec<&'static str>> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (normalize_header(name), i))
            .collect();

        let missing: Vec<&'static str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !positions.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let at = |name: &str| positions.get(name).copied().unwrap_or_default();
        Ok(Self {
            well: at("well"),
            date: at("date"),
            oil: at("oil"),
            gas: at("gas"),
            water: at("water"),
        })
    }

    fn parse_row(&self, record: &StringRecord) -> Result<Observation, String> {
        let well = record.get(self.well).unwrap_or_default();
        if well.is_empty() {
            return Err("empty well identifier".to_string());
        }

        let raw_date = record.get(self.date).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| format!("invalid date '{raw_date}'"))?;

        Ok(Observation {
            well: well.to_string(),
            date,
            oil: parse_volume(record.get(self.oil), "oil")?,
            gas: parse_volume(record.get(self.gas), "gas")?,
            water: parse_volume(record.get(self.water), "water")?,
        })
    }
}

/// Lowercase and strip the UTF-8 BOM spreadsheet exports put on the first header.
fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

/// Empty cells read as zero; anything else must be a finite, non-negative number.
fn parse_volume(raw: Option<&str>, field: &str) -> Result<f64, String> {
    let raw = raw.unwrap_or_default();
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = raw
        .replace(',', "")
        .parse()
        .map_err(|_| format!("invalid {field} value '{raw}'"))?;
    if !value.is_finite() {
        return Err(format!("{field} value '{raw}' is not finite"));
    }
    if value < 0.0 {
        return Err(format!("{field} value {value} is negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str, policy: DuplicatePolicy) -> Result<IngestedTable, ProductionError> {
        read_observations(csv.as_bytes(), Path::new("test.csv"), policy)
    }

    fn error_line(err: ProductionError) -> Option<usize> {
        match err {
            ProductionError::DataSource { line, .. } => line,
            other => panic!("expected DataSource, got {other:?}"),
        }
    }

    #[test]
    fn test_parses_rows() {
        let table = read(
            "well,date,oil,gas,water\nW-1,2024-01-01,10.5,2000,3\nW-2,2024-01-01,0,0,0\n",
            DuplicatePolicy::Sum,
        )
        .unwrap();
        assert_eq!(table.observations.len(), 2);
        assert_eq!(table.observations[0].well, "W-1");
        assert_eq!(table.observations[0].oil, 10.5);
        assert_eq!(table.observations[0].gas, 2000.0);
    }

    #[test]
    fn test_headers_case_insensitive_any_order_with_bom() {
        let table = read(
            "\u{feff}Date,WELL,Water,Oil,Gas,Comment\n2024-02-03,A,1,2,3,ok\n",
            DuplicatePolicy::Sum,
        )
        .unwrap();
        let o = &table.observations[0];
        assert_eq!(o.well, "A");
        assert_eq!((o.oil, o.gas, o.water), (2.0, 3.0, 1.0));
    }

    #[test]
    fn test_missing_column_is_error() {
        let err = read("well,date,oil,gas\nA,2024-01-01,1,1\n", DuplicatePolicy::Sum).unwrap_err();
        assert!(err.to_string().contains("water"));
        assert_eq!(error_line(err), Some(1));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = read(
            "well,date,oil,gas,water\nA,2024-01-01,1,1,1\nA,2024-01-02,abc,1,1\n",
            DuplicatePolicy::Sum,
        )
        .unwrap_err();
        assert_eq!(error_line(err), Some(3));
    }

    #[test]
    fn test_bad_number_after_blank_line_reports_source_line() {
        let err = read(
            "well,date,oil,gas,water\nA,2024-01-01,1,1,1\n\nA,2024-01-02,abc,1,1\n",
            DuplicatePolicy::Sum,
        )
        .unwrap_err();
        assert_eq!(error_line(err), Some(4));
    }

    #[test]
    fn test_bad_number_after_quoted_newline_reports_source_line() {
        let err = read(
            "well,date,oil,gas,water\n\"A\nX\",2024-01-01,1,1,1\nA,2024-01-02,abc,1,1\n",
            DuplicatePolicy::Sum,
        )
        .unwrap_err();
        assert_eq!(error_line(err), Some(4));
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        assert!(read("well,date,oil,gas,water\nA,2024-01-01,-1,1,1\n", DuplicatePolicy::Sum).is_err());
        assert!(read("well,date,oil,gas,water\nA,2024-01-01,NaN,1,1\n", DuplicatePolicy::Sum).is_err());
    }

    #[test]
    fn test_empty_cells_read_as_zero() {
        let table = read("well,date,oil,gas,water\nA,2024-01-01,5,,\n", DuplicatePolicy::Sum).unwrap();
        assert_eq!(table.observations[0].gas, 0.0);
        assert_eq!(table.observations[0].water, 0.0);
    }

    #[test]
    fn test_duplicates_summed() {
        let table = read(
            "well,date,oil,gas,water\nA,2024-01-01,5,10,1\nA,2024-01-01 00:00:00,7,20,2\n",
            DuplicatePolicy::Sum,
        )
        .unwrap();
        assert_eq!(table.observations.len(), 1);
        assert_eq!(table.duplicates_merged, 1);
        assert_eq!(table.observations[0].oil, 12.0);
        assert_eq!(table.observations[0].gas, 30.0);
    }

    #[test]
    fn test_duplicates_rejected() {
        let err = read(
            "well,date,oil,gas,water\nA,2024-01-01,5,10,1\nA,2024-01-01,7,20,2\n",
            DuplicatePolicy::Reject,
        )
        .unwrap_err();
        assert_eq!(error_line(err), Some(3));
    }

    #[test]
    fn test_header_only_is_error() {
        assert!(read("well,date,oil,gas,water\n", DuplicatePolicy::Sum).is_err());
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024/03/09"), expected);
        assert_eq!(parse_date("03/09/2024"), expected);
        assert_eq!(parse_date("2024-03-09 00:00:00"), expected);
        assert_eq!(parse_date("2024-03-09T06:30:00"), expected);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_missing_file() {
        let err = load_observations(Path::new("/nonexistent/wells.csv"), DuplicatePolicy::Sum).unwrap_err();
        assert!(!err.is_recoverable());
    }
}
