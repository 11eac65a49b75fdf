//! Roster Loader Module
//! Fetches a sheet's CSV export, validates its columns with Polars and
//! produces a typed, sorted RosterTable. Failures never escape: they are
//! reported next to an empty table.

use crate::data::cache::{Clock, TtlCache};
use crate::data::roster::{RosterRow, RosterTable};
use crate::data::source::{FetchError, SourceDescriptor, Transport};
use polars::prelude::*;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Column holding the position (city/slot) name.
pub const LABEL_COLUMN: &str = "VAGA";
/// Column holding the applicant count.
pub const COUNT_COLUMN: &str = "INSCRITOS";

#[derive(Error, Debug, Clone)]
pub enum LoadError {
    #[error("Sheet '{sheet}' is missing required column(s): {}", .missing.join(", "))]
    SchemaValidation { sheet: String, missing: Vec<String> },
    #[error("Sheet '{sheet}' is unavailable: {source}")]
    SourceUnavailable {
        sheet: String,
        #[source]
        source: Arc<FetchError>,
    },
}

impl LoadError {
    pub fn sheet(&self) -> &str {
        match self {
            LoadError::SchemaValidation { sheet, .. } | LoadError::SourceUnavailable { sheet, .. } => {
                sheet
            }
        }
    }

    fn unavailable(sheet: &str, err: FetchError) -> Self {
        LoadError::SourceUnavailable {
            sheet: sheet.to_string(),
            source: Arc::new(err),
        }
    }
}

/// Result of one load: always a table, plus the error that emptied it, if any.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: RosterTable,
    pub error: Option<LoadError>,
}

impl LoadOutcome {
    fn ok(table: RosterTable) -> Self {
        Self { table, error: None }
    }

    fn failed(error: LoadError) -> Self {
        Self {
            table: RosterTable::empty(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse a CSV payload into a RosterTable.
///
/// Only `VAGA` and `INSCRITOS` are read; any other column is ignored.
pub fn parse_roster_csv(sheet: &str, body: Vec<u8>) -> Result<RosterTable, LoadError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        // Infer over the whole payload so a late float or text cell is not nulled.
        .with_infer_schema_length(None)
        .with_ignore_errors(true)
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(|e| LoadError::unavailable(sheet, FetchError::Csv(e.to_string())))?;

    let label_col = find_column(&df, LABEL_COLUMN);
    let count_col = find_column(&df, COUNT_COLUMN);

    let (label_col, count_col) = match (label_col, count_col) {
        (Some(l), Some(c)) => (l, c),
        (l, c) => {
            let mut missing = Vec::new();
            if l.is_none() {
                missing.push(LABEL_COLUMN.to_string());
            }
            if c.is_none() {
                missing.push(COUNT_COLUMN.to_string());
            }
            return Err(LoadError::SchemaValidation {
                sheet: sheet.to_string(),
                missing,
            });
        }
    };

    let rows = extract_rows(label_col, count_col)
        .map_err(|e| LoadError::unavailable(sheet, FetchError::Csv(e.to_string())))?;

    Ok(RosterTable::from_rows(rows))
}

/// Header names are matched after trimming surrounding whitespace.
fn find_column<'a>(df: &'a DataFrame, wanted: &str) -> Option<&'a Column> {
    df.get_columns()
        .iter()
        .find(|col| col.name().as_str().trim() == wanted)
}

fn extract_rows(label_col: &Column, count_col: &Column) -> PolarsResult<Vec<RosterRow>> {
    let labels = label_col.cast(&DataType::String)?;
    let labels = labels.as_materialized_series().str()?;
    let counts = count_col.cast(&DataType::Float64)?;
    let counts = counts.f64()?;

    let mut rows = Vec::with_capacity(labels.len());
    let mut dropped = 0usize;
    let mut coerced = 0usize;

    for (label, count) in labels.into_iter().zip(counts.into_iter()) {
        // Quoted blanks arrive as "" rather than null.
        let Some(label) = label.filter(|l| !l.trim().is_empty()) else {
            dropped += 1;
            continue;
        };

        let applicant_count = match count {
            Some(v) if v.is_finite() && v >= 0.0 => v.round() as u64,
            _ => {
                coerced += 1;
                0
            }
        };

        rows.push(RosterRow::new(label, applicant_count));
    }

    if dropped > 0 {
        debug!(dropped, "skipped rows without a position label");
    }
    if coerced > 0 {
        warn!(coerced, "non-numeric or negative applicant counts treated as 0");
    }

    Ok(rows)
}

/// Loads rosters through a transport, caching each sheet's outcome for `ttl`.
pub struct RosterLoader {
    base_url: String,
    transport: Box<dyn Transport>,
    cache: TtlCache<SourceDescriptor, LoadOutcome>,
}

impl RosterLoader {
    pub fn new(
        base_url: impl Into<String>,
        transport: Box<dyn Transport>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            cache: TtlCache::new(ttl, clock),
        }
    }

    /// Load a sheet, serving from cache while the entry is fresh.
    pub fn load(&mut self, source: &SourceDescriptor) -> LoadOutcome {
        if let Some(hit) = self.cache.get(source) {
            debug!(sheet = %source.sheet_name, "cache hit");
            return hit;
        }

        self.cache.purge_expired();
        let outcome = self.fetch(source);
        self.cache.insert(source.clone(), outcome.clone());
        outcome
    }

    /// Fetch and parse without touching the cache.
    pub fn fetch(&self, source: &SourceDescriptor) -> LoadOutcome {
        let sheet = source.sheet_name.as_str();
        let url = source.export_url(&self.base_url);
        info!(sheet, "fetching roster");

        let result = self
            .transport
            .get(&url)
            .map_err(|e| LoadError::unavailable(sheet, e))
            .and_then(|body| parse_roster_csv(sheet, body));

        match result {
            Ok(table) => {
                info!(sheet, rows = table.len(), "roster loaded");
                LoadOutcome::ok(table)
            }
            Err(err) => {
                warn!(sheet, error = %err, "roster load failed");
                LoadOutcome::failed(err)
            }
        }
    }

    /// Forget one sheet so the next load re-fetches it.
    pub fn invalidate(&mut self, source: &SourceDescriptor) -> bool {
        self.cache.invalidate(source)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Result<RosterTable, LoadError> {
        parse_roster_csv("dashprof", csv.as_bytes().to_vec())
    }

    #[test]
    fn parses_sorts_and_projects() {
        let table = parse(
            "\"VAGA\",\"INSCRITOS\",\"UF\"\n\"City A\",\"10\",\"PE\"\n\"City B\",\"30\",\"PE\"\n\"City C\",\"5\",\"PE\"\n",
        )
        .unwrap();

        let got: Vec<(&str, u64)> = table
            .rows()
            .iter()
            .map(|r| (r.position_label.as_str(), r.applicant_count))
            .collect();
        assert_eq!(got, vec![("City B", 30), ("City A", 10), ("City C", 5)]);
        assert_eq!(table.total_applicants(), 45);
    }

    #[test]
    fn missing_count_column_names_it_and_the_sheet() {
        let err = parse("VAGA,OUTRO\nCity A,1\n").unwrap_err();
        match &err {
            LoadError::SchemaValidation { sheet, missing } => {
                assert_eq!(sheet, "dashprof");
                assert_eq!(missing, &vec!["INSCRITOS".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("INSCRITOS") && msg.contains("dashprof"));
    }

    #[test]
    fn missing_both_columns_lists_both() {
        let err = parse("A,B\n1,2\n").unwrap_err();
        match err {
            LoadError::SchemaValidation { missing, .. } => {
                assert_eq!(missing, vec!["VAGA".to_string(), "INSCRITOS".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn header_whitespace_is_ignored() {
        let table = parse(" VAGA , INSCRITOS \nCity A,3\n").unwrap();
        assert_eq!(table.total_applicants(), 3);
    }

    #[test]
    fn unusable_counts_become_zero_and_float_counts_round() {
        let table = parse("VAGA,INSCRITOS\nA,abc\nB,-4\nC,2.0\nD,\n").unwrap();
        let got: Vec<(&str, u64)> = table
            .rows()
            .iter()
            .map(|r| (r.position_label.as_str(), r.applicant_count))
            .collect();
        assert_eq!(got, vec![("C", 2), ("A", 0), ("B", 0), ("D", 0)]);
    }

    #[test]
    fn rows_without_label_are_dropped() {
        let table = parse("VAGA,INSCRITOS\n,7\nCity A,1\n").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].position_label, "City A");
    }

    #[test]
    fn quoted_blank_labels_are_dropped() {
        let table = parse("\"VAGA\",\"INSCRITOS\"\n\"101\",\"3\"\n\"\",\"9\"\n\"  \",\"4\"\n\"X\",\"7\"\n").unwrap();
        let got: Vec<(&str, u64)> = table
            .rows()
            .iter()
            .map(|r| (r.position_label.as_str(), r.applicant_count))
            .collect();
        assert_eq!(got, vec![("X", 7), ("101", 3)]);
    }

    #[test]
    fn late_float_count_is_not_lost() {
        let mut csv = String::from("VAGA,INSCRITOS\n");
        for i in 0..10_005 {
            csv.push_str(&format!("City {i},1\n"));
        }
        csv.push_str("Late,2.5\n");

        let table = parse(&csv).unwrap();
        assert_eq!(table.len(), 10_006);
        assert_eq!(table.rows()[0].position_label, "Late");
        assert_eq!(table.rows()[0].applicant_count, 3);
    }

    #[test]
    fn huge_counts_load_and_sum_without_overflow() {
        let table = parse("VAGA,INSCRITOS\nA,1e19\nB,1e19\n").unwrap();
        assert_eq!(table.rows()[0].applicant_count, 10_000_000_000_000_000_000);
        assert_eq!(table.total_applicants(), u64::MAX);
    }

    #[test]
    fn empty_payload_is_source_unavailable() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
        assert_eq!(err.sheet(), "dashprof");
    }
}
