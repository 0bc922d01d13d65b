//! CSV loading into typed columns.
//!
//! Values are typed per column: the configured timestamp column parses to
//! date-times (one sniffed format per column, unparseable rows load as
//! missing), columns whose values all read as finite floats become numeric,
//! all-`true`/`false` columns become boolean, and the rest stay
//! categorical. Numeric storage never contains NaN or infinities; text
//! that would produce them is categorical data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

use super::source::SourceMetadata;
use crate::error::{Result, SolariumError};
use crate::table::{Column, Table};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Recognized timestamp shapes, checked in order. Each pattern pairs a
/// quick regex prescreen with the chrono format used for the actual parse.
static TIMESTAMP_FORMATS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap(),
            "%Y-%m-%d %H:%M:%S",
        ),
        (
            Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").unwrap(),
            "%Y-%m-%d %H:%M",
        ),
        (
            Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").unwrap(),
            "%Y-%m-%dT%H:%M:%S",
        ),
        (Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap(), "%Y-%m-%d"),
        (
            Regex::new(r"^\d{1,2}/\d{1,2}/\d{4} \d{1,2}:\d{2}$").unwrap(),
            "%m/%d/%Y %H:%M",
        ),
        (Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(), "%m/%d/%Y"),
    ]
});

/// Check if a raw cell represents a missing value.
pub fn is_missing_marker(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Column to parse as date-times (if present).
    pub timestamp_column: String,
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum data rows to read (None = all).
    pub max_rows: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timestamp_column: "Timestamp".to_string(),
            delimiter: None,
            max_rows: None,
        }
    }
}

impl LoaderConfig {
    pub fn with_timestamp_column(mut self, name: impl Into<String>) -> Self {
        self.timestamp_column = name.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Loads delimited sensor files into typed tables.
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file into a typed table plus its provenance record.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| SolariumError::file_access(path, e))?;
        let file_meta = file
            .metadata()
            .map_err(|e| SolariumError::file_access(path, e))?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| SolariumError::file_access(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (table, delimiter, timestamp_failures) = self.table_from_bytes(&contents)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            file_meta.len(),
            format,
            table.row_count(),
            table.column_count(),
            timestamp_failures,
        );

        Ok((table, metadata))
    }

    /// Parse bytes into a typed table. Returns the table, the delimiter
    /// used, and the count of unparseable timestamp cells.
    fn table_from_bytes(&self, bytes: &[u8]) -> Result<(Table, u8, usize)> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = dedupe_headers(reader.headers()?.iter());
        if headers.is_empty() {
            return Err(SolariumError::EmptyData("no header row found".to_string()));
        }
        let expected_cols = headers.len();

        let mut grid: Vec<Vec<String>> = vec![Vec::new(); expected_cols];
        for (row_idx, record) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            let record = record?;
            for (col_idx, cells) in grid.iter_mut().enumerate() {
                // Ragged rows pad with empty cells; extra cells are dropped.
                cells.push(record.get(col_idx).unwrap_or("").to_string());
            }
        }

        let mut table = Table::new();
        let mut timestamp_failures = 0;
        for (name, cells) in headers.into_iter().zip(grid) {
            let column = if name == self.config.timestamp_column {
                let (column, failures) = build_timestamp_column(&cells);
                timestamp_failures += failures;
                column
            } else {
                build_column(&cells)
            };
            table.insert_column(name, column)?;
        }

        Ok((table, delimiter, timestamp_failures))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a file into a typed table, discarding the provenance record.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    Loader::new().load(path).map(|(table, _)| table)
}

/// Disambiguate duplicate header names with numeric suffixes.
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for name in raw {
        let name = name.trim();
        let mut candidate = name.to_string();
        let mut suffix = 2;
        while headers.iter().any(|h| h == &candidate) {
            candidate = format!("{name}_{suffix}");
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

/// Type a non-timestamp column from its raw cells.
fn build_column(cells: &[String]) -> Column {
    let present: Vec<&str> = cells
        .iter()
        .map(|c| c.trim())
        .filter(|c| !is_missing_marker(c))
        .collect();

    if !present.is_empty() {
        let numeric: Vec<f64> = present
            .iter()
            .filter_map(|c| c.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect();
        if numeric.len() == present.len() {
            return Column::Numeric(
                cells
                    .iter()
                    .map(|c| {
                        let trimmed = c.trim();
                        if is_missing_marker(trimmed) {
                            None
                        } else {
                            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
                        }
                    })
                    .collect(),
            );
        }

        let boolean = present
            .iter()
            .all(|c| c.eq_ignore_ascii_case("true") || c.eq_ignore_ascii_case("false"));
        if boolean {
            return Column::Boolean(
                cells
                    .iter()
                    .map(|c| {
                        let trimmed = c.trim();
                        if is_missing_marker(trimmed) {
                            None
                        } else {
                            Some(trimmed.eq_ignore_ascii_case("true"))
                        }
                    })
                    .collect(),
            );
        }

        return Column::Categorical(
            cells
                .iter()
                .map(|c| {
                    let trimmed = c.trim();
                    if is_missing_marker(trimmed) {
                        None
                    } else {
                        Some(trimmed.to_string())
                    }
                })
                .collect(),
        );
    }

    // Entirely missing: numeric, matching how a gap-only sensor column
    // behaves downstream.
    Column::Numeric(vec![None; cells.len()])
}

/// Parse the timestamp column. The format is sniffed from the first cell
/// that matches a known shape; every row then parses with that one format,
/// and failures load as missing. Returns the failure count.
fn build_timestamp_column(cells: &[String]) -> (Column, usize) {
    let format = cells.iter().map(|c| c.trim()).find_map(|c| {
        if is_missing_marker(c) {
            return None;
        }
        TIMESTAMP_FORMATS
            .iter()
            .find(|(pattern, _)| pattern.is_match(c))
            .map(|(_, format)| *format)
    });

    let mut failures = 0;
    let parsed: Vec<Option<NaiveDateTime>> = cells
        .iter()
        .map(|c| {
            let trimmed = c.trim();
            if is_missing_marker(trimmed) {
                return None;
            }
            let value = format.and_then(|f| parse_timestamp(trimmed, f));
            if value.is_none() {
                failures += 1;
            }
            value
        })
        .collect();

    (Column::DateTime(parsed), failures)
}

fn parse_timestamp(value: &str, format: &str) -> Option<NaiveDateTime> {
    if format.contains("%H") {
        NaiveDateTime::parse_from_str(value, format).ok()
    } else {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    }
}

/// Detect the delimiter by scoring candidates over the first few lines.
/// Consistent per-line counts win; ties favor the earliest candidate.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(10)
        .collect();
    if lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0usize;
    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_outside_quotes(line, delim))
            .collect();
        let first = counts[0];
        if first == 0 {
            continue;
        }
        let consistent = counts.iter().all(|&c| c == first);
        let score = if consistent { first * 100 } else { first };
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}

/// Count delimiter occurrences in a line, ignoring quoted sections.
fn count_outside_quotes(line: &str, delimiter: u8) -> usize {
    let delim = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;
    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim && !in_quotes => count += 1,
            _ => {}
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;
    use std::io::Write;

    fn load_bytes(bytes: &[u8]) -> Table {
        let (table, _, _) = Loader::new().table_from_bytes(bytes).unwrap();
        table
    }

    #[test]
    fn test_detect_delimiter_csv() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6"), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3\n4\t5\t6"), b'\t');
    }

    #[test]
    fn test_detect_delimiter_quoted_commas() {
        assert_eq!(
            detect_delimiter(b"a;b\n\"x,y,z\";2\n\"p,q\";4"),
            b';',
            "commas inside quotes must not win"
        );
    }

    #[test]
    fn test_load_typed_columns() {
        let table = load_bytes(
            b"Timestamp,GHI,Site,Flagged\n\
              2021-08-09 00:01:00,1.2,benin,true\n\
              2021-08-09 00:02:00,3.4,togo,false\n",
        );
        assert_eq!(
            table.column_names(),
            vec!["Timestamp", "GHI", "Site", "Flagged"]
        );
        assert_eq!(
            table.column("Timestamp").unwrap().kind(),
            ColumnKind::DateTime
        );
        assert_eq!(table.column("GHI").unwrap().kind(), ColumnKind::Numeric);
        assert_eq!(table.column("Site").unwrap().kind(), ColumnKind::Categorical);
        assert_eq!(table.column("Flagged").unwrap().kind(), ColumnKind::Boolean);
        assert_eq!(table.numeric_values("GHI").unwrap(), vec![1.2, 3.4]);
    }

    #[test]
    fn test_missing_markers_load_as_none() {
        let table = load_bytes(b"GHI,DNI\n1.0,NA\nn/a,2.0\n,3.0\nnan,-\n");
        assert_eq!(table.column("GHI").unwrap().missing_count(), 3);
        assert_eq!(table.column("DNI").unwrap().missing_count(), 2);
        assert_eq!(table.column("GHI").unwrap().kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_unparseable_timestamp_rows_become_missing() {
        let (table, _, failures) = Loader::new()
            .table_from_bytes(
                b"Timestamp,GHI\n\
                  2021-08-09 00:01:00,1.0\n\
                  not-a-time,2.0\n\
                  2021-08-09 00:03:00,3.0\n",
            )
            .unwrap();
        let cells = table.column("Timestamp").unwrap().as_datetime().unwrap();
        assert!(cells[0].is_some());
        assert!(cells[1].is_none());
        assert!(cells[2].is_some());
        assert_eq!(failures, 1);
        // The bad row still loads fully elsewhere.
        assert_eq!(table.numeric_values("GHI").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_minute_precision_timestamps() {
        let table = load_bytes(b"Timestamp,GHI\n2021-08-09 00:01,5.0\n");
        let cells = table.column("Timestamp").unwrap().as_datetime().unwrap();
        assert_eq!(
            cells[0].unwrap(),
            NaiveDate::from_ymd_opt(2021, 8, 9)
                .unwrap()
                .and_hms_opt(0, 1, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_date_only_timestamps_midnight() {
        let table = load_bytes(b"Timestamp,GHI\n2021-08-09,5.0\n");
        let cells = table.column("Timestamp").unwrap().as_datetime().unwrap();
        assert_eq!(
            cells[0].unwrap(),
            NaiveDate::from_ymd_opt(2021, 8, 9)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_numeric_needs_every_value_to_parse() {
        let table = load_bytes(b"Reading\n1.0\n2.5\ncalibration error\n");
        assert_eq!(
            table.column("Reading").unwrap().kind(),
            ColumnKind::Categorical
        );
    }

    #[test]
    fn test_infinite_values_stay_text() {
        let table = load_bytes(b"Reading\n1.0\ninf\n");
        assert_eq!(
            table.column("Reading").unwrap().kind(),
            ColumnKind::Categorical
        );
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        let table = load_bytes(b"GHI\nNA\n\nnull\n");
        let col = table.column("GHI").unwrap();
        assert_eq!(col.kind(), ColumnKind::Numeric);
        assert_eq!(col.missing_count(), 3);
    }

    #[test]
    fn test_duplicate_headers_disambiguated() {
        let table = load_bytes(b"GHI,GHI,GHI\n1,2,3\n");
        assert_eq!(table.column_names(), vec!["GHI", "GHI_2", "GHI_3"]);
    }

    #[test]
    fn test_ragged_rows_pad_and_truncate() {
        let table = load_bytes(b"a,b,c\n1,2\n4,5,6,7\n");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("c").unwrap().missing_count(), 1);
        assert_eq!(table.numeric_values("a").unwrap(), vec![1.0, 4.0]);
    }

    #[test]
    fn test_header_only_file_loads_empty_table() {
        let table = load_bytes(b"Timestamp,GHI\n");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_empty_input_is_empty_data_error() {
        let result = Loader::new().table_from_bytes(b"");
        assert!(matches!(result, Err(SolariumError::EmptyData(_))));
    }

    #[test]
    fn test_max_rows() {
        let config = LoaderConfig::default().with_max_rows(2);
        let (table, _, _) = Loader::with_config(config)
            .table_from_bytes(b"GHI\n1\n2\n3\n4\n")
            .unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let result = Loader::new().load("/definitely/not/here.csv");
        assert!(matches!(result, Err(SolariumError::FileAccess { .. })));
    }

    #[test]
    fn test_load_file_with_metadata() {
        let mut temp = tempfile::NamedTempFile::new().unwrap();
        write!(temp, "Timestamp,GHI\n2021-08-09 00:01:00,4.5\n").unwrap();

        let (table, meta) = Loader::new().load(temp.path()).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(meta.row_count, 1);
        assert_eq!(meta.column_count, 2);
        assert_eq!(meta.format, "csv");
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.timestamp_parse_failures, 0);
        assert!(meta.size_bytes > 0);
    }

    #[test]
    fn test_custom_timestamp_column() {
        let config = LoaderConfig::default().with_timestamp_column("time");
        let (table, _, _) = Loader::with_config(config)
            .table_from_bytes(b"time,v\n2021-01-01 10:00:00,1\n")
            .unwrap();
        assert_eq!(table.column("time").unwrap().kind(), ColumnKind::DateTime);
    }
}
