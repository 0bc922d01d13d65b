//! Source provenance and table description.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::table::{ColumnKind, Table};

/// Provenance record for a loaded file. Carried alongside the table so
/// pipeline reports can say exactly which bytes they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Timestamp cells that could not be parsed and loaded as missing.
    pub timestamp_parse_failures: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
        timestamp_parse_failures: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            timestamp_parse_failures,
            loaded_at: Utc::now(),
        }
    }
}

/// One column's entry in a [`TableInfo`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
}

/// Observed time span of a date-time column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Descriptive snapshot of a table: shape, column kinds, missing cells,
/// and the time span covered. Purely informational; nothing here mutates
/// the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnInfo>,
    pub numeric_columns: Vec<String>,
    pub missing_cells: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_range: Option<DateRange>,
}

impl TableInfo {
    /// Describe a table. The date range comes from the first date-time
    /// column holding at least one value.
    pub fn from_table(table: &Table) -> Self {
        let columns: Vec<ColumnInfo> = table
            .columns()
            .map(|(name, col)| ColumnInfo {
                name: name.to_string(),
                kind: col.kind(),
                missing: col.missing_count(),
            })
            .collect();

        let date_range = table.columns().find_map(|(_, col)| {
            let cells = col.as_datetime()?;
            let mut present = cells.iter().flatten();
            let first = *present.next()?;
            let (start, end) = present.fold((first, first), |(lo, hi), &t| {
                (if t < lo { t } else { lo }, if t > hi { t } else { hi })
            });
            Some(DateRange { start, end })
        });

        Self {
            row_count: table.row_count(),
            column_count: table.column_count(),
            numeric_columns: table.numeric_column_names(),
            missing_cells: table.missing_cells(),
            columns,
            date_range,
        }
    }
}

/// Convenience wrapper over [`TableInfo::from_table`].
pub fn table_info(table: &Table) -> TableInfo {
    TableInfo::from_table(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 8, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_info_shape_and_kinds() {
        let mut table = Table::new();
        table
            .insert_column(
                "Timestamp",
                Column::DateTime(vec![Some(ts(3)), Some(ts(1)), None]),
            )
            .unwrap();
        table
            .insert_column("GHI", Column::Numeric(vec![Some(1.0), None, Some(2.0)]))
            .unwrap();
        table
            .insert_column(
                "Comment",
                Column::Categorical(vec![None, None, Some("ok".to_string())]),
            )
            .unwrap();

        let info = TableInfo::from_table(&table);
        assert_eq!(info.row_count, 3);
        assert_eq!(info.column_count, 3);
        assert_eq!(info.numeric_columns, vec!["GHI"]);
        assert_eq!(info.missing_cells, 4);
        assert_eq!(info.columns[0].kind, ColumnKind::DateTime);
        assert_eq!(info.columns[2].missing, 2);

        let range = info.date_range.unwrap();
        assert_eq!(range.start, ts(1));
        assert_eq!(range.end, ts(3));
    }

    #[test]
    fn test_info_no_datetime_column() {
        let mut table = Table::new();
        table
            .insert_column("GHI", Column::Numeric(vec![Some(1.0)]))
            .unwrap();
        let info = TableInfo::from_table(&table);
        assert!(info.date_range.is_none());
    }

    #[test]
    fn test_info_all_missing_timestamps() {
        let mut table = Table::new();
        table
            .insert_column("Timestamp", Column::DateTime(vec![None, None]))
            .unwrap();
        let info = TableInfo::from_table(&table);
        assert!(info.date_range.is_none());
    }
}
