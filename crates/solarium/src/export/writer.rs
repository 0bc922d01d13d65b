//! CSV export with temp-column stripping and atomic writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::clean::CleaningReport;
use crate::error::{Result, SolariumError};
use crate::table::{Column, Table};

/// Working columns added during analysis that exports drop by default.
pub const DEFAULT_TEMP_COLUMNS: [&str; 5] = ["Hour", "Month", "Day", "WD_bin", "Outlier_Flag"];

/// Configuration for CSV export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Strip working columns before writing.
    pub remove_temp: bool,
    /// Override the list of working columns (None = [`DEFAULT_TEMP_COLUMNS`]).
    pub temp_columns: Option<Vec<String>>,
    /// Prepend a 0-based `index` column.
    pub write_row_index: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            remove_temp: true,
            temp_columns: None,
            write_row_index: false,
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove_temp(mut self, remove: bool) -> Self {
        self.remove_temp = remove;
        self
    }

    pub fn with_temp_columns(mut self, columns: Vec<String>) -> Self {
        self.temp_columns = Some(columns);
        self
    }

    pub fn with_row_index(mut self, write: bool) -> Self {
        self.write_row_index = write;
        self
    }
}

/// Write a table to CSV at `path` and return the written path.
///
/// Missing parent directories are created. The file is written through a
/// temporary file in the same directory and renamed into place, so an
/// interrupted export never leaves a partial file at `path`. Floats use
/// Rust's round-trip `Display` formatting, timestamps are written as
/// `%Y-%m-%d %H:%M:%S`, and missing cells become empty fields, so a
/// reload reproduces the table's values exactly.
///
/// Stripping every column (for example a table that only holds working
/// columns) is an error rather than an empty file.
pub fn export(table: &Table, path: impl AsRef<Path>, options: &ExportOptions) -> Result<PathBuf> {
    let path = path.as_ref();
    let temp_names: Vec<&str> = match &options.temp_columns {
        Some(list) => list.iter().map(String::as_str).collect(),
        None => DEFAULT_TEMP_COLUMNS.to_vec(),
    };
    let selected: Vec<(&str, &Column)> = table
        .columns()
        .filter(|(name, _)| !(options.remove_temp && temp_names.contains(name)))
        .collect();
    if selected.is_empty() {
        return Err(SolariumError::EmptyData(
            "no columns left to export".to_string(),
        ));
    }

    let parent = parent_dir(path);
    fs::create_dir_all(&parent).map_err(|e| SolariumError::file_access(&parent, e))?;
    let mut tmp =
        NamedTempFile::new_in(&parent).map_err(|e| SolariumError::file_access(&parent, e))?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());

        let mut header: Vec<String> = Vec::with_capacity(selected.len() + 1);
        if options.write_row_index {
            header.push("index".to_string());
        }
        header.extend(selected.iter().map(|(name, _)| name.to_string()));
        writer.write_record(&header)?;

        let mut record: Vec<String> = Vec::with_capacity(header.len());
        for row in 0..table.row_count() {
            record.clear();
            if options.write_row_index {
                record.push(row.to_string());
            }
            for (_, column) in &selected {
                record.push(format_cell(column, row));
            }
            writer.write_record(&record)?;
        }
        writer
            .flush()
            .map_err(|e| SolariumError::file_access(path, e))?;
    }
    tmp.persist(path)
        .map_err(|e| SolariumError::file_access(path, e.error))?;
    Ok(path.to_path_buf())
}

/// [`export`] with default options.
pub fn export_table(table: &Table, path: impl AsRef<Path>) -> Result<PathBuf> {
    export(table, path, &ExportOptions::default())
}

/// Write a cleaning report as pretty-printed JSON, atomically like [`export`].
pub fn write_report_json(report: &CleaningReport, path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let parent = parent_dir(path);
    fs::create_dir_all(&parent).map_err(|e| SolariumError::file_access(&parent, e))?;
    let mut tmp =
        NamedTempFile::new_in(&parent).map_err(|e| SolariumError::file_access(&parent, e))?;

    let mut json = serde_json::to_vec_pretty(report)?;
    json.push(b'\n');
    tmp.as_file_mut()
        .write_all(&json)
        .map_err(|e| SolariumError::file_access(path, e))?;
    tmp.persist(path)
        .map_err(|e| SolariumError::file_access(path, e.error))?;
    Ok(path.to_path_buf())
}

/// Stateful wrapper around [`export`]: holds the options.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn export(&self, table: &Table, path: impl AsRef<Path>) -> Result<PathBuf> {
        export(table, path, &self.options)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn format_cell(column: &Column, row: usize) -> String {
    match column {
        Column::Numeric(cells) => cells[row].map(|v| v.to_string()).unwrap_or_default(),
        Column::Categorical(cells) => cells[row].clone().unwrap_or_default(),
        Column::DateTime(cells) => cells[row]
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Column::Boolean(cells) => cells[row].map(|b| b.to_string()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{ColumnMissing, MissingSummary, OutlierStats};
    use crate::input::load_table;
    use chrono::NaiveDate;
    use indexmap::IndexMap;
    use tempfile::tempdir;

    fn make_table() -> Table {
        let mut table = Table::new();
        let timestamps = (0..3)
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 6, 1)
                    .unwrap()
                    .and_hms_opt(i, 0, 0)
            })
            .collect();
        table
            .insert_column("Timestamp", Column::DateTime(timestamps))
            .unwrap();
        table
            .insert_column(
                "GHI",
                Column::Numeric(vec![Some(0.1 + 0.2), None, Some(-3.5)]),
            )
            .unwrap();
        table
            .insert_column(
                "Sky",
                Column::Categorical(vec![Some("clear".to_string()), None, Some("cloudy".to_string())]),
            )
            .unwrap();
        table
            .insert_column(
                "Outlier_Flag",
                Column::Boolean(vec![Some(false), Some(true), Some(false)]),
            )
            .unwrap();
        table
            .insert_column("Hour", Column::Numeric(vec![Some(0.0), Some(1.0), Some(2.0)]))
            .unwrap();
        table
    }

    #[test]
    fn test_export_strips_temp_columns_by_default() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let table = make_table();
        export_table(&table, &out).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(content.lines().next().unwrap(), "Timestamp,GHI,Sky");
        // The caller's table keeps its working columns.
        assert!(table.contains_column("Outlier_Flag"));
        assert!(table.contains_column("Hour"));
    }

    #[test]
    fn test_export_keeps_temp_columns_when_disabled() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let options = ExportOptions::default().with_remove_temp(false);
        export(&make_table(), &out, &options).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            content.lines().next().unwrap(),
            "Timestamp,GHI,Sky,Outlier_Flag,Hour"
        );
    }

    #[test]
    fn test_export_custom_temp_list_replaces_default() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let options = ExportOptions::default().with_temp_columns(vec!["Sky".to_string()]);
        export(&make_table(), &out, &options).unwrap();

        // Only the custom list is stripped; the canonical names survive.
        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            content.lines().next().unwrap(),
            "Timestamp,GHI,Outlier_Flag,Hour"
        );
    }

    #[test]
    fn test_export_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("deeper").join("out.csv");
        let written = export_table(&make_table(), &out).unwrap();
        assert_eq!(written, out);
        assert!(out.exists());
    }

    #[test]
    fn test_export_round_trip_reproduces_values() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let table = make_table();
        let options = ExportOptions::default().with_remove_temp(false);
        export(&table, &out, &options).unwrap();

        let reloaded = load_table(&out).unwrap();
        assert_eq!(reloaded.column_names(), table.column_names());
        // 0.30000000000000004 survives the text round trip bit for bit.
        assert_eq!(
            reloaded.column("GHI").unwrap().as_numeric().unwrap(),
            table.column("GHI").unwrap().as_numeric().unwrap()
        );
        assert_eq!(
            reloaded.column("Timestamp").unwrap().as_datetime().unwrap(),
            table.column("Timestamp").unwrap().as_datetime().unwrap()
        );
        assert_eq!(
            reloaded.column("Outlier_Flag").unwrap().as_boolean().unwrap(),
            table.column("Outlier_Flag").unwrap().as_boolean().unwrap()
        );
        assert_eq!(
            reloaded.column("Sky").unwrap().as_categorical().unwrap(),
            table.column("Sky").unwrap().as_categorical().unwrap()
        );
    }

    #[test]
    fn test_export_row_index() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let options = ExportOptions::default().with_row_index(true);
        export(&make_table(), &out, &options).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), "index,Timestamp,GHI,Sky");
        assert!(lines.next().unwrap().starts_with("0,2024-06-01 00:00:00"));
        assert!(lines.next().unwrap().starts_with("1,"));
    }

    #[test]
    fn test_export_missing_cells_are_empty_fields() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        export_table(&make_table(), &out).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        let second_row = content.lines().nth(2).unwrap();
        assert_eq!(second_row, "2024-06-01 01:00:00,,");
    }

    #[test]
    fn test_export_rejects_unwritable_location() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let out = blocker.join("out.csv");
        let err = export_table(&make_table(), &out).unwrap_err();
        assert!(matches!(err, SolariumError::FileAccess { .. }));
    }

    #[test]
    fn test_export_refuses_empty_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let mut table = Table::new();
        table
            .insert_column("Outlier_Flag", Column::Boolean(vec![Some(true)]))
            .unwrap();
        let err = export_table(&table, &out).unwrap_err();
        assert!(matches!(err, SolariumError::EmptyData(_)));
        assert!(!out.exists());
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("report.json");

        let mut by_column = IndexMap::new();
        by_column.insert(
            "GHI".to_string(),
            ColumnMissing {
                count: 2,
                fraction: 0.1,
            },
        );
        let mut outliers = IndexMap::new();
        outliers.insert(
            "GHI".to_string(),
            OutlierStats {
                count: 1,
                percentage: 5.0,
            },
        );
        let report = CleaningReport {
            missing_values: MissingSummary {
                total_missing: 2,
                by_column,
                high_missing_columns: vec!["GHI".to_string()],
                threshold: 0.05,
            },
            outliers,
            total_outliers: 1,
            warnings: Vec::new(),
            cleaned_at: chrono::Utc::now(),
        };

        write_report_json(&report, &out).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["total_outliers"], 1);
        assert_eq!(value["missing_values"]["total_missing"], 2);
        assert_eq!(value["outliers"]["GHI"]["count"], 1);
        // Empty warning lists are omitted from the JSON entirely.
        assert!(value.get("warnings").is_none());
    }
}
