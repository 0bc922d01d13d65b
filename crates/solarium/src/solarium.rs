//! Main Solarium struct and public API.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clean::{CleanOptions, CleaningReport, clean};
use crate::error::Result;
use crate::export::{ExportOptions, Exporter};
use crate::input::{Loader, LoaderConfig, SourceMetadata, TableInfo, table_info};

/// Configuration for a Solarium pipeline run.
#[derive(Debug, Clone, Default)]
pub struct SolariumConfig {
    /// Loader configuration.
    pub loader: LoaderConfig,
    /// Cleaning configuration.
    pub clean: CleanOptions,
    /// Export configuration.
    pub export: ExportOptions,
}

/// Result of processing a data file end to end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Shape and typing of the loaded table, before cleaning.
    pub info: TableInfo,
    /// What the cleaning pass found and changed.
    pub cleaning: CleaningReport,
    /// Where the cleaned data was written.
    pub output_path: PathBuf,
}

/// The main Solarium pipeline engine.
pub struct Solarium {
    config: SolariumConfig,
    loader: Loader,
    exporter: Exporter,
}

impl Solarium {
    /// Create a new Solarium instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(SolariumConfig::default())
    }

    /// Create a Solarium instance with custom configuration.
    pub fn with_config(config: SolariumConfig) -> Self {
        let loader = Loader::with_config(config.loader.clone());
        let exporter = Exporter::with_options(config.export.clone());
        Self {
            config,
            loader,
            exporter,
        }
    }

    /// Replace the cleaning options.
    pub fn with_clean_options(mut self, options: CleanOptions) -> Self {
        self.config.clean = options;
        self
    }

    /// Replace the export options.
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.config.export = options.clone();
        self.exporter = Exporter::with_options(options);
        self
    }

    pub fn config(&self) -> &SolariumConfig {
        &self.config
    }

    /// Load a file, clean it, and write the result to `output`.
    ///
    /// The report's `info` describes the table as loaded; the cleaning
    /// section describes what the pass changed on the way to `output`.
    pub fn process(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<PipelineReport> {
        let (table, source) = self.loader.load(input)?;
        let info = table_info(&table);
        let (cleaned, cleaning) = clean(&table, &self.config.clean)?;
        let output_path = self.exporter.export(&cleaned, output)?;
        Ok(PipelineReport {
            source,
            info,
            cleaning,
            output_path,
        })
    }

    /// Load a file and describe it without cleaning or writing anything.
    pub fn inspect(&self, input: impl AsRef<Path>) -> Result<(TableInfo, SourceMetadata)> {
        let (table, source) = self.loader.load(input)?;
        Ok((table_info(&table), source))
    }
}

impl Default for Solarium {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::DEFAULT_TEMP_COLUMNS;
    use crate::input::load_table;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn spike_csv() -> String {
        let mut content = String::from("Timestamp,GHI\n");
        for minute in 0..20 {
            content.push_str(&format!("2024-06-01 00:{minute:02}:00,10\n"));
        }
        content.push_str("2024-06-01 00:20:00,100\n");
        content
    }

    #[test]
    fn test_process_end_to_end() {
        let file = create_test_file(&spike_csv());
        let dir = tempdir().unwrap();
        let out = dir.path().join("clean.csv");

        let report = Solarium::new().process(file.path(), &out).unwrap();

        assert_eq!(report.source.row_count, 21);
        assert_eq!(report.info.row_count, 21);
        assert_eq!(report.info.numeric_columns, vec!["GHI"]);
        assert_eq!(report.cleaning.total_outliers, 1);
        assert_eq!(report.cleaning.outliers["GHI"].count, 1);
        assert_eq!(report.output_path, out);

        // The written file has the spike capped and the flag column gone.
        let cleaned = load_table(&out).unwrap();
        assert_eq!(cleaned.column_names(), vec!["Timestamp", "GHI"]);
        let cells = cleaned.column("GHI").unwrap().as_numeric().unwrap();
        assert!((cells[20].unwrap() - 71.78460514).abs() < 1e-6);
        assert_eq!(cells[0], Some(10.0));
    }

    #[test]
    fn test_process_report_serializes() {
        let file = create_test_file(&spike_csv());
        let dir = tempdir().unwrap();
        let out = dir.path().join("clean.csv");

        let report = Solarium::new().process(file.path(), &out).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["cleaning"]["total_outliers"], 1);
        assert_eq!(json["info"]["row_count"], 21);
        assert!(json["source"]["hash"].as_str().unwrap().starts_with("sha256:"));
    }

    #[test]
    fn test_inspect_reads_without_writing() {
        let file = create_test_file("Timestamp,GHI\n2024-06-01 00:00:00,10\n2024-06-01 00:01:00,\n");
        let (info, source) = Solarium::new().inspect(file.path()).unwrap();
        assert_eq!(info.row_count, 2);
        assert_eq!(info.missing_cells, 1);
        assert_eq!(source.column_count, 2);
    }

    #[test]
    fn test_process_respects_export_options() {
        let file = create_test_file(&spike_csv());
        let dir = tempdir().unwrap();
        let out = dir.path().join("clean.csv");

        let solarium = Solarium::new()
            .with_export_options(ExportOptions::default().with_remove_temp(false));
        solarium.process(file.path(), &out).unwrap();

        let cleaned = load_table(&out).unwrap();
        assert!(cleaned.contains_column(DEFAULT_TEMP_COLUMNS[4]));
    }
}
