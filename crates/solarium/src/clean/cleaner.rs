//! The cleaning pipeline: missing-value repair, outlier handling, report.

use chrono::Utc;

use super::missing::{ImputeMethod, detect_missing_values, impute_missing_values};
use super::outliers::{cap_outliers, detect_outliers};
use super::report::{CleaningReport, DataQualityWarning};
use crate::error::{Result, SolariumError};
use crate::table::Table;

/// Default missing-fraction threshold for flagging high-missing columns.
pub const DEFAULT_MISSING_THRESHOLD: f64 = 0.05;

/// Default z-score threshold for outlier detection and capping.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Configuration for a cleaning pass.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Columns to impute (None = every numeric column).
    pub numeric_columns: Option<Vec<String>>,
    /// Columns to scan and cap for outliers (None = the imputed set).
    pub outlier_columns: Option<Vec<String>>,
    pub impute_method: ImputeMethod,
    pub z_threshold: f64,
    pub missing_threshold: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            numeric_columns: None,
            outlier_columns: None,
            impute_method: ImputeMethod::default(),
            z_threshold: DEFAULT_Z_THRESHOLD,
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
        }
    }
}

impl CleanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric_columns(mut self, columns: Vec<String>) -> Self {
        self.numeric_columns = Some(columns);
        self
    }

    pub fn with_outlier_columns(mut self, columns: Vec<String>) -> Self {
        self.outlier_columns = Some(columns);
        self
    }

    pub fn with_impute_method(mut self, method: ImputeMethod) -> Self {
        self.impute_method = method;
        self
    }

    pub fn with_z_threshold(mut self, z_threshold: f64) -> Self {
        self.z_threshold = z_threshold;
        self
    }

    pub fn with_missing_threshold(mut self, threshold: f64) -> Self {
        self.missing_threshold = threshold;
        self
    }
}

/// Run the full cleaning pass: tally missing values, impute, flag
/// outliers, cap them, and assemble the report.
///
/// The missing-value statistics in the report describe the table as it
/// arrived; the outlier passes see the imputed data. The returned table
/// carries the `Outlier_Flag` column (the exporter strips it by default).
/// The input is never modified, so a failed call leaves the caller's data
/// exactly as it was.
pub fn clean(table: &Table, options: &CleanOptions) -> Result<(Table, CleaningReport)> {
    let numeric_targets: Vec<String> = match &options.numeric_columns {
        Some(columns) => columns.clone(),
        None => table.numeric_column_names(),
    };
    let outlier_targets: Vec<String> = match &options.outlier_columns {
        Some(columns) => columns.clone(),
        None => numeric_targets.clone(),
    };

    let missing = detect_missing_values(table, options.missing_threshold)?;

    let mut warnings = Vec::new();
    let rows = table.row_count();
    for name in &numeric_targets {
        let cells = table.numeric_cells(name)?;
        if rows > 0 && cells.iter().all(|c| c.is_none()) {
            warnings.push(DataQualityWarning::EmptyColumn {
                column: name.clone(),
            });
        }
    }

    let imputed = impute_missing_values(table, Some(&numeric_targets), options.impute_method)?;
    let scan = detect_outliers(&imputed, &outlier_targets, options.z_threshold)?;
    let capped = cap_outliers(&scan.table, &outlier_targets, options.z_threshold)?;

    for column in &scan.zero_variance_columns {
        warnings.push(DataQualityWarning::ZeroVariance {
            column: column.clone(),
        });
    }

    let report = CleaningReport {
        missing_values: missing,
        outliers: scan.by_column,
        total_outliers: scan.flagged_rows,
        warnings,
        cleaned_at: Utc::now(),
    };
    Ok((capped, report))
}

/// Stateful wrapper around [`clean`]: holds the options and the report of
/// the most recent pass.
#[derive(Debug, Clone)]
pub struct Cleaner {
    options: CleanOptions,
    last_report: Option<CleaningReport>,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::with_options(CleanOptions::default())
    }

    pub fn with_options(options: CleanOptions) -> Self {
        Self {
            options,
            last_report: None,
        }
    }

    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// Clean a table and remember the report.
    pub fn clean(&mut self, table: &Table) -> Result<(Table, CleaningReport)> {
        let (cleaned, report) = clean(table, &self.options)?;
        self.last_report = Some(report.clone());
        Ok((cleaned, report))
    }

    /// The report of the most recent [`Cleaner::clean`] call. Asking
    /// before any pass has run is a state error.
    pub fn report(&self) -> Result<&CleaningReport> {
        self.last_report.as_ref().ok_or_else(|| {
            SolariumError::State("no cleaning report available; call clean first".to_string())
        })
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
