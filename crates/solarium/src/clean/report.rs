//! Cleaning report and data-quality warnings.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::missing::MissingSummary;
use super::outliers::OutlierStats;

/// A condition worth surfacing that does not stop the pipeline. Warnings
/// ride inside the report; they are never raised as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// An imputation target had no observed values at all; its cells were
    /// left missing rather than filled with an invented number.
    EmptyColumn { column: String },
    /// An outlier target had zero variance, so no value can ever be
    /// flagged.
    ZeroVariance { column: String },
}

impl DataQualityWarning {
    /// Human-readable description for terminal output.
    pub fn description(&self) -> String {
        match self {
            DataQualityWarning::EmptyColumn { column } => {
                format!("column '{column}' is entirely missing; imputation left it untouched")
            }
            DataQualityWarning::ZeroVariance { column } => {
                format!("column '{column}' has zero variance; no outliers can be flagged")
            }
        }
    }

    /// The column the warning is about.
    pub fn column(&self) -> &str {
        match self {
            DataQualityWarning::EmptyColumn { column } => column,
            DataQualityWarning::ZeroVariance { column } => column,
        }
    }
}

/// What a cleaning pass found and did. Missing-value statistics describe
/// the table as it arrived (before imputation); outlier statistics describe
/// the imputed table the detection pass saw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub missing_values: MissingSummary,
    /// Per-column outlier counts, in target-column order.
    pub outliers: IndexMap<String, OutlierStats>,
    /// Rows flagged by at least one column. An OR-count: a row beyond the
    /// threshold in three columns still counts once.
    pub total_outliers: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<DataQualityWarning>,
    pub cleaned_at: DateTime<Utc>,
}

impl CleaningReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
