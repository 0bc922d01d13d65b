//! Missing-value detection and imputation.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolariumError};
use crate::table::{Column, NumericSummary, Table};

/// How missing cells get filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputeMethod {
    /// Robust to skewed irradiance distributions; the default.
    Median,
    Mean,
    /// Most frequent value; ties resolve to the smallest.
    Mode,
}

impl Default for ImputeMethod {
    fn default() -> Self {
        ImputeMethod::Median
    }
}

impl FromStr for ImputeMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "median" => Ok(ImputeMethod::Median),
            "mean" => Ok(ImputeMethod::Mean),
            "mode" => Ok(ImputeMethod::Mode),
            other => Err(format!(
                "unknown imputation method '{other}' (expected median, mean, or mode)"
            )),
        }
    }
}

impl fmt::Display for ImputeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImputeMethod::Median => "median",
            ImputeMethod::Mean => "mean",
            ImputeMethod::Mode => "mode",
        };
        write!(f, "{name}")
    }
}

/// One column's missing-cell tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub count: usize,
    /// Fraction of rows missing, in `[0, 1]`.
    pub fraction: f64,
}

/// Missing-value statistics for a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSummary {
    pub total_missing: usize,
    /// Per-column tallies, in column order.
    pub by_column: IndexMap<String, ColumnMissing>,
    /// Columns whose missing fraction is at or above the threshold.
    pub high_missing_columns: Vec<String>,
    pub threshold: f64,
}

/// Tally missing cells per column and flag columns whose missing fraction
/// reaches `threshold` (a fraction in `[0, 1]`). Purely descriptive.
pub fn detect_missing_values(table: &Table, threshold: f64) -> Result<MissingSummary> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(SolariumError::InvalidParameter(format!(
            "missing threshold must be a fraction in [0, 1], got {threshold}"
        )));
    }

    let rows = table.row_count();
    let mut total_missing = 0;
    let mut by_column = IndexMap::new();
    let mut high_missing_columns = Vec::new();

    for (name, column) in table.columns() {
        let count = column.missing_count();
        let fraction = if rows == 0 {
            0.0
        } else {
            count as f64 / rows as f64
        };
        total_missing += count;
        if count > 0 && fraction >= threshold {
            high_missing_columns.push(name.to_string());
        }
        by_column.insert(name.to_string(), ColumnMissing { count, fraction });
    }

    Ok(MissingSummary {
        total_missing,
        by_column,
        high_missing_columns,
        threshold,
    })
}

/// Fill missing cells in the named numeric columns (`None` = every numeric
/// column) with the column's median, mean, or mode. A column with no
/// observed values is left as-is; `clean` reports it as a warning. The
/// input table is never modified.
pub fn impute_missing_values(
    table: &Table,
    columns: Option<&[String]>,
    method: ImputeMethod,
) -> Result<Table> {
    let targets: Vec<String> = match columns {
        Some(names) => names.to_vec(),
        None => table.numeric_column_names(),
    };
    // Validate every target before touching anything.
    for name in &targets {
        table.numeric_cells(name)?;
    }

    let mut result = table.clone();
    for name in &targets {
        let cells = table.numeric_cells(name)?;
        let values: Vec<f64> = cells.iter().filter_map(|c| *c).collect();
        if values.is_empty() || values.len() == cells.len() {
            continue;
        }

        let fill = match method {
            ImputeMethod::Median => NumericSummary::compute(&values, 0).median,
            ImputeMethod::Mean => NumericSummary::compute(&values, 0).mean,
            ImputeMethod::Mode => mode_of(&values),
        };
        let filled: Vec<Option<f64>> = cells.iter().map(|&c| c.or(Some(fill))).collect();
        result.insert_column(name.clone(), Column::Numeric(filled))?;
    }
    Ok(result)
}

/// Most frequent value; ties resolve to the smallest candidate.
fn mode_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut best = sorted[0];
    let mut best_len = 0usize;
    let mut run_value = sorted[0];
    let mut run_len = 0usize;
    for &v in &sorted {
        if v == run_value {
            run_len += 1;
        } else {
            run_value = v;
            run_len = 1;
        }
        if run_len > best_len {
            best_len = run_len;
            best = run_value;
        }
    }
    best
}
