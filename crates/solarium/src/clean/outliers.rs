//! Z-score outlier detection and capping.
//!
//! Both passes score values against the mean and population standard
//! deviation of the column as it stands when the pass runs. Zero-variance
//! columns can never flag or clip anything; there is no division by a zero
//! deviation anywhere.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SolariumError};
use crate::table::{Column, NumericSummary, Table};

/// Name of the derived boolean flag column.
pub const OUTLIER_FLAG_COLUMN: &str = "Outlier_Flag";

/// One column's outlier tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierStats {
    pub count: usize,
    /// Percentage of rows, in `[0, 100]`.
    pub percentage: f64,
}

/// Result of an outlier scan: the flagged table plus per-column statistics.
#[derive(Debug, Clone)]
pub struct OutlierScan {
    /// Input table plus the `Outlier_Flag` column (the OR across all
    /// target columns' masks).
    pub table: Table,
    /// Per-column tallies, in target order.
    pub by_column: IndexMap<String, OutlierStats>,
    /// Rows flagged by at least one column.
    pub flagged_rows: usize,
    /// Targets whose variance was zero (with at least one observed value).
    pub zero_variance_columns: Vec<String>,
}

fn validate_z_threshold(z_threshold: f64) -> Result<()> {
    if !z_threshold.is_finite() || z_threshold <= 0.0 {
        return Err(SolariumError::InvalidParameter(format!(
            "z threshold must be a positive finite number, got {z_threshold}"
        )));
    }
    Ok(())
}

/// Flag rows whose value in any target column sits more than `z_threshold`
/// standard deviations from that column's mean. Missing cells never flag.
/// The result carries a boolean [`OUTLIER_FLAG_COLUMN`]; re-scanning
/// replaces an existing flag column instead of stacking a second one.
pub fn detect_outliers(
    table: &Table,
    columns: &[String],
    z_threshold: f64,
) -> Result<OutlierScan> {
    validate_z_threshold(z_threshold)?;
    for name in columns {
        table.numeric_cells(name)?;
    }

    let rows = table.row_count();
    let mut flags = vec![false; rows];
    let mut by_column = IndexMap::new();
    let mut zero_variance_columns = Vec::new();

    for name in columns {
        let cells = table.numeric_cells(name)?;
        let values: Vec<f64> = cells.iter().filter_map(|c| *c).collect();
        let summary = NumericSummary::compute(&values, cells.len() - values.len());

        if summary.count > 0 && summary.std == 0.0 {
            zero_variance_columns.push(name.clone());
        }

        let mut count = 0;
        if summary.std > 0.0 {
            for (row, cell) in cells.iter().enumerate() {
                if let Some(value) = cell {
                    if summary.z_score(*value).abs() > z_threshold {
                        flags[row] = true;
                        count += 1;
                    }
                }
            }
        }

        let percentage = if rows == 0 {
            0.0
        } else {
            count as f64 / rows as f64 * 100.0
        };
        by_column.insert(name.clone(), OutlierStats { count, percentage });
    }

    let flagged_rows = flags.iter().filter(|&&f| f).count();
    let mut flagged = table.clone();
    flagged.insert_column(
        OUTLIER_FLAG_COLUMN,
        Column::Boolean(flags.into_iter().map(Some).collect()),
    )?;

    Ok(OutlierScan {
        table: flagged,
        by_column,
        flagged_rows,
        zero_variance_columns,
    })
}

/// Winsorize the target columns: clamp every value into
/// `[mean - z*std, mean + z*std]`, with the statistics taken from the
/// column's current values. Missing cells and non-target columns are
/// untouched. The input table is never modified.
pub fn cap_outliers(table: &Table, columns: &[String], z_threshold: f64) -> Result<Table> {
    validate_z_threshold(z_threshold)?;
    for name in columns {
        table.numeric_cells(name)?;
    }

    let mut result = table.clone();
    for name in columns {
        let cells = table.numeric_cells(name)?;
        let values: Vec<f64> = cells.iter().filter_map(|c| *c).collect();
        let summary = NumericSummary::compute(&values, cells.len() - values.len());
        if summary.count == 0 || summary.std == 0.0 {
            continue;
        }

        let (low, high) = summary.z_band(z_threshold);
        let capped: Vec<Option<f64>> = cells
            .iter()
            .map(|&c| c.map(|v| v.clamp(low, high)))
            .collect();
        result.insert_column(name.clone(), Column::Numeric(capped))?;
    }
    Ok(result)
}
