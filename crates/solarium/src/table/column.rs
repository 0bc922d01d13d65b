//! Typed column storage.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::stats::NumericSummary;
use crate::error::{Result, SolariumError};

/// The value kind a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    DateTime,
    Boolean,
}

impl ColumnKind {
    /// Whether arithmetic (imputation, z-scores, capping) applies.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnKind::DateTime)
    }

    /// Human-readable label for messages and reports.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::DateTime => "date_time",
            ColumnKind::Boolean => "boolean",
        }
    }
}

/// A column of equal-length typed cells. Missing cells are `None`; there is
/// no other missing representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    DateTime(Vec<Option<NaiveDateTime>>),
    Boolean(Vec<Option<bool>>),
}

impl Column {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::Numeric(_) => ColumnKind::Numeric,
            Column::Categorical(_) => ColumnKind::Categorical,
            Column::DateTime(_) => ColumnKind::DateTime,
            Column::Boolean(_) => ColumnKind::Boolean,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
            Column::DateTime(v) => v.len(),
            Column::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `None` cells.
    pub fn missing_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Categorical(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::DateTime(v) => v.iter().filter(|c| c.is_none()).count(),
            Column::Boolean(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Categorical(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&[Option<NaiveDateTime>]> {
        match self {
            Column::DateTime(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&[Option<bool>]> {
        match self {
            Column::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        self.as_numeric()
            .map(|cells| cells.iter().filter_map(|c| *c).collect())
    }

    /// Summary statistics for a numeric column; `None` for other kinds.
    pub fn summary(&self) -> Option<NumericSummary> {
        let cells = self.as_numeric()?;
        let values: Vec<f64> = cells.iter().filter_map(|c| *c).collect();
        Some(NumericSummary::compute(&values, cells.len() - values.len()))
    }

    /// A copy with rows rearranged so that output row `i` is input row
    /// `order[i]`.
    pub fn reordered(&self, order: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(order.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(order.iter().map(|&i| v[i].clone()).collect())
            }
            Column::DateTime(v) => Column::DateTime(order.iter().map(|&i| v[i]).collect()),
            Column::Boolean(v) => Column::Boolean(order.iter().map(|&i| v[i]).collect()),
        }
    }

    /// A copy of a contiguous row range.
    pub fn take_range(&self, range: std::ops::Range<usize>) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(v[range].to_vec()),
            Column::Categorical(v) => Column::Categorical(v[range].to_vec()),
            Column::DateTime(v) => Column::DateTime(v[range].to_vec()),
            Column::Boolean(v) => Column::Boolean(v[range].to_vec()),
        }
    }

    /// Append another column's cells. Kinds must match.
    pub fn extend_from(&mut self, other: &Column) -> Result<()> {
        match (self, other) {
            (Column::Numeric(a), Column::Numeric(b)) => a.extend_from_slice(b),
            (Column::Categorical(a), Column::Categorical(b)) => a.extend_from_slice(b),
            (Column::DateTime(a), Column::DateTime(b)) => a.extend_from_slice(b),
            (Column::Boolean(a), Column::Boolean(b)) => a.extend_from_slice(b),
            (a, b) => {
                return Err(SolariumError::InvalidParameter(format!(
                    "cannot append {} cells to a {} column",
                    b.kind().label(),
                    a.kind().label()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_count() {
        let col = Column::Numeric(vec![Some(1.0), None, Some(3.0), None]);
        assert_eq!(col.missing_count(), 2);
        assert_eq!(col.len(), 4);
        assert_eq!(col.kind(), ColumnKind::Numeric);
    }

    #[test]
    fn test_numeric_values_skips_missing() {
        let col = Column::Numeric(vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(col.numeric_values(), Some(vec![1.0, 3.0]));
    }

    #[test]
    fn test_summary_counts_missing() {
        let col = Column::Numeric(vec![Some(2.0), None, Some(4.0)]);
        let summary = col.summary().unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.missing, 1);
        assert!((summary.mean - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_non_numeric() {
        let col = Column::Categorical(vec![Some("a".to_string())]);
        assert!(col.summary().is_none());
    }

    #[test]
    fn test_reordered() {
        let col = Column::Numeric(vec![Some(10.0), Some(20.0), Some(30.0)]);
        let out = col.reordered(&[2, 0, 1]);
        assert_eq!(
            out,
            Column::Numeric(vec![Some(30.0), Some(10.0), Some(20.0)])
        );
    }

    #[test]
    fn test_extend_kind_mismatch() {
        let mut col = Column::Numeric(vec![Some(1.0)]);
        let other = Column::Boolean(vec![Some(true)]);
        assert!(col.extend_from(&other).is_err());
    }
}
