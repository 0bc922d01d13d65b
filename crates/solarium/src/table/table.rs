//! Ordered, equal-length column collection.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::column::{Column, ColumnKind};
use crate::error::{Result, SolariumError};

/// An in-memory table: named columns in insertion order, every column the
/// same length. Column order survives every operation, so exports line up
/// with the source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: IndexMap<String, Column>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    time_index: Option<String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Iterate `(name, column)` pairs in column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    /// Insert a column, or replace one in place (the replaced column keeps
    /// its position). Length must match the existing rows.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.row_count() {
            return Err(SolariumError::InvalidParameter(format!(
                "column '{}' has {} rows, table has {}",
                name,
                column.len(),
                self.row_count()
            )));
        }
        self.columns.insert(name, column);
        Ok(())
    }

    /// Remove a column, preserving the order of the rest.
    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        if self.time_index.as_deref() == Some(name) {
            self.time_index = None;
        }
        self.columns.shift_remove(name)
    }

    /// Names of numeric columns, in column order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|(_, col)| col.kind().is_numeric())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Validated access to a numeric column's cells (missing included).
    pub fn numeric_cells(&self, name: &str) -> Result<&[Option<f64>]> {
        let column = self
            .column(name)
            .ok_or_else(|| SolariumError::unknown_column(name))?;
        column.as_numeric().ok_or_else(|| {
            SolariumError::InvalidParameter(format!(
                "column '{}' is not numeric ({})",
                name,
                column.kind().label()
            ))
        })
    }

    /// Non-missing values of a numeric column, in row order.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        Ok(self
            .numeric_cells(name)?
            .iter()
            .filter_map(|cell| *cell)
            .collect())
    }

    /// Total missing cells across all columns.
    pub fn missing_cells(&self) -> usize {
        self.columns.values().map(Column::missing_count).sum()
    }

    /// The column rows are currently ordered by, if any.
    pub fn time_index(&self) -> Option<&str> {
        self.time_index.as_deref()
    }

    /// Re-key the table on a date-time column: stable-sort every column by
    /// its values (missing timestamps last) and remember the index so
    /// [`Table::slice_time`] can binary-search. Optional; nothing else
    /// depends on it.
    pub fn set_time_index(&mut self, name: &str) -> Result<()> {
        let timestamps = self.datetime_cells(name)?;

        let mut order: Vec<usize> = (0..timestamps.len()).collect();
        order.sort_by(|&a, &b| match (timestamps[a], timestamps[b]) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        for column in self.columns.values_mut() {
            *column = column.reordered(&order);
        }
        self.time_index = Some(name.to_string());
        Ok(())
    }

    /// Rows whose indexed timestamp falls in `[start, end]`. Requires a
    /// prior [`Table::set_time_index`].
    pub fn slice_time(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Table> {
        let index = self.time_index.as_deref().ok_or_else(|| {
            SolariumError::State("no time index set; call set_time_index first".to_string())
        })?;
        let timestamps = self.datetime_cells(index)?;

        // Sorted with missing at the end, so both bounds binary-search.
        let lo = timestamps.partition_point(|t| matches!(t, Some(x) if *x < start));
        let hi = timestamps.partition_point(|t| matches!(t, Some(x) if *x <= end));

        let columns = self
            .columns
            .iter()
            .map(|(name, col)| (name.clone(), col.take_range(lo..hi)))
            .collect();
        Ok(Table {
            columns,
            time_index: self.time_index.clone(),
        })
    }

    fn datetime_cells(&self, name: &str) -> Result<&[Option<NaiveDateTime>]> {
        let column = self
            .column(name)
            .ok_or_else(|| SolariumError::unknown_column(name))?;
        column.as_datetime().ok_or_else(|| {
            SolariumError::InvalidParameter(format!(
                "column '{}' is not a date-time column ({})",
                name,
                column.kind().label()
            ))
        })
    }

    /// Vertically concatenate labeled tables sharing one column layout and
    /// append a categorical column recording each row's origin label.
    pub fn concat(parts: Vec<(String, Table)>, label_column: &str) -> Result<Table> {
        let mut parts = parts.into_iter();
        let (first_label, first) = parts
            .next()
            .ok_or_else(|| SolariumError::InvalidParameter("no tables to concatenate".into()))?;

        if first.contains_column(label_column) {
            return Err(SolariumError::InvalidParameter(format!(
                "label column '{label_column}' already exists in '{first_label}'"
            )));
        }
        let layout: Vec<(String, ColumnKind)> = first
            .columns
            .iter()
            .map(|(name, col)| (name.clone(), col.kind()))
            .collect();

        let first_rows = first.row_count();
        let mut columns = first.columns;
        let mut labels: Vec<Option<String>> = vec![Some(first_label); first_rows];

        for (label, table) in parts {
            let this_layout: Vec<(String, ColumnKind)> = table
                .columns
                .iter()
                .map(|(name, col)| (name.clone(), col.kind()))
                .collect();
            if this_layout != layout {
                return Err(SolariumError::InvalidParameter(format!(
                    "table '{label}' does not match the column layout of the first table"
                )));
            }
            let rows = table.row_count();
            for (name, col) in &table.columns {
                if let Some(existing) = columns.get_mut(name) {
                    existing.extend_from(col)?;
                }
            }
            labels.extend(std::iter::repeat_n(Some(label), rows));
        }

        let mut combined = Table {
            columns,
            time_index: None,
        };
        combined.insert_column(label_column, Column::Categorical(labels))?;
        Ok(combined)
    }
}
