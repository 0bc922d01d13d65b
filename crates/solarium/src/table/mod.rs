//! Typed in-memory table: ordered named columns with null sentinels.

mod column;
mod stats;
mod table;

pub use column::{Column, ColumnKind};
pub use stats::NumericSummary;
pub use table::Table;
