//! File loading and source description.

mod loader;
mod source;

pub use loader::{Loader, LoaderConfig, is_missing_marker, load_table};
pub use source::{ColumnInfo, DateRange, SourceMetadata, TableInfo, table_info};
