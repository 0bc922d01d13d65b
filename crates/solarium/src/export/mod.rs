//! Writing cleaned tables and reports back to disk.

mod writer;

pub use writer::{
    DEFAULT_TEMP_COLUMNS, ExportOptions, Exporter, export, export_table, write_report_json,
};
