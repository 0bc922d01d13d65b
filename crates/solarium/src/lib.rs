//! Solarium: cleaning pipeline for solar irradiance sensor time series.
//!
//! Solarium loads raw logger CSV exports into typed columns, repairs missing
//! readings, flags and caps statistical outliers, and writes the cleaned
//! series back out together with a report of everything it changed.
//!
//! # Core Principles
//!
//! - **Non-destructive**: cleaning returns a new table; input files and
//!   in-memory tables are never modified
//! - **Typed columns**: every column is numeric, categorical, timestamp, or
//!   boolean, and missing cells are tracked explicitly rather than smuggled
//!   through as NaN
//! - **Honest reporting**: every imputed cell and capped reading is counted
//!   in the cleaning report, including data-quality warnings
//!
//! # Example
//!
//! ```no_run
//! use solarium::Solarium;
//!
//! let solarium = Solarium::new();
//! let report = solarium.process("plant_a.csv", "plant_a_clean.csv").unwrap();
//!
//! println!("Rows: {}", report.info.row_count);
//! println!("Outlier rows capped: {}", report.cleaning.total_outliers);
//! ```

pub mod clean;
pub mod error;
pub mod export;
pub mod input;
pub mod table;

mod solarium;

pub use crate::solarium::{PipelineReport, Solarium, SolariumConfig};
pub use clean::{CleanOptions, Cleaner, CleaningReport, DataQualityWarning, ImputeMethod};
pub use error::{Result, SolariumError};
pub use export::{ExportOptions, Exporter};
pub use input::{Loader, LoaderConfig, SourceMetadata, TableInfo};
pub use table::{Column, ColumnKind, Table};
