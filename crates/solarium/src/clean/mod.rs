//! Missing-value imputation, z-score outlier handling, and cleaning reports.

mod cleaner;
mod missing;
mod outliers;
mod report;

pub use cleaner::{
    CleanOptions, Cleaner, DEFAULT_MISSING_THRESHOLD, DEFAULT_Z_THRESHOLD, clean,
};
pub use missing::{
    ColumnMissing, ImputeMethod, MissingSummary, detect_missing_values, impute_missing_values,
};
pub use outliers::{
    OUTLIER_FLAG_COLUMN, OutlierScan, OutlierStats, cap_outliers, detect_outliers,
};
pub use report::{CleaningReport, DataQualityWarning};
