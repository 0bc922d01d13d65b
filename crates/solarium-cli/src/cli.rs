//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use solarium::ImputeMethod;
use std::path::PathBuf;

/// Solarium: cleaning pipeline for solar irradiance time series
#[derive(Parser)]
#[command(name = "solarium")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a sensor export and write the result
    Clean {
        /// Path to the raw CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for cleaned data (default: <file>_clean.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Imputation method for missing numeric values (median, mean, mode)
        #[arg(long, default_value = "median")]
        method: ImputeMethod,

        /// Z-score threshold for outlier detection and capping
        #[arg(long, default_value = "3.0")]
        z_threshold: f64,

        /// Missing-fraction threshold for high-missing warnings
        #[arg(long, default_value = "0.05")]
        missing_threshold: f64,

        /// Columns to impute (default: all numeric columns)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Columns to scan for outliers (default: the imputed set)
        #[arg(long, value_delimiter = ',')]
        outlier_columns: Option<Vec<String>>,

        /// Name of the timestamp column
        #[arg(long, default_value = "Timestamp")]
        timestamp_column: String,

        /// Keep working columns (Outlier_Flag etc.) in the output
        #[arg(long)]
        keep_temp: bool,

        /// Also write the cleaning report as JSON
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Detect missing values and outliers without writing anything
    Check {
        /// Path to the raw CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Z-score threshold for outlier detection
        #[arg(long, default_value = "3.0")]
        z_threshold: f64,

        /// Missing-fraction threshold for high-missing warnings
        #[arg(long, default_value = "0.05")]
        missing_threshold: f64,

        /// Columns to scan (default: all numeric columns)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Name of the timestamp column
        #[arg(long, default_value = "Timestamp")]
        timestamp_column: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show source metadata and table structure
    Info {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Name of the timestamp column
        #[arg(long, default_value = "Timestamp")]
        timestamp_column: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Concatenate cleaned exports into one file with an origin label
    Merge {
        /// Paths to the cleaned CSV files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Output path for the merged file
        #[arg(short, long)]
        output: PathBuf,

        /// Name of the origin label column
        #[arg(long, default_value = "Country")]
        label_column: String,

        /// Labels for the inputs, in order (default: file stems)
        #[arg(long, value_delimiter = ',')]
        labels: Option<Vec<String>>,
    },
}
