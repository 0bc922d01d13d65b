//! Clean command - run the full pipeline on one file.

use std::path::{Path, PathBuf};

use colored::Colorize;
use solarium::export::write_report_json;
use solarium::{
    CleanOptions, ExportOptions, ImputeMethod, LoaderConfig, Solarium, SolariumConfig,
};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    method: ImputeMethod,
    z_threshold: f64,
    missing_threshold: f64,
    columns: Option<Vec<String>>,
    outlier_columns: Option<Vec<String>>,
    timestamp_column: String,
    keep_temp: bool,
    report_path: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        file.display().to_string().white()
    );

    let mut clean = CleanOptions::new()
        .with_impute_method(method)
        .with_z_threshold(z_threshold)
        .with_missing_threshold(missing_threshold);
    if let Some(columns) = columns {
        clean = clean.with_numeric_columns(columns);
    }
    if let Some(columns) = outlier_columns {
        clean = clean.with_outlier_columns(columns);
    }

    let config = SolariumConfig {
        loader: LoaderConfig::default().with_timestamp_column(timestamp_column),
        clean,
        export: ExportOptions::default().with_remove_temp(!keep_temp),
    };

    let output_path = output.unwrap_or_else(|| default_output(&file));
    let report = Solarium::with_config(config).process(&file, &output_path)?;

    let missing = &report.cleaning.missing_values;
    println!(
        "Loaded {} rows, {} columns ({} numeric)",
        report.info.row_count.to_string().white().bold(),
        report.info.column_count,
        report.info.numeric_columns.len()
    );
    println!(
        "Imputed {} missing cells",
        missing.total_missing.to_string().white().bold()
    );
    for column in &missing.high_missing_columns {
        println!(
            "  {} {} is {:.1}% missing",
            "high:".yellow().bold(),
            column,
            missing.by_column[column].fraction * 100.0
        );
    }
    println!(
        "Capped {} outlier rows",
        report.cleaning.total_outliers.to_string().white().bold()
    );
    if verbose {
        for (column, stats) in &report.cleaning.outliers {
            if stats.count > 0 {
                println!(
                    "  {}: {} readings ({:.2}%)",
                    column, stats.count, stats.percentage
                );
            }
        }
    }
    for warning in &report.cleaning.warnings {
        println!("  {} {}", "warning:".yellow().bold(), warning.description());
    }

    if let Some(path) = report_path {
        write_report_json(&report.cleaning, &path)?;
        println!(
            "{} {}",
            "Report written to".green().bold(),
            path.display().to_string().white()
        );
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        report.output_path.display().to_string().white()
    );
    Ok(())
}

fn default_output(file: &Path) -> PathBuf {
    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let mut out = file.to_path_buf();
    out.set_file_name(format!("{}_clean.csv", stem));
    out
}
