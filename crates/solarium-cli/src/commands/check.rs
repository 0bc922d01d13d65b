//! Check command - detection only, nothing written to disk.

use std::path::PathBuf;

use colored::Colorize;
use solarium::clean::{detect_missing_values, detect_outliers};
use solarium::{Loader, LoaderConfig};

pub fn run(
    file: PathBuf,
    z_threshold: f64,
    missing_threshold: f64,
    columns: Option<Vec<String>>,
    timestamp_column: String,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let loader =
        Loader::with_config(LoaderConfig::default().with_timestamp_column(timestamp_column));
    let (table, source) = loader.load(&file)?;
    let targets = match columns {
        Some(columns) => columns,
        None => table.numeric_column_names(),
    };
    let missing = detect_missing_values(&table, missing_threshold)?;
    let scan = detect_outliers(&table, &targets, z_threshold)?;

    if json_output {
        let value = serde_json::json!({
            "file": source.file,
            "rows": source.row_count,
            "missing_values": missing,
            "outliers": scan.by_column,
            "outlier_rows": scan.flagged_rows,
            "zero_variance_columns": scan.zero_variance_columns,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Checking".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "Missing cells: {}",
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
        "Outlier rows (|z| > {}): {}",
        z_threshold,
        scan.flagged_rows.to_string().white().bold()
    );
    for (column, stats) in &scan.by_column {
        if stats.count > 0 || verbose {
            println!(
                "  {}: {} readings ({:.2}%)",
                column, stats.count, stats.percentage
            );
        }
    }
    for column in &scan.zero_variance_columns {
        println!(
            "  {} {} has zero variance",
            "warning:".yellow().bold(),
            column
        );
    }

    if missing.total_missing == 0 && scan.flagged_rows == 0 && scan.zero_variance_columns.is_empty()
    {
        println!("{}", "No issues found - data looks clean!".green());
    }
    Ok(())
}
