//! Example: Clean a solar irradiance CSV export with Solarium.
//!
//! Usage:
//!   cargo run --example clean_file -- <file_path>
//!
//! Example:
//!   cargo run --example clean_file -- test_data/benin-malanville.csv

use std::env;
use std::path::Path;

use solarium::Solarium;

fn main() -> solarium::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example clean_file -- <file_path>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example clean_file -- test_data/benin-malanville.csv");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let output = {
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        path.with_file_name(format!("{}_clean.csv", stem))
    };

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Solarium Cleaning: {}", file_path);
    println!("{}", separator);
    println!();

    let solarium = Solarium::new();
    let report = solarium.process(path, &output)?;

    // Print source metadata
    println!("## Source Metadata");
    println!("  File: {}", report.source.file);
    println!("  Format: {}", report.source.format);
    println!("  Rows: {}", report.source.row_count);
    println!("  Columns: {}", report.source.column_count);
    println!("  Hash: {}", report.source.hash);
    println!();

    // Print per-column structure
    println!("## Columns ({})", report.info.columns.len());
    println!();
    for col in &report.info.columns {
        println!(
            "  {:20} {:12} missing={}",
            col.name,
            col.kind.label(),
            col.missing
        );
    }
    println!();

    // Print cleaning summary
    let cleaning = &report.cleaning;
    println!("## Cleaning Report");
    println!("  Missing cells imputed: {}", cleaning.missing_values.total_missing);
    for column in &cleaning.missing_values.high_missing_columns {
        let stats = &cleaning.missing_values.by_column[column];
        println!(
            "    high-missing: {} ({:.1}%)",
            column,
            stats.fraction * 100.0
        );
    }
    println!("  Outlier rows capped: {}", cleaning.total_outliers);
    for (column, stats) in &cleaning.outliers {
        if stats.count > 0 {
            println!(
                "    {}: {} readings ({:.2}%)",
                column, stats.count, stats.percentage
            );
        }
    }
    for warning in &cleaning.warnings {
        println!("    warning: {}", warning.description());
    }
    println!();

    println!("Cleaned data written to {}", report.output_path.display());
    Ok(())
}
