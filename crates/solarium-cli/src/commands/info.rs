//! Info command - source metadata and table structure.

use std::path::PathBuf;

use colored::Colorize;
use solarium::input::table_info;
use solarium::{Loader, LoaderConfig};

pub fn run(
    file: PathBuf,
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
    let info = table_info(&table);

    if json_output {
        let value = serde_json::json!({ "source": source, "info": info });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} {}", "Source".cyan().bold(), source.file.white());
    println!("  Format:  {}", source.format);
    println!("  Size:    {} bytes", source.size_bytes);
    println!("  Rows:    {}", info.row_count.to_string().white().bold());
    println!("  Columns: {}", info.column_count);
    if let Some(range) = &info.date_range {
        println!(
            "  Range:   {} to {}",
            range.start.format("%Y-%m-%d %H:%M:%S"),
            range.end.format("%Y-%m-%d %H:%M:%S")
        );
    }
    if source.timestamp_parse_failures > 0 {
        println!(
            "  {} {} timestamps failed to parse",
            "warning:".yellow().bold(),
            source.timestamp_parse_failures
        );
    }
    if verbose {
        println!("  Hash:    {}", source.hash);
    }

    println!();
    println!("{}", "Columns:".yellow().bold());
    for column in &info.columns {
        println!(
            "  {:20} {:12} {} missing",
            column.name,
            column.kind.label(),
            column.missing
        );
    }
    Ok(())
}
