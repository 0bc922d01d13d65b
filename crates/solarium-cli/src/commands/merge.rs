//! Merge command - concatenate cleaned exports with an origin label.

use std::path::PathBuf;

use colored::Colorize;
use solarium::Table;
use solarium::export::export_table;
use solarium::input::Loader;

pub fn run(
    files: Vec<PathBuf>,
    output: PathBuf,
    label_column: String,
    labels: Option<Vec<String>>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels = match labels {
        Some(labels) => {
            if labels.len() != files.len() {
                return Err(format!(
                    "expected {} labels (one per input file), got {}",
                    files.len(),
                    labels.len()
                )
                .into());
            }
            labels
        }
        None => files
            .iter()
            .map(|f| f.file_stem().unwrap_or_default().to_string_lossy().into_owned())
            .collect(),
    };

    let mut parts = Vec::with_capacity(files.len());
    for (file, label) in files.iter().zip(labels) {
        if !file.exists() {
            return Err(format!("File not found: {}", file.display()).into());
        }
        let (table, source) = Loader::new().load(file)?;
        if verbose {
            println!(
                "  {} {} ({} rows)",
                "loaded".cyan(),
                file.display(),
                source.row_count
            );
        }
        parts.push((label, table));
    }

    let merged = Table::concat(parts, &label_column)?;
    let written = export_table(&merged, &output)?;

    println!(
        "{} {} rows from {} files",
        "Merged".cyan().bold(),
        merged.row_count().to_string().white().bold(),
        files.len()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        written.display().to_string().white()
    );
    Ok(())
}
