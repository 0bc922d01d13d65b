//! Solarium CLI - cleaning pipeline for solar irradiance data.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            file,
            output,
            method,
            z_threshold,
            missing_threshold,
            columns,
            outlier_columns,
            timestamp_column,
            keep_temp,
            report,
        } => commands::clean::run(
            file,
            output,
            method,
            z_threshold,
            missing_threshold,
            columns,
            outlier_columns,
            timestamp_column,
            keep_temp,
            report,
            cli.verbose,
        ),

        Commands::Check {
            file,
            z_threshold,
            missing_threshold,
            columns,
            timestamp_column,
            json,
        } => commands::check::run(
            file,
            z_threshold,
            missing_threshold,
            columns,
            timestamp_column,
            json,
            cli.verbose,
        ),

        Commands::Info {
            file,
            timestamp_column,
            json,
        } => commands::info::run(file, timestamp_column, json, cli.verbose),

        Commands::Merge {
            files,
            output,
            label_column,
            labels,
        } => commands::merge::run(files, output, label_column, labels, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
