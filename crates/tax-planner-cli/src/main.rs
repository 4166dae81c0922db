mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::compute::ComputeArgs;
use commands::recommend::RecommendArgs;

/// Personal income tax computation and regime comparison
#[derive(Parser)]
#[command(
    name = "taxplan",
    version,
    about = "Personal income tax computation and regime comparison",
    long_about = "A CLI for estimating personal income tax liability with decimal precision. \
                  Computes per-regime tax breakdowns across the old, new, and revised \
                  regimes, recommends the cheapest regime (surfacing ties explicitly), \
                  and lists deduction-headroom savings suggestions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute tax liability under a single regime
    Compute(ComputeArgs),
    /// Compare every regime and recommend the cheapest
    Compare(CompareArgs),
    /// List deduction-headroom savings suggestions
    Recommend(RecommendArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compute(args) => commands::compute::run_compute(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Recommend(args) => commands::recommend::run_recommend(args),
        Commands::Version => {
            println!("taxplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
