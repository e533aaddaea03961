mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::optimize::OptimizeArgs;
use commands::sample::SampleArgs;

/// Collateral allocation against margin calls
#[derive(Parser)]
#[command(
    name = "copt",
    version,
    about = "Collateral allocation against margin calls",
    long_about = "Allocates a registry of pledgeable assets against a cash shortfall \
                  by linear programming: coverage of the margin call at minimum \
                  haircut loss, subject to per-asset concentration bands and a \
                  minimum-diversity rule."
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
    /// Optimize a collateral registry against a margin call
    Optimize(OptimizeArgs),
    /// Generate a sample registry (and optionally optimize it)
    Sample(SampleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Chart,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Optimize(args) => commands::optimize::run_optimize(args),
        Commands::Sample(args) => commands::sample::run_sample(args),
        Commands::Version => {
            println!("copt {}", env!("CARGO_PKG_VERSION"));
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
