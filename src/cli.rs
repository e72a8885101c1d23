//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Automotive import analytics: KPIs, rankings, market share, growth and
/// insights from a CSV of import records.
///
/// Examples:
///   auto_imports_report --input imports.csv
///   auto_imports_report --input imports.csv --year 2024 --month 10 --top 5
///   auto_imports_report --input imports.csv --brand Toyota --no-json
///   auto_imports_report --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file with fecha/marca/modelo/tipo_vehiculo/unidades columns
    /// (English headers date/brand/model/type/units also work)
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Configuration file (defaults to autoimports.toml when present)
    #[arg(short, long, value_name = "FILE", env = "AUTOIMPORTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reference year for monthly/yearly comparisons
    #[arg(long)]
    pub year: Option<i32>,

    /// Reference month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Number of entries in the brand and model rankings
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Only keep records from this year
    #[arg(long)]
    pub filter_year: Option<i32>,

    /// Only keep records from this month
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub filter_month: Option<u32>,

    /// Only keep records of this brand
    #[arg(long)]
    pub brand: Option<String>,

    /// Only keep records of this model
    #[arg(long)]
    pub model: Option<String>,

    /// Only keep records of this vehicle type
    #[arg(long)]
    pub vehicle_type: Option<String>,

    /// Directory for the report files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip writing CSV reports
    #[arg(long)]
    pub no_csv: bool,

    /// Skip writing JSON reports
    #[arg(long)]
    pub no_json: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
