//! Configuration file handling.
//!
//! Settings come from an optional `autoimports.toml`; command-line flags
//! override whatever the file says.

use crate::cli::Args;
use crate::filter::RecordFilter;
use crate::reports::DEFAULT_RANKING_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "autoimports.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: RecordFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Falls back to the latest year present in the data.
    #[serde(default)]
    pub reference_year: Option<i32>,
    #[serde(default)]
    pub reference_month: Option<u32>,
    #[serde(default = "default_top_limit")]
    pub top_limit: usize,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reference_year: None,
            reference_month: None,
            top_limit: default_top_limit(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_top_limit() -> usize {
    DEFAULT_RANKING_LIMIT
}

fn default_preview_rows() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub write_csv: bool,
    #[serde(default = "default_true")]
    pub write_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            write_csv: true,
            write_json: true,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        if let Some(month) = config.report.reference_month {
            anyhow::ensure!(
                (1..=12).contains(&month),
                "reference_month must be between 1 and 12, got {}",
                month
            );
        }
        if let Some(month) = config.filter.month {
            anyhow::ensure!(
                (1..=12).contains(&month),
                "filter month must be between 1 and 12, got {}",
                month
            );
        }
        Ok(config)
    }

    /// Explicit `--config` path, else `autoimports.toml` if it exists, else
    /// built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            debug!(path = DEFAULT_CONFIG_FILE, "using config file");
            return Self::from_file(default_path);
        }
        Ok(Self::default())
    }

    pub fn merge_with_args(&mut self, args: &Args) {
        if args.year.is_some() {
            self.report.reference_year = args.year;
        }
        if args.month.is_some() {
            self.report.reference_month = args.month;
        }
        if let Some(top) = args.top {
            self.report.top_limit = top;
        }
        if args.filter_year.is_some() {
            self.filter.year = args.filter_year;
        }
        if args.filter_month.is_some() {
            self.filter.month = args.filter_month;
        }
        if args.brand.is_some() {
            self.filter.brand = args.brand.clone();
        }
        if args.model.is_some() {
            self.filter.model = args.model.clone();
        }
        if args.vehicle_type.is_some() {
            self.filter.vehicle_type = args.vehicle_type.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.output.dir = dir.clone();
        }
        if args.no_csv {
            self.output.write_csv = false;
        }
        if args.no_json {
            self.output.write_json = false;
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
