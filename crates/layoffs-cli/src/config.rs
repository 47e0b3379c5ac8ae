//! Command-line flags, the optional TOML config file, and how they combine.
//!
//! Precedence: CLI flag > environment variable > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use layoffs_core::Dashboard;
use serde::Deserialize;

use crate::source::DatasetSource;

/// Where the processed dataset lives when nothing else says otherwise.
pub const DEFAULT_DATASET: &str = "data/layoffs_processed.json";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug, Default)]
#[command(name = "layoffs", about = "Terminal dashboard for company layoff events")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Dataset JSON: a file path or an http(s) URL.
  #[arg(short, long, env = "LAYOFFS_DATASET")]
  pub dataset: Option<String>,

  /// Initial country filter (`all` or a country present in the data).
  #[arg(long)]
  pub country: Option<String>,

  /// Initial funding stage filter.
  #[arg(long)]
  pub stage: Option<String>,

  /// Initial year filter.
  #[arg(long)]
  pub year: Option<String>,

  /// Initial size bucket: `0-100`, `100-500`, `500-1000` or `1000+`.
  #[arg(long)]
  pub size: Option<String>,

  /// Append log output to this file (the terminal UI owns stdout).
  #[arg(long, value_name = "FILE")]
  pub log_file: Option<PathBuf>,

  /// Print every derived view as JSON and exit instead of opening the UI.
  #[arg(long)]
  pub json: bool,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
  #[serde(default)]
  pub dataset:  String,
  #[serde(default)]
  pub log_file: String,
  #[serde(default)]
  pub filters:  InitialFilters,
}

impl ConfigFile {
  pub fn parse(raw: &str) -> Result<Self> { toml::from_str(raw).context("parsing config file") }
}

/// Filters applied once the dataset is loaded, before the first frame.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct InitialFilters {
  pub country:           Option<String>,
  pub stage:             Option<String>,
  pub year:              Option<String>,
  pub size:              Option<String>,
  /// Top industries to start switched off.
  #[serde(default)]
  pub hidden_industries: Vec<String>,
}

impl InitialFilters {
  /// Push every configured value through the dashboard's validating setters.
  pub fn apply(&self, dashboard: &mut Dashboard) -> Result<()> {
    for industry in &self.hidden_industries {
      dashboard
        .set_industry_active(industry, false)
        .with_context(|| format!("hiding industry {industry:?}"))?;
    }
    if let Some(country) = &self.country {
      dashboard.set_country_filter(country).context("applying country filter")?;
    }
    if let Some(stage) = &self.stage {
      dashboard.set_stage_filter(stage).context("applying stage filter")?;
    }
    if let Some(year) = &self.year {
      dashboard.set_year_filter(year).context("applying year filter")?;
    }
    if let Some(size) = &self.size {
      dashboard.set_size_filter(size).context("applying size filter")?;
    }
    Ok(())
  }
}

// ─── Resolved settings ────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Settings {
  pub source:   DatasetSource,
  pub log_file: Option<PathBuf>,
  pub filters:  InitialFilters,
  pub json:     bool,
}

impl Settings {
  /// Read the config file named by `args` (if any) and merge.
  pub fn load(args: Args) -> Result<Self> {
    let file = if let Some(path) = &args.config {
      let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
      ConfigFile::parse(&raw)?
    } else {
      ConfigFile::default()
    };
    Ok(Self::merge(args, file))
  }

  pub fn merge(args: Args, file: ConfigFile) -> Self {
    let dataset = args
      .dataset
      .or_else(|| non_empty(file.dataset))
      .unwrap_or_else(|| DEFAULT_DATASET.to_string());
    let log_file = args
      .log_file
      .or_else(|| non_empty(file.log_file).map(PathBuf::from));

    let defaults = file.filters;
    let filters = InitialFilters {
      country:           args.country.or(defaults.country),
      stage:             args.stage.or(defaults.stage),
      year:              args.year.or(defaults.year),
      size:              args.size.or(defaults.size),
      hidden_industries: defaults.hidden_industries,
    };

    Self {
      source: DatasetSource::parse(&dataset),
      log_file,
      filters,
      json: args.json,
    }
  }
}

fn non_empty(s: String) -> Option<String> { (!s.trim().is_empty()).then_some(s) }
