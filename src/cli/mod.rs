//! Command-line parsing for the COVID-19 growth-curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the alignment/projection code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::DisplayMode;

/// Date of the published predictions; default anchor for the reference marker.
pub const DEFAULT_REFERENCE_DATE: &str = "2020-03-29";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "covid", version, about = "COVID-19 active-case growth curves: alignment and projection")]
pub struct Cli {
    /// Directory holding `data-<Country>.csv` / `data-<Country>.json` files.
    #[arg(long, global = true, env = "COVID_DATA_DIR", default_value = "data")]
    pub data: PathBuf,

    /// Country registry JSON (built-in registry when omitted).
    #[arg(long, global = true, env = "COVID_REGISTRY")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Align and project a single country, print its summary and optionally plot/export.
    Show(ShowArgs),
    /// Align and project every registry country that has a data file.
    ///
    /// Countries that fail to align are reported and skipped.
    Batch(BatchArgs),
    /// List registry countries with their model parameters.
    Models,
}

/// Options shared by `show` and `batch`.
#[derive(Debug, Args, Clone)]
pub struct ProjectionArgs {
    /// Display mode(s) to project (repeatable). Defaults to `linear`.
    #[arg(short = 'm', long = "mode", value_enum)]
    pub modes: Vec<DisplayMode>,

    /// Project every display mode.
    #[arg(long, conflicts_with = "modes")]
    pub all_modes: bool,

    /// Anchor date (YYYY-MM-DD) for the reference-date marker.
    #[arg(long, value_parser = parse_iso_date, default_value = DEFAULT_REFERENCE_DATE)]
    pub reference_date: NaiveDate,

    /// Do not draw a reference-date marker.
    #[arg(long)]
    pub no_reference_date: bool,

    /// Write projection bundles as JSON into this directory.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Write SVG charts into this directory.
    #[arg(long)]
    pub svg_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Country name as listed in the registry (case-insensitive).
    pub country: String,

    #[command(flatten)]
    pub projection: ProjectionArgs,

    /// Render an ASCII plot per mode in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub projection: ProjectionArgs,
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
