//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by ingest and consumed by the aligner
//! - exported to JSON next to the projection bundles
//! - reloaded later for comparisons

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::models::GrowthModel;

/// One day of raw case counts for a country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub positive: i64,
    pub recovered: i64,
    pub dead: i64,
}

impl RawRecord {
    /// `positive - recovered - dead`, or `None` if it does not fit in `i64`.
    pub fn active(&self) -> Option<i64> {
        self.positive.checked_sub(self.recovered)?.checked_sub(self.dead)
    }
}

/// Static per-country configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryConfig {
    pub name: String,
    pub model: GrowthModel,
    /// Cumulative active-case count that marks day 1 of the aligned timeline.
    pub onset_threshold: i64,
}

impl CountryConfig {
    pub fn new(name: impl Into<String>, model: GrowthModel, onset_threshold: i64) -> Self {
        Self {
            name: name.into(),
            model,
            onset_threshold,
        }
    }
}

/// Observed and modeled series sharing one day/date axis.
///
/// Built by [`crate::align::align_series`]; the fields are private so the
/// length invariants established there cannot be broken afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedSeries {
    pub(crate) country: String,
    pub(crate) model: GrowthModel,
    pub(crate) onset_threshold: i64,
    pub(crate) day_index: Vec<u32>,
    pub(crate) date_index: Vec<NaiveDate>,
    pub(crate) observed: Vec<f64>,
    pub(crate) modeled: Vec<f64>,
}

impl AlignedSeries {
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn model(&self) -> &GrowthModel {
        &self.model
    }

    pub fn onset_threshold(&self) -> i64 {
        self.onset_threshold
    }

    /// `1..=n`, one entry per aligned day.
    pub fn day_index(&self) -> &[u32] {
        &self.day_index
    }

    /// Observed dates followed by the synthesized forecast dates.
    pub fn date_index(&self) -> &[NaiveDate] {
        &self.date_index
    }

    /// Cumulative active cases from the onset day onward.
    pub fn observed(&self) -> &[f64] {
        &self.observed
    }

    pub fn modeled(&self) -> &[f64] {
        &self.modeled
    }

    pub fn len(&self) -> usize {
        self.day_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.day_index.is_empty()
    }

    pub fn last_observed_date(&self) -> NaiveDate {
        // `observed` is never empty after alignment.
        self.date_index[self.observed.len() - 1]
    }

    /// Dates past the last observation.
    pub fn forecast_dates(&self) -> &[NaiveDate] {
        &self.date_index[self.observed.len()..]
    }

    /// Position of `date` on the aligned axis, if present.
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        // Dates are consecutive and strictly ascending.
        self.date_index.binary_search(&date).ok()
    }

    /// Position of the modeled maximum, for models that have a peak.
    pub fn peak_position(&self) -> Option<usize> {
        self.model.peak_day()?;
        let mut best: Option<(usize, f64)> = None;
        for (i, &v) in self.modeled.iter().enumerate() {
            if best.is_none_or(|(_, b)| v > b) {
                best = Some((i, v));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn peak_date(&self) -> Option<NaiveDate> {
        self.peak_position().map(|i| self.date_index[i])
    }
}

/// Step one calendar day forward.
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date + Duration::days(1)
}

/// How the projected curve is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Calendar dates on x, linear y.
    Linear,
    /// Day index on x, log y.
    #[value(name = "semilog")]
    SemiLog,
    /// Day index on x, both axes log.
    #[value(name = "loglog")]
    LogLog,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Linear, DisplayMode::SemiLog, DisplayMode::LogLog];

    pub fn x_scale(self) -> ScaleKind {
        match self {
            DisplayMode::Linear | DisplayMode::SemiLog => ScaleKind::Linear,
            DisplayMode::LogLog => ScaleKind::Log,
        }
    }

    pub fn y_scale(self) -> ScaleKind {
        match self {
            DisplayMode::Linear => ScaleKind::Linear,
            DisplayMode::SemiLog | DisplayMode::LogLog => ScaleKind::Log,
        }
    }

    /// Whether x is plotted as calendar dates rather than day offsets.
    pub fn uses_dates(self) -> bool {
        matches!(self, DisplayMode::Linear)
    }

    pub fn slug(self) -> &'static str {
        match self {
            DisplayMode::Linear => "linear",
            DisplayMode::SemiLog => "semilog",
            DisplayMode::LogLog => "loglog",
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus environment and defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    /// Registry JSON; the built-in registry is used when absent.
    pub registry_path: Option<PathBuf>,
    pub modes: Vec<DisplayMode>,
    /// Anchor for the reference-date marker.
    pub reference_date: Option<NaiveDate>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_dir: Option<PathBuf>,
    pub svg_dir: Option<PathBuf>,
}

/// Axis scale in a projection bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    Linear,
    Log,
}
