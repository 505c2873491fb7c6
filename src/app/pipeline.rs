//! Shared "alignment pipeline" logic used by the `show` and `batch` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> align -> project (per display mode)
//!
//! Countries are independent, so batches align them in parallel. A failing
//! country is logged and reported; it never aborts the batch.

use std::path::Path;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::align::align_series;
use crate::domain::{AlignedSeries, CountryConfig, DisplayMode};
use crate::error::AppError;
use crate::io::ingest::{IngestedRecords, load_country_records, locate_data_file};
use crate::project::{ProjectionBundle, project};

/// All computed outputs for one country.
#[derive(Debug, Clone)]
pub struct CountryRun {
    pub config: CountryConfig,
    pub ingest: IngestedRecords,
    pub series: AlignedSeries,
    pub bundles: Vec<(DisplayMode, ProjectionBundle)>,
}

/// Result of a multi-country run.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub runs: Vec<CountryRun>,
    pub failures: Vec<(String, AppError)>,
    /// Registry countries with no data file.
    pub missing: Vec<String>,
}

/// Ingest, align and project a single country.
pub fn run_country(
    config: &CountryConfig,
    data_dir: &Path,
    modes: &[DisplayMode],
    reference: Option<NaiveDate>,
) -> Result<CountryRun, AppError> {
    let ingest = load_country_records(data_dir, &config.name)?;
    for row in &ingest.row_errors {
        warn!(
            country = %config.name,
            line = row.line,
            "skipping record: {}",
            row.message
        );
    }

    let series = align_series(config, &ingest.records)?;
    debug!(
        country = %config.name,
        observed = series.observed().len(),
        horizon = series.len(),
        "aligned series"
    );

    let bundles = modes
        .iter()
        .map(|&mode| (mode, project(&series, mode, reference)))
        .collect();

    Ok(CountryRun {
        config: config.clone(),
        ingest,
        series,
        bundles,
    })
}

/// Run every registry country that has a data file, in parallel.
pub fn run_batch(
    registry: &[CountryConfig],
    data_dir: &Path,
    modes: &[DisplayMode],
    reference: Option<NaiveDate>,
) -> BatchOutcome {
    let (present, missing): (Vec<&CountryConfig>, Vec<&CountryConfig>) = registry
        .iter()
        .partition(|c| locate_data_file(data_dir, &c.name).is_some());

    for config in &missing {
        debug!(country = %config.name, "no data file, skipping");
    }

    let results: Vec<(String, Result<CountryRun, AppError>)> = present
        .par_iter()
        .map(|config| (config.name.clone(), run_country(config, data_dir, modes, reference)))
        .collect();

    let mut outcome = BatchOutcome {
        missing: missing.iter().map(|c| c.name.clone()).collect(),
        ..BatchOutcome::default()
    };
    for (name, result) in results {
        match result {
            Ok(run) => outcome.runs.push(run),
            Err(err) => {
                warn!(country = %name, error = %err, "country skipped");
                outcome.failures.push((name, err));
            }
        }
    }

    info!(
        aligned = outcome.runs.len(),
        failed = outcome.failures.len(),
        missing = outcome.missing.len(),
        "batch finished"
    );
    outcome
}
