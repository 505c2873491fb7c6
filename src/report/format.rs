//! Terminal formatting for per-country runs, batches, and the model registry.

use chrono::NaiveDate;

use crate::app::pipeline::{BatchOutcome, CountryRun};
use crate::domain::{AlignedSeries, CountryConfig};
use crate::project::ordinal;

/// Multi-line summary of one aligned country.
pub fn format_country_summary(run: &CountryRun, reference: Option<NaiveDate>) -> String {
    let series = &run.series;
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", series.country()));
    out.push_str(&format!(
        "Model: {} {}\n",
        series.model().kind_name(),
        series.model().text_label()
    ));
    out.push_str(&format!(
        "Source: {} | rows read={} used={} skipped={}\n",
        run.ingest.source.display(),
        run.ingest.rows_read,
        run.ingest.records.len(),
        run.ingest.row_errors.len(),
    ));
    out.push_str(&format!(
        "Onset: {} case on {} (day 1)\n",
        ordinal(series.onset_threshold()),
        series.date_index()[0],
    ));
    out.push_str(&format!(
        "Observed: {} days through {} | cumulative active={:.0}\n",
        series.observed().len(),
        series.last_observed_date(),
        series.observed().last().copied().unwrap_or(0.0),
    ));
    out.push_str(&format!(
        "Horizon: {} days through {} ({} forecast days)\n",
        series.len(),
        series.date_index()[series.len() - 1],
        series.forecast_dates().len(),
    ));
    out.push_str(&format_peak_line(series));

    if let Some(date) = reference {
        match series.position_of(date) {
            Some(pos) => out.push_str(&format!("Reference date: {date} (day {})\n", series.day_index()[pos])),
            None => out.push_str(&format!("Reference date: {date} (outside the aligned range)\n")),
        }
    }

    out
}

fn format_peak_line(series: &AlignedSeries) -> String {
    match (series.model().peak_day(), series.peak_position()) {
        (Some(peak_day), Some(pos)) => format!(
            "Peak: day {} ({}) | analytic peak day {:.1} | modeled active={:.0}\n",
            series.day_index()[pos],
            series.date_index()[pos],
            peak_day,
            series.modeled()[pos],
        ),
        _ => "Peak: none (monotone model)\n".to_string(),
    }
}

/// Summary line per country for a batch run, failures last.
pub fn format_batch_summary(outcome: &BatchOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Countries: aligned={} failed={} without data={}\n",
        outcome.runs.len(),
        outcome.failures.len(),
        outcome.missing.len(),
    ));

    for run in &outcome.runs {
        let series = &run.series;
        let peak = series
            .peak_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<12} onset={} observed={:>3}d horizon={:>3}d peak={}\n",
            series.country(),
            series.date_index()[0],
            series.observed().len(),
            series.len(),
            peak,
        ));
    }
    for (name, err) in &outcome.failures {
        out.push_str(&format!("  {name:<12} FAILED: {err}\n"));
    }
    if !outcome.missing.is_empty() {
        out.push_str(&format!("  no data file: {}\n", outcome.missing.join(", ")));
    }

    out
}

/// Table of registry entries with their derived model scalars.
pub fn format_registry(registry: &[CountryConfig]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:>9} {:<10} {:>9} {:>8}  {}\n",
        "country", "threshold", "law", "peak day", "horizon", "formula"
    ));
    for entry in registry {
        let peak = entry
            .model
            .peak_day()
            .map(|p| format!("{p:.1}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<12} {:>9} {:<10} {:>9} {:>8}  {}\n",
            entry.name,
            entry.onset_threshold,
            entry.model.kind_name(),
            peak,
            entry.model.horizon(),
            entry.model.text_label(),
        ));
    }
    out
}
