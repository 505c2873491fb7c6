//! Daily case-record ingest.
//!
//! This module is responsible for turning a per-country data file into a list of
//! `RawRecord`s ready for alignment.
//!
//! Supported layouts (looked up inside a data directory):
//! - `data-<Country>.csv` with columns `date,positive,recovered,dead`
//! - `data-<Country>.json`, an array of `{date, positive, recovered, dead}`
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **No reordering**: records keep file order; the aligner rejects unsorted input

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::RawRecord;
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 4] = ["date", "positive", "recovered", "dead"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed records + row errors.
#[derive(Debug, Clone)]
pub struct IngestedRecords {
    pub source: PathBuf,
    pub records: Vec<RawRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Path of the data file for `country`, preferring CSV over JSON.
pub fn locate_data_file(data_dir: &Path, country: &str) -> Option<PathBuf> {
    ["csv", "json"]
        .iter()
        .map(|ext| data_dir.join(format!("data-{country}.{ext}")))
        .find(|p| p.is_file())
}

/// Load the records for `country` from `data_dir`.
pub fn load_country_records(data_dir: &Path, country: &str) -> Result<IngestedRecords, AppError> {
    let path = locate_data_file(data_dir, country).ok_or_else(|| {
        AppError::new(
            2,
            format!(
                "No data file for '{country}' in '{}' (expected data-{country}.csv or data-{country}.json).",
                data_dir.display()
            ),
        )
    })?;
    load_records(&path)
}

/// Load records from a CSV or JSON file, chosen by extension.
pub fn load_records(path: &Path) -> Result<IngestedRecords, AppError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_records_json(path),
        _ => load_records_csv(path),
    }
}

pub fn load_records_json(path: &Path) -> Result<IngestedRecords, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open records JSON '{}': {e}", path.display())))?;
    let parsed: Vec<RawRecord> = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid records JSON '{}': {e}", path.display())))?;

    let rows_read = parsed.len();
    let mut records = Vec::with_capacity(rows_read);
    let mut row_errors = Vec::new();
    for (idx, record) in parsed.into_iter().enumerate() {
        match validate_counts(&record) {
            Ok(()) => records.push(record),
            Err(message) => row_errors.push(RowError { line: idx + 1, message }),
        }
    }

    Ok(IngestedRecords {
        source: path.to_path_buf(),
        records,
        row_errors,
        rows_read,
    })
}

pub fn load_records_csv(path: &Path) -> Result<IngestedRecords, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open records CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for column in REQUIRED_COLUMNS {
        if !header_map.contains_key(column) {
            return Err(AppError::new(
                2,
                format!("Missing required column `{column}` in '{}'", path.display()),
            ));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map).and_then(|r| validate_counts(&r).map(|()| r)) {
            Ok(r) => records.push(r),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(IngestedRecords {
        source: path.to_path_buf(),
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes carry a UTF-8 BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RawRecord, String> {
    Ok(RawRecord {
        date: parse_date(get_required(record, header_map, "date")?)?,
        positive: parse_count(record, header_map, "positive")?,
        recovered: parse_count(record, header_map, "recovered")?,
        dead: parse_count(record, header_map, "dead")?,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    column: &str,
) -> Result<&'a str, String> {
    header_map
        .get(column)
        .and_then(|&idx| record.get(idx))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing `{column}` value."))
}

fn parse_count(record: &StringRecord, header_map: &HashMap<String, usize>, column: &str) -> Result<i64, String> {
    let raw = get_required(record, header_map, column)?;
    raw.parse::<i64>()
        .map_err(|_| format!("Invalid `{column}` value '{raw}' (expected an integer)."))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("Invalid date '{raw}' (expected YYYY-MM-DD)."))
}

fn validate_counts(record: &RawRecord) -> Result<(), String> {
    for (name, value) in [
        ("positive", record.positive),
        ("recovered", record.recovered),
        ("dead", record.dead),
    ] {
        if value < 0 {
            return Err(format!("Negative `{name}` count {value} on {}.", record.date));
        }
    }
    Ok(())
}
