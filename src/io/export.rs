//! Export projection bundles and rendered figures.
//!
//! Bundles are written as pretty JSON with the contract field names, so any
//! external renderer can pick them up without this crate.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::DisplayMode;
use crate::error::AppError;
use crate::project::ProjectionBundle;

/// `<dir>/<country>-<mode>.<ext>`, with spaces in the country name replaced.
pub fn figure_path(dir: &Path, country: &str, mode: DisplayMode, ext: &str) -> PathBuf {
    let stem = country.replace(char::is_whitespace, "_");
    dir.join(format!("{stem}-{}.{ext}", mode.slug()))
}

/// Write a projection bundle as JSON.
pub fn write_bundle_json(path: &Path, bundle: &ProjectionBundle) -> Result<(), AppError> {
    ensure_parent(path)?;
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create bundle JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, bundle)
        .map_err(|e| AppError::new(2, format!("Failed to write bundle JSON: {e}")))?;
    Ok(())
}

/// Read a previously exported bundle.
pub fn read_bundle_json(path: &Path) -> Result<ProjectionBundle, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open bundle JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid bundle JSON: {e}")))
}

/// Write an already-rendered figure (e.g. SVG text).
pub fn write_figure(path: &Path, contents: &str) -> Result<(), AppError> {
    ensure_parent(path)?;
    let mut file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create figure '{}': {e}", path.display())))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write figure '{}': {e}", path.display())))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create directory '{}': {e}", parent.display())))?;
    }
    Ok(())
}
