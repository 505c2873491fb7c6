//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input records (`RawRecord`) and per-country configuration (`CountryConfig`)
//! - the aligned observed/modeled series (`AlignedSeries`)
//! - display selectors (`DisplayMode`, `ScaleKind`)

pub mod types;

pub use types::*;
