//! Reporting utilities: formatted terminal output.
//!
//! We keep formatting code in one place so the alignment/projection code stays
//! free of presentation concerns.

pub mod format;

pub use format::*;
