//! Observed/modeled series alignment.
//!
//! Responsibilities:
//!
//! - cumulative active counts and onset truncation
//! - modeled values over the model horizon
//! - forecast date synthesis past the last observation

pub mod aligner;

pub use aligner::*;
