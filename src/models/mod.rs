//! Analytic growth-curve models.
//!
//! Models are small immutable values so that alignment/projection code can
//! evaluate them without any captured state.

pub mod model;

pub use model::*;
