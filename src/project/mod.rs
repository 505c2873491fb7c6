//! Curve projection: coordinates, scales, markers and labels per display mode.

pub mod projector;

pub use projector::*;
