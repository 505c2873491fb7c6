//! Turning projection bundles into figures.
//!
//! A renderer consumes a finished [`ProjectionBundle`] and nothing else. It never
//! sees the aligned series, so a render failure cannot affect alignment or
//! projection results.

pub mod ascii;
pub mod svg;

pub use ascii::{AsciiRenderer, render_ascii_plot};
pub use svg::{SvgRenderer, render_svg};

use crate::error::RenderError;
use crate::project::ProjectionBundle;

/// Boundary between the projection core and a concrete drawing backend.
pub trait RenderAdapter {
    type Output;

    fn render(&self, bundle: &ProjectionBundle) -> Result<Self::Output, RenderError>;
}
