//! `covid-curves` library crate.
//!
//! The binary (`covid`) is a thin wrapper around this library so that:
//!
//! - the alignment/projection core is testable without spawning processes
//! - the projection bundle can be consumed by other renderers (dashboards, notebooks)
//! - code stays easy to navigate as the project grows
//!
//! Data flow: raw daily records -> [`align`] (with a [`models::GrowthModel`])
//! -> [`domain::AlignedSeries`] -> [`project`] per display mode
//! -> [`project::ProjectionBundle`] -> [`render`].

pub mod align;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod models;
pub mod project;
pub mod render;
pub mod report;
