//! Input/output helpers.
//!
//! - daily record ingest + validation (`ingest`)
//! - country registry loading (`registry`)
//! - bundle/figure exports (`export`)

pub mod export;
pub mod ingest;
pub mod registry;

pub use export::*;
pub use ingest::*;
pub use registry::*;
