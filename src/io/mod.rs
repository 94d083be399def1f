//! Input/output helpers.
//!
//! - CSV listing ingest + validation (`ingest`)
//! - analysis/prediction JSON exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
