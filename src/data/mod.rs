//! Dataset sources.
//!
//! Real listings arrive via `io::ingest`; `sample` generates deterministic
//! synthetic listings for demos and tests.

pub mod sample;

pub use sample::*;
