//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the immutable listing record (`Listing`)
//! - input configuration enums (`ListingField`, `OutlierMethod`, `Algorithm`)
//! - analysis outputs (`FieldStats`, `LinearModel`, `PriceInterval`, etc.)

pub mod types;

pub use types::*;
