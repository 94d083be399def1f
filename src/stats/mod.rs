//! Descriptive-statistics primitives.
//!
//! Everything in here is a pure function over `&[f64]`:
//!
//! - central tendency and spread (mean/median/mode/variance)
//! - the percentile family and the IQR
//! - histograms and an empirical-rule normality heuristic
//! - Pearson correlation and z-scores
//!
//! Degenerate inputs (empty slices, zero variance) return neutral values
//! rather than NaN or errors; see the per-function docs.

pub mod describe;

pub use describe::*;
