//! Tree-based predictors.
//!
//! - a variance-minimizing binary regression tree (`regression`)
//! - a gradient-boosting ensemble of shallow trees built on it (`boosting`)
//!
//! Trees are stored as an explicit node arena indexed by integer id rather
//! than boxed recursive nodes: construction runs on a work stack whose depth
//! is bounded by the caller-supplied maximum tree depth, and ownership stays
//! parent-owns-children with no back-references.

pub mod boosting;
pub mod regression;

pub use boosting::*;
pub use regression::*;
