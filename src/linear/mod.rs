//! Polynomial-in-area OLS regression.
//!
//! Responsibilities:
//!
//! - solve the normal equations by Gaussian elimination (`solve`)
//! - train the 5-weight price model with its diagnostics bundle (`train`)
//! - estimate the monthly market trend (`trend`)

pub mod solve;
pub mod train;
pub mod trend;

pub use solve::*;
pub use train::*;
pub use trend::*;
