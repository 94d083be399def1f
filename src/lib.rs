//! `estate-ml` library crate.
//!
//! The binary (`estml`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future API service, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod clean;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod knn;
pub mod linear;
pub mod report;
pub mod stats;
pub mod tree;
