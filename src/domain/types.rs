//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during analysis and model training
//! - exported to JSON
//! - reloaded later by downstream tooling

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single real-estate listing observation.
///
/// Listings arrive fully materialized from the persistence layer: deduplicated,
/// date-ranged, and with districts already normalized upstream. The engine
/// treats them as immutable; every filter produces a new vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Asking price in whole currency units.
    pub price: i64,
    /// Living area in whole square meters.
    pub square_meter: i64,
    /// Room count; half-integer values (e.g. `2.5`) are common.
    pub rooms: f64,
    /// Floor of the unit.
    pub floor: f64,
    /// Total floors of the building.
    pub floor_total: f64,
    /// Normalized municipality/district name.
    pub district: String,
    /// Date the listing was observed.
    pub date: NaiveDate,
}

impl Listing {
    /// Price per square meter, or 0 when the area is missing/zero.
    pub fn price_per_sqm(&self) -> f64 {
        if self.square_meter > 0 {
            self.price as f64 / self.square_meter as f64
        } else {
            0.0
        }
    }
}

/// Numeric listing fields the engine can extract, filter, and describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ListingField {
    Price,
    Sqm,
    Rooms,
    Floor,
    FloorTotal,
}

impl ListingField {
    /// The five fields in the fixed order used by stats bundles and the
    /// correlation matrix: price, sqm, rooms, floor, floor_total.
    pub const ALL: [ListingField; 5] = [
        ListingField::Price,
        ListingField::Sqm,
        ListingField::Rooms,
        ListingField::Floor,
        ListingField::FloorTotal,
    ];

    /// Extract the field's numeric value from a listing.
    pub fn value(self, listing: &Listing) -> f64 {
        match self {
            ListingField::Price => listing.price as f64,
            ListingField::Sqm => listing.square_meter as f64,
            ListingField::Rooms => listing.rooms,
            ListingField::Floor => listing.floor,
            ListingField::FloorTotal => listing.floor_total,
        }
    }

    /// Name used in JSON exports and the per-field stats map.
    pub fn key(self) -> &'static str {
        match self {
            ListingField::Price => "price",
            ListingField::Sqm => "sqm",
            ListingField::Rooms => "rooms",
            ListingField::Floor => "floor",
            ListingField::FloorTotal => "floor_total",
        }
    }

    /// Whether histogram edges for this field should be displayed as whole
    /// numbers (room/floor counts rather than continuous quantities).
    pub fn integer_like(self) -> bool {
        matches!(
            self,
            ListingField::Rooms | ListingField::Floor | ListingField::FloorTotal
        )
    }
}

/// How outlier bounds are computed when cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Tukey fence: `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
    Iqr,
    /// Mean +/- 3 standard deviations.
    Sigma,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr
    }
}

/// Which predictive model family answers a prediction query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Polynomial-in-area OLS regression with diagnostics.
    Polynomial,
    /// K-nearest-neighbor average over (sqm, rooms, floor).
    Knn,
    /// Single variance-minimizing regression tree.
    Tree,
    /// Gradient-boosted ensemble of shallow trees.
    Boost,
}

impl Algorithm {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::Polynomial => "Polynomial Regression",
            Algorithm::Knn => "KNN",
            Algorithm::Tree => "Decision Tree",
            Algorithm::Boost => "Gradient Boosting",
        }
    }
}

/// Fit-quality status of a trained linear model.
///
/// Communicated as data, never as an error: callers branch on the status (or
/// forward it verbatim) instead of catching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Success,
    PotentialOverfit,
    PoorFit,
    InsufficientData,
}

impl ModelStatus {
    /// Numeric code kept stable for downstream consumers.
    pub fn code(self) -> u8 {
        match self {
            ModelStatus::Success => 1,
            ModelStatus::PotentialOverfit => 2,
            ModelStatus::PoorFit => 3,
            ModelStatus::InsufficientData => 4,
        }
    }

    /// Default condition label for this status.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelStatus::Success => "Success",
            ModelStatus::PotentialOverfit => "Potential Overfit",
            ModelStatus::PoorFit => "Unreliable/Poor Fit",
            ModelStatus::InsufficientData => "Insufficient Data",
        }
    }
}

/// One bin of a histogram, with display-rounded edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub from: f64,
    pub to: f64,
    pub count: usize,
}

/// Descriptive-statistics bundle for one numeric field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub avg: f64,
    pub median: f64,
    pub mode: Vec<f64>,
    pub q1: f64,
    pub q3: f64,
    pub is_normal: bool,
    pub distribution: Vec<HistogramBin>,
}

/// Trained polynomial price model plus its diagnostics bundle.
///
/// Ephemeral by design: rebuilt fresh per query, never cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// OLS weights for the fixed feature expansion
    /// `(1, sqm, sqm^2, rooms, floor)`; length 5 for any successful fit.
    pub weights: Vec<f64>,
    pub r_squared: f64,
    pub adjusted_r2: f64,
    pub mae: f64,
    pub rmse: f64,
    pub cv_score: f64,
    /// Average month-over-month change of mean price/sqm, in percent.
    pub trend: f64,
    pub status: ModelStatus,
    /// Human-readable fit condition; usually `status.display_name()`, but a
    /// degenerate solve reports "Meaningless/Error" under the poor-fit code.
    pub condition: String,
    /// Number of listings the model was actually built from.
    pub count: usize,
}

/// A point prediction with its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceInterval {
    pub price: f64,
    pub min: f64,
    pub max: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// CSV file with listings; when absent, a synthetic sample is generated.
    pub input_path: Option<PathBuf>,
    pub sample_count: usize,
    pub sample_seed: u64,

    pub district: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,

    /// Skip the multi-pass outlier cleaning entirely.
    pub no_clean: bool,
    pub outlier_method: OutlierMethod,

    /// Display precision (decimal places) for reports and exports.
    pub precision: i32,

    pub knn_k: usize,
    pub tree_max_depth: usize,
    pub boost_trees: usize,
    pub boost_learning_rate: f64,

    pub export: Option<PathBuf>,
}
