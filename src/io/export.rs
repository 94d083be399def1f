//! JSON export of an analysis run.
//!
//! The exported document is the "portable" representation of a run:
//! dataset scope (district/date range/count), per-field stats bundles, the
//! correlation matrix, model diagnostics, and any predictions made. The
//! schema is defined by `AnalysisDocument`; consumers parse it instead of
//! scraping terminal output.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Algorithm, FieldStats, LinearModel, PriceInterval};
use crate::error::AppError;

/// Field labels in matrix/stats order.
pub const FIELD_LABELS: [&str; 5] = ["price", "sqm", "rooms", "floor", "floor_total"];

/// One per-field stats entry, keyed by the field's export name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStatsEntry {
    pub field: String,
    #[serde(flatten)]
    pub stats: FieldStats,
}

/// One prediction made during the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionEntry {
    pub algorithm: Algorithm,
    pub sqm: f64,
    pub rooms: f64,
    pub floor: f64,
    #[serde(flatten)]
    pub interval: PriceInterval,
}

/// A full analysis run as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDocument {
    pub tool: String,
    pub district: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    /// Listings remaining after filtering and cleaning.
    pub count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub stats: Vec<FieldStatsEntry>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub correlation: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<LinearModel>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub predictions: Vec<PredictionEntry>,
}

/// Write an analysis document as pretty-printed JSON.
pub fn write_analysis_json(path: &Path, doc: &AnalysisDocument) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::runtime(format!("Failed to create export '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, doc)
        .map_err(|e| AppError::runtime(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

/// Read a previously exported analysis document.
pub fn read_analysis_json(path: &Path) -> Result<AnalysisDocument, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::config(format!("Failed to open export '{}': {e}", path.display()))
    })?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::config(format!("Invalid export JSON: {e}")))
}
