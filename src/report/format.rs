//! Terminal formatting for analysis runs.
//!
//! Everything here is a pure string builder; printing is the caller's job.

use crate::domain::{Algorithm, FieldStats, LinearModel, ListingField, PriceInterval};
use crate::io::export::FIELD_LABELS;
use crate::stats::round_to;

/// Format the dataset scope line block.
pub fn format_dataset_summary(
    district: Option<&str>,
    rows_total: usize,
    rows_clean: usize,
    cleaned: bool,
) -> String {
    let mut out = String::new();
    out.push_str("=== estml - Real Estate Analytics ===\n");
    out.push_str(&format!(
        "District: {}\n",
        district.unwrap_or("(all districts)")
    ));
    out.push_str(&format!("Listings: {rows_total}\n"));
    if cleaned {
        out.push_str(&format!(
            "After outlier cleaning: {rows_clean} ({} removed)\n",
            rows_total - rows_clean
        ));
    }
    out
}

/// Format one field's stats bundle as an indented block.
pub fn format_field_stats(field: ListingField, stats: &FieldStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("[{}]\n", field.key()));
    out.push_str(&format!("  avg:    {}\n", stats.avg));
    out.push_str(&format!("  median: {}\n", stats.median));
    out.push_str(&format!(
        "  mode:   {}\n",
        stats
            .mode
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    out.push_str(&format!("  q1/q3:  {} / {}\n", stats.q1, stats.q3));
    out.push_str(&format!("  normal: {}\n", stats.is_normal));
    for bin in &stats.distribution {
        out.push_str(&format!(
            "    {:>12} .. {:>12}  {}\n",
            bin.from,
            bin.to,
            "#".repeat(bin.count.min(60))
        ));
    }
    out
}

/// Format the 5x5 correlation matrix as a labeled grid.
pub fn format_correlation(matrix: &[Vec<f64>], precision: i32) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>12}", ""));
    for label in FIELD_LABELS {
        out.push_str(&format!("{label:>12}"));
    }
    out.push('\n');

    for (label, row) in FIELD_LABELS.iter().zip(matrix.iter()) {
        out.push_str(&format!("{label:>12}"));
        for v in row {
            out.push_str(&format!("{:>12}", round_to(*v, precision)));
        }
        out.push('\n');
    }
    out
}

/// Format the linear model diagnostics block.
pub fn format_model_diagnostics(model: &LinearModel, precision: i32) -> String {
    let mut out = String::new();
    out.push_str("--- Polynomial model ---\n");
    out.push_str(&format!(
        "Status: {} ({})\n",
        model.condition,
        model.status.code()
    ));
    out.push_str(&format!("Samples: {}\n", model.count));
    out.push_str(&format!("R²: {}\n", round_to(model.r_squared, 4)));
    out.push_str(&format!("Adjusted R²: {}\n", round_to(model.adjusted_r2, 4)));
    out.push_str(&format!("CV score: {}\n", round_to(model.cv_score, 4)));
    out.push_str(&format!("MAE: {}\n", round_to(model.mae, precision)));
    out.push_str(&format!("RMSE: {}\n", round_to(model.rmse, precision)));
    out.push_str(&format!("Monthly trend: {}%\n", round_to(model.trend, 2)));
    out
}

/// Format one prediction line with its interval.
pub fn format_prediction(
    algorithm: Algorithm,
    interval: &PriceInterval,
    precision: i32,
) -> String {
    format!(
        "{}: {} (range {} .. {})\n",
        algorithm.display_name(),
        round_to(interval.price, precision),
        round_to(interval.min, precision),
        round_to(interval.max, precision)
    )
}
