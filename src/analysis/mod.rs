//! Aggregated analysis outputs: per-field stats bundles and the correlation
//! matrix.
//!
//! These are the shapes handed to the report and export layers; the engine
//! itself defines no wire format.

use rayon::prelude::*;

use crate::domain::{FieldStats, Listing, ListingField};
use crate::stats::{
    correlation, histogram, is_normal_distribution, mean, median, modes, quartile, round_to,
};

/// Histogram bin count used by every stats bundle.
const STATS_BINS: usize = 10;

/// Extract one field's values across listings, in listing order.
pub fn field_values(listings: &[Listing], field: ListingField) -> Vec<f64> {
    listings.iter().map(|l| field.value(l)).collect()
}

/// Feature rows `(sqm, rooms, floor)` for the instance-based and tree models.
pub fn feature_rows(listings: &[Listing]) -> Vec<Vec<f64>> {
    listings
        .iter()
        .map(|l| vec![l.square_meter as f64, l.rooms, l.floor])
        .collect()
}

/// Target prices for the tree and boosting trainers.
pub fn target_prices(listings: &[Listing]) -> Vec<f64> {
    listings.iter().map(|l| l.price as f64).collect()
}

/// Descriptive bundle over one field's data; `None` when the data is empty.
///
/// `rounded` selects whole-number histogram edges (room/floor counts);
/// `precision` applies display rounding to the scalar summaries.
pub fn field_stats(data: &[f64], rounded: bool, precision: i32) -> Option<FieldStats> {
    if data.is_empty() {
        return None;
    }
    Some(FieldStats {
        avg: round_to(mean(data), precision),
        median: round_to(median(data), precision),
        mode: modes(data),
        q1: round_to(quartile(data, 1), precision),
        q3: round_to(quartile(data, 3), precision),
        is_normal: is_normal_distribution(data),
        distribution: histogram(data, STATS_BINS, rounded),
    })
}

/// Stats bundles for all five numeric fields, in fixed field order.
///
/// Integer-like fields (rooms/floor/floor_total) use rounded histogram
/// display and a display precision of 1, the rest use `precision`. `None`
/// when there are no listings.
pub fn all_field_stats(
    listings: &[Listing],
    precision: i32,
) -> Option<Vec<(ListingField, FieldStats)>> {
    if listings.is_empty() {
        return None;
    }

    let mut out = Vec::with_capacity(ListingField::ALL.len());
    for field in ListingField::ALL {
        let data = field_values(listings, field);
        let rounded = field.integer_like();
        let eff_precision = if rounded { 1 } else { precision };
        if let Some(stats) = field_stats(&data, rounded, eff_precision) {
            out.push((field, stats));
        }
    }
    Some(out)
}

/// Fixed-order 5x5 Pearson correlation matrix over
/// `[price, sqm, rooms, floor, floor_total]`; `None` when there are no
/// listings. Rows are independent and computed in parallel.
pub fn correlation_matrix(listings: &[Listing]) -> Option<Vec<Vec<f64>>> {
    if listings.is_empty() {
        return None;
    }

    let columns: Vec<Vec<f64>> = ListingField::ALL
        .iter()
        .map(|&f| field_values(listings, f))
        .collect();

    let matrix = columns
        .par_iter()
        .map(|row_i| columns.iter().map(|col_j| correlation(row_i, col_j)).collect())
        .collect();

    Some(matrix)
}
