//! Market trend estimation from monthly price-per-sqm averages.

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::domain::Listing;
use crate::stats::mean;

/// Minimum listings before a trend is worth reporting.
const MIN_TREND_SIZE: usize = 10;

/// Average month-over-month change of mean price/sqm, in percent.
///
/// Listings are bucketed by calendar month (chronological via the sorted map
/// key); each bucket's mean price-per-sqm is computed over listings with a
/// positive area. Requires at least 10 listings and 2 distinct months,
/// otherwise 0. A month whose average is 0 is skipped in the delta sum, while
/// the denominator stays `months - 1`.
pub fn monthly_trend(listings: &[Listing]) -> f64 {
    if listings.len() < MIN_TREND_SIZE {
        return 0.0;
    }

    let mut monthly: BTreeMap<(i32, u32), Vec<f64>> = BTreeMap::new();
    for l in listings {
        if l.square_meter > 0 {
            monthly
                .entry((l.date.year(), l.date.month()))
                .or_default()
                .push(l.price_per_sqm());
        }
    }

    if monthly.len() < 2 {
        return 0.0;
    }

    let avg_prices: Vec<f64> = monthly.values().map(|v| mean(v)).collect();

    let mut total_change = 0.0;
    for i in 1..avg_prices.len() {
        if avg_prices[i - 1] != 0.0 {
            total_change += (avg_prices[i] - avg_prices[i - 1]) / avg_prices[i - 1];
        }
    }

    total_change / (avg_prices.len() as f64 - 1.0) * 100.0
}
