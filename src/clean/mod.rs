//! Outlier detection and the multi-pass cleaning pipeline.
//!
//! Bounds come in two flavors (Tukey fence, sigma bands); cleaning applies
//! them per field. `aggressive_clean` chains up to three passes but each later
//! pass only runs while enough data remains, so small datasets are cleaned
//! conservatively and large ones aggressively.

use crate::domain::{Listing, ListingField, OutlierMethod};
use crate::stats::{mean, quartile, std_dev};

/// Sigma multiplier used by the cleaning pipeline's sigma method.
const SIGMA_N: f64 = 3.0;

/// Minimum records required before any single-field filter engages.
///
/// Below this there is not enough signal to call anything an outlier, so the
/// input passes through unchanged.
const MIN_FILTER_SIZE: usize = 4;

/// Minimum records required before the multi-pass pipeline engages.
const MIN_CLEAN_SIZE: usize = 10;

/// Tukey fence: `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`. `(0, 0)` for empty input.
pub fn outlier_bounds(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let q1 = quartile(values, 1);
    let q3 = quartile(values, 3);
    let iqr = q3 - q1;
    (q1 - 1.5 * iqr, q3 + 1.5 * iqr)
}

/// Sigma bands: `[mean - n*sigma, mean + n*sigma]`. `(0, 0)` for empty input.
pub fn sigma_bounds(values: &[f64], n: f64) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let avg = mean(values);
    let sigma = std_dev(values);
    (avg - n * sigma, avg + n * sigma)
}

fn bounds_for(values: &[f64], method: OutlierMethod) -> (f64, f64) {
    match method {
        OutlierMethod::Sigma => sigma_bounds(values, SIGMA_N),
        OutlierMethod::Iqr => outlier_bounds(values),
    }
}

/// Retain listings whose `field` value falls within the method's bounds.
///
/// Fewer than 4 listings pass through unfiltered.
pub fn filter_by_field(
    listings: &[Listing],
    field: ListingField,
    method: OutlierMethod,
) -> Vec<Listing> {
    if listings.len() < MIN_FILTER_SIZE {
        return listings.to_vec();
    }

    let values: Vec<f64> = listings.iter().map(|l| field.value(l)).collect();
    let (lower, upper) = bounds_for(&values, method);

    listings
        .iter()
        .filter(|l| {
            let v = field.value(l);
            v >= lower && v <= upper
        })
        .cloned()
        .collect()
}

/// Multi-pass outlier cleaning.
///
/// Passes, in order, each gated on the previous pass leaving more than 10
/// records (cumulative filtering, not a reset to the original dataset):
///
/// 1. price
/// 2. area
/// 3. price-per-square-meter ratio (bounds computed over listings with a
///    positive area)
///
/// Datasets under 10 records are returned untouched.
pub fn aggressive_clean(listings: &[Listing], method: OutlierMethod) -> Vec<Listing> {
    if listings.len() < MIN_CLEAN_SIZE {
        return listings.to_vec();
    }

    let mut filtered = filter_by_field(listings, ListingField::Price, method);
    if filtered.len() > MIN_CLEAN_SIZE {
        filtered = filter_by_field(&filtered, ListingField::Sqm, method);
    }

    if filtered.len() > MIN_CLEAN_SIZE {
        let ratios: Vec<f64> = filtered
            .iter()
            .filter(|l| l.square_meter > 0)
            .map(|l| l.price_per_sqm())
            .collect();
        let (lower, upper) = bounds_for(&ratios, method);

        filtered.retain(|l| {
            // Zero-area listings divide to infinity and fall outside any
            // finite bound, dropping them here as well.
            let v = l.price as f64 / l.square_meter as f64;
            v >= lower && v <= upper
        });
    }

    filtered
}

/// Keep listings whose district matches `district` case-insensitively.
pub fn filter_by_district(listings: &[Listing], district: &str) -> Vec<Listing> {
    listings
        .iter()
        .filter(|l| l.district.eq_ignore_ascii_case(district))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn listing(price: i64, sqm: i64) -> Listing {
        Listing {
            price,
            square_meter: sqm,
            rooms: 2.0,
            floor: 3.0,
            floor_total: 6.0,
            district: "Vracar".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    #[test]
    fn tukey_fence_on_known_data() {
        let (lower, upper) = outlier_bounds(&[1.0, 2.0, 3.0, 4.0, 100.0]);
        assert_eq!(lower, -1.0);
        assert_eq!(upper, 7.0);
    }

    #[test]
    fn sigma_bounds_symmetric_around_mean() {
        let (lower, upper) = sigma_bounds(&[1.0, 2.0, 3.0], 2.0);
        let avg = 2.0;
        assert!((avg - lower - (upper - avg)).abs() < 1e-12);
        assert!(lower < avg && upper > avg);
    }

    #[test]
    fn bounds_empty_input() {
        assert_eq!(outlier_bounds(&[]), (0.0, 0.0));
        assert_eq!(sigma_bounds(&[], 3.0), (0.0, 0.0));
    }

    #[test]
    fn filter_passes_small_datasets_through() {
        let listings: Vec<Listing> = vec![
            listing(100_000, 50),
            listing(120_000, 55),
            listing(9_999_999, 60),
        ];
        let out = filter_by_field(&listings, ListingField::Price, OutlierMethod::Iqr);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn filter_removes_extreme_price() {
        let mut listings: Vec<Listing> =
            (0..8).map(|i| listing(100_000 + i * 1_000, 50)).collect();
        listings.push(listing(5_000_000, 50));
        let out = filter_by_field(&listings, ListingField::Price, OutlierMethod::Iqr);
        assert_eq!(out.len(), 8);
        assert!(out.iter().all(|l| l.price < 1_000_000));
    }

    #[test]
    fn aggressive_clean_skips_under_ten_records() {
        let listings: Vec<Listing> = (0..9).map(|i| listing(100_000 + i, 50)).collect();
        let out = aggressive_clean(&listings, OutlierMethod::Iqr);
        assert_eq!(out, listings);
    }

    #[test]
    fn aggressive_clean_removes_extreme_prices_first_pass() {
        let mut listings: Vec<Listing> = (0..47)
            .map(|i| listing(100_000 + (i % 10) * 1_000, 50))
            .collect();
        listings.push(listing(9_000_000, 50));
        listings.push(listing(8_500_000, 52));
        listings.push(listing(9_500_000, 48));

        let out = aggressive_clean(&listings, OutlierMethod::Iqr);
        assert_eq!(out.len(), 47);
        assert!(out.iter().all(|l| l.price < 1_000_000));
    }

    #[test]
    fn aggressive_clean_sigma_method_runs_all_passes() {
        let listings: Vec<Listing> = (0..30)
            .map(|i| listing(90_000 + (i % 12) * 3_000, 40 + (i % 9)))
            .collect();
        let out = aggressive_clean(&listings, OutlierMethod::Sigma);
        // Homogeneous data survives every pass.
        assert_eq!(out.len(), 30);
    }

    #[test]
    fn clean_drops_zero_area_listings() {
        let mut listings: Vec<Listing> = (0..20)
            .map(|i| listing(100_000 + (i % 5) * 2_000, 50 + (i % 4)))
            .collect();
        listings.push(listing(100_000, 0));
        let out = aggressive_clean(&listings, OutlierMethod::Iqr);
        assert!(out.iter().all(|l| l.square_meter > 0));
    }

    #[test]
    fn district_filter_is_case_insensitive() {
        let mut a = listing(100_000, 50);
        a.district = "Vracar".to_string();
        let mut b = listing(110_000, 52);
        b.district = "Zvezdara".to_string();
        let out = filter_by_district(&[a, b], "vracar");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].district, "Vracar");
    }
}
