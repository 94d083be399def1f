//! K-nearest-neighbor price prediction.
//!
//! Instance-based and training-free: every query measures Euclidean distance
//! from the target `(sqm, rooms, floor)` to each listing and averages the k
//! nearest prices. No distance weighting; ties keep their original order via
//! the stable sort.

use crate::domain::Listing;

/// Euclidean distance between two equal-length vectors.
///
/// Mismatched lengths or empty inputs yield 0.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Mean price of the k listings nearest to `(sqm, rooms, floor)`.
///
/// `k` is clamped to the dataset size; an empty dataset or `k == 0` yields 0.
pub fn predict_knn(listings: &[Listing], sqm: f64, rooms: f64, floor: f64, k: usize) -> f64 {
    if listings.is_empty() || k == 0 {
        return 0.0;
    }

    let target = [sqm, rooms, floor];
    let mut neighbors: Vec<(f64, f64)> = listings
        .iter()
        .map(|l| {
            let features = [l.square_meter as f64, l.rooms, l.floor];
            (euclidean_distance(&target, &features), l.price as f64)
        })
        .collect();

    // Stable: equal distances keep listing order.
    neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let k = k.min(neighbors.len());
    neighbors.iter().take(k).map(|(_, price)| price).sum::<f64>() / k as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn listing(price: i64, sqm: i64, rooms: f64, floor: f64) -> Listing {
        Listing {
            price,
            square_meter: sqm,
            rooms,
            floor,
            floor_total: 10.0,
            district: "Palilula".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn distance_basics() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance(&[], &[]), 0.0);
        assert_eq!(euclidean_distance(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn empty_dataset_or_zero_k_yields_zero() {
        assert_eq!(predict_knn(&[], 50.0, 2.0, 3.0, 5), 0.0);
        let data = vec![listing(100_000, 50, 2.0, 3.0)];
        assert_eq!(predict_knn(&data, 50.0, 2.0, 3.0, 0), 0.0);
    }

    #[test]
    fn nearest_listing_dominates_k1() {
        let data = vec![
            listing(100_000, 50, 2.0, 3.0),
            listing(500_000, 120, 4.0, 8.0),
        ];
        assert_eq!(predict_knn(&data, 51.0, 2.0, 3.0, 1), 100_000.0);
    }

    #[test]
    fn oversized_k_clamps_to_dataset_size() {
        let data = vec![
            listing(100_000, 50, 2.0, 3.0),
            listing(200_000, 80, 3.0, 5.0),
            listing(300_000, 110, 4.0, 7.0),
        ];
        let clamped = predict_knn(&data, 60.0, 2.0, 3.0, 99);
        let exact = predict_knn(&data, 60.0, 2.0, 3.0, 3);
        assert_eq!(clamped, exact);
        assert_eq!(clamped, 200_000.0);
    }

    #[test]
    fn averages_the_k_nearest_prices() {
        let data = vec![
            listing(100_000, 50, 2.0, 3.0),
            listing(110_000, 52, 2.0, 3.0),
            listing(900_000, 200, 6.0, 1.0),
        ];
        let prediction = predict_knn(&data, 51.0, 2.0, 3.0, 2);
        assert_eq!(prediction, 105_000.0);
    }
}
