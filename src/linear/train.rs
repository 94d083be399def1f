//! Training and diagnostics for the polynomial price model.
//!
//! The feature expansion is fixed: `(1, sqm, sqm², rooms, floor)`, a
//! 5-parameter polynomial-in-area model. Everything the caller needs to judge
//! the fit travels in the `LinearModel` diagnostics bundle; fit-quality
//! problems are data (status + condition), never errors.

use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;

use crate::domain::{Listing, LinearModel, ModelStatus, PriceInterval};
use crate::linear::solve::solve_normal_equations;
use crate::linear::trend::monthly_trend;

/// Number of predictors beyond the intercept (sqm, sqm², rooms, floor).
const NUM_PREDICTORS: usize = 4;

/// Cross-validation fold count.
const CV_FOLDS: usize = 5;

/// Fill the fixed design row for a query point.
pub fn design_row(sqm: f64, rooms: f64, floor: f64) -> [f64; 5] {
    [1.0, sqm, sqm * sqm, rooms, floor]
}

/// Build the design matrix and target vector from listings.
pub fn design_matrix(listings: &[Listing]) -> (DMatrix<f64>, DVector<f64>) {
    let n = listings.len();
    let mut x = DMatrix::<f64>::zeros(n, NUM_PREDICTORS + 1);
    let mut y = DVector::<f64>::zeros(n);
    for (i, l) in listings.iter().enumerate() {
        let row = design_row(l.square_meter as f64, l.rooms, l.floor);
        for (j, v) in row.iter().enumerate() {
            x[(i, j)] = *v;
        }
        y[i] = l.price as f64;
    }
    (x, y)
}

/// Coefficient of determination `1 - SSres/SStot`.
///
/// A constant target (SStot = 0) scores 1; mismatched or empty inputs score 0.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return 0.0;
    }
    let avg = actual.iter().sum::<f64>() / actual.len() as f64;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for i in 0..actual.len() {
        ss_res += (actual[i] - predicted[i]) * (actual[i] - predicted[i]);
        ss_tot += (actual[i] - avg) * (actual[i] - avg);
    }
    if ss_tot == 0.0 {
        return 1.0;
    }
    1.0 - ss_res / ss_tot
}

/// Adjusted R² for `p` predictors; 0 when degrees of freedom run out
/// (`n <= p + 1`).
pub fn adjusted_r_squared(r2: f64, n: usize, p: usize) -> f64 {
    if n <= p + 1 {
        return 0.0;
    }
    1.0 - (1.0 - r2) * (n as f64 - 1.0) / (n as f64 - p as f64 - 1.0)
}

/// Mean absolute residual; 0 for mismatched or empty inputs.
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Root-mean-square residual; 0 for mismatched or empty inputs.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p) * (a - p))
        .sum();
    (sum / actual.len() as f64).sqrt()
}

/// K-fold cross-validation score (mean held-out R²).
///
/// Folds are contiguous row ranges; the last fold absorbs any remainder. Each
/// fold's complement is refit from scratch (parallel across folds) and scored
/// on the held-out rows. A fold whose refit fails contributes nothing, but the
/// divisor stays `k`. Returns 0 when `n < k` or `k <= 1`.
pub fn cross_validate(x: &DMatrix<f64>, y: &DVector<f64>, k: usize) -> f64 {
    let n = x.nrows();
    if n < k || k <= 1 {
        return 0.0;
    }

    let fold_size = n / k;
    let scores: Vec<f64> = (0..k)
        .into_par_iter()
        .map(|i| {
            let start = i * fold_size;
            let end = if i == k - 1 { n } else { start + fold_size };

            let train_rows: Vec<usize> = (0..n).filter(|j| *j < start || *j >= end).collect();
            let test_rows: Vec<usize> = (start..end).collect();

            let train_x = x.select_rows(train_rows.iter());
            let train_y = y.select_rows(train_rows.iter());
            let Some(weights) = solve_normal_equations(&train_x, &train_y) else {
                return 0.0;
            };

            let actual: Vec<f64> = test_rows.iter().map(|&j| y[j]).collect();
            let predicted: Vec<f64> = test_rows
                .iter()
                .map(|&j| {
                    weights
                        .iter()
                        .enumerate()
                        .map(|(c, w)| x[(j, c)] * w)
                        .sum()
                })
                .collect();
            r_squared(&actual, &predicted)
        })
        .collect();

    scores.iter().sum::<f64>() / k as f64
}

/// Train the polynomial model over the listings and assemble its diagnostics.
///
/// Status classification applies rules in a fixed order, later rules
/// overriding earlier ones:
///
/// 1. fewer than 4 listings short-circuits to Insufficient Data (no fit)
/// 2. default after fitting: Unreliable/Poor Fit
/// 3. R² > 0.6 and count >= 20: Success
/// 4. R² > 0.9 and count < 15: Potential Overfit
/// 5. count < 10: Insufficient Data (final override)
pub fn train_model(listings: &[Listing]) -> LinearModel {
    let count = listings.len();
    if count < 4 {
        return empty_model(ModelStatus::InsufficientData, None, count);
    }

    let (x, y) = design_matrix(listings);
    let Some(weights) = solve_normal_equations(&x, &y) else {
        return empty_model(ModelStatus::PoorFit, Some("Meaningless/Error"), count);
    };

    let cv_score = cross_validate(&x, &y, CV_FOLDS);

    let actual: Vec<f64> = y.iter().copied().collect();
    let predicted: Vec<f64> = (0..count)
        .map(|i| {
            weights
                .iter()
                .enumerate()
                .map(|(j, w)| x[(i, j)] * w)
                .sum()
        })
        .collect();

    let r2 = r_squared(&actual, &predicted);
    let adjusted_r2 = adjusted_r_squared(r2, count, NUM_PREDICTORS);
    let mae = mean_absolute_error(&actual, &predicted);
    let model_rmse = rmse(&actual, &predicted);
    let trend = monthly_trend(listings);

    let mut status = ModelStatus::PoorFit;
    if r2 > 0.6 && count >= 20 {
        status = ModelStatus::Success;
    }
    if r2 > 0.9 && count < 15 {
        status = ModelStatus::PotentialOverfit;
    }
    if count < 10 {
        status = ModelStatus::InsufficientData;
    }

    LinearModel {
        weights,
        r_squared: r2,
        adjusted_r2,
        mae,
        rmse: model_rmse,
        cv_score,
        trend,
        status,
        condition: status.display_name().to_string(),
        count,
    }
}

fn empty_model(status: ModelStatus, condition: Option<&str>, count: usize) -> LinearModel {
    LinearModel {
        weights: Vec::new(),
        r_squared: 0.0,
        adjusted_r2: 0.0,
        mae: 0.0,
        rmse: 0.0,
        cv_score: 0.0,
        trend: 0.0,
        status,
        condition: condition.unwrap_or(status.display_name()).to_string(),
        count,
    }
}

impl LinearModel {
    /// Point prediction; 0 when the model carries no usable weights.
    pub fn predict(&self, sqm: f64, rooms: f64, floor: f64) -> f64 {
        if self.weights.len() < 5 {
            return 0.0;
        }
        design_row(sqm, rooms, floor)
            .iter()
            .zip(self.weights.iter())
            .map(|(f, w)| f * w)
            .sum()
    }

    /// Point prediction with an uncertainty band.
    ///
    /// A non-positive point prediction collapses to all zeros (a negative
    /// price is meaningless). The half-width is the model MAE, inflated by 1.5
    /// when the fit is flagged overfit or poor; the lower bound never drops
    /// below 0.
    pub fn predict_with_interval(&self, sqm: f64, rooms: f64, floor: f64) -> PriceInterval {
        let price = self.predict(sqm, rooms, floor);
        if price <= 0.0 {
            return PriceInterval {
                price: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let mut spread = self.mae;
        if matches!(
            self.status,
            ModelStatus::PotentialOverfit | ModelStatus::PoorFit
        ) {
            spread *= 1.5;
        }

        PriceInterval {
            price,
            min: (price - spread).max(0.0),
            max: price + spread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn listing(price: i64, sqm: i64, rooms: f64, floor: f64, month: u32) -> Listing {
        Listing {
            price,
            square_meter: sqm,
            rooms,
            floor,
            floor_total: 8.0,
            district: "Vracar".to_string(),
            date: NaiveDate::from_ymd_opt(2024, month, 15).unwrap(),
        }
    }

    /// Listings priced by an exact plane over (sqm, rooms, floor).
    fn planar_listings(n: usize) -> Vec<Listing> {
        (0..n)
            .map(|i| {
                let sqm = 30 + (i as i64 % 12) * 5;
                let rooms = 1.0 + (i % 4) as f64 * 0.5;
                let floor = (i % 6) as f64;
                let price = (2_000.0 * sqm as f64 + 10_000.0 * rooms + 1_000.0 * floor) as i64;
                listing(price, sqm, rooms, floor, 1 + (i as u32 % 6))
            })
            .collect()
    }

    #[test]
    fn r_squared_constant_target_scores_one() {
        assert_eq!(r_squared(&[5.0, 5.0, 5.0], &[4.0, 5.0, 6.0]), 1.0);
    }

    #[test]
    fn adjusted_r_squared_requires_degrees_of_freedom() {
        assert_eq!(adjusted_r_squared(0.9, 5, 4), 0.0);
        let adj = adjusted_r_squared(0.9, 30, 4);
        assert!(adj > 0.0 && adj < 0.9);
    }

    #[test]
    fn residual_metrics_on_known_errors() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        assert!((mean_absolute_error(&actual, &predicted) - 2.0 / 3.0).abs() < 1e-12);
        assert!((rmse(&actual, &predicted) - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn cross_validate_degenerate_inputs() {
        let (x, y) = design_matrix(&planar_listings(3));
        assert_eq!(cross_validate(&x, &y, 5), 0.0);
        assert_eq!(cross_validate(&x, &y, 1), 0.0);
    }

    #[test]
    fn cross_validate_scores_planar_data_well() {
        let (x, y) = design_matrix(&planar_listings(40));
        let score = cross_validate(&x, &y, 5);
        assert!(score > 0.95, "held-out R² should be high, got {score}");
    }

    #[test]
    fn train_short_circuits_under_four_listings() {
        let model = train_model(&planar_listings(3));
        assert_eq!(model.status, ModelStatus::InsufficientData);
        assert_eq!(model.condition, "Insufficient Data");
        assert_eq!(model.count, 3);
        assert!(model.weights.is_empty());
    }

    #[test]
    fn train_reports_insufficient_data_under_ten_despite_perfect_fit() {
        let model = train_model(&planar_listings(8));
        // A perfect R² cannot rescue an under-sampled model.
        assert!(model.r_squared > 0.9);
        assert_eq!(model.status, ModelStatus::InsufficientData);
        assert_eq!(model.count, 8);
    }

    #[test]
    fn train_flags_potential_overfit_on_small_tight_fit() {
        let model = train_model(&planar_listings(12));
        assert!(model.r_squared > 0.9);
        assert_eq!(model.status, ModelStatus::PotentialOverfit);
    }

    #[test]
    fn train_succeeds_on_large_clean_sample() {
        let model = train_model(&planar_listings(40));
        assert_eq!(model.status, ModelStatus::Success);
        assert_eq!(model.condition, "Success");
        assert_eq!(model.weights.len(), 5);
        assert!(model.r_squared > 0.99);
        assert!(model.adjusted_r2 > 0.99);
        assert!(model.mae < 1.0);
    }

    #[test]
    fn predict_matches_generating_plane() {
        let model = train_model(&planar_listings(40));
        let predicted = model.predict(60.0, 2.0, 3.0);
        let expected = 2_000.0 * 60.0 + 10_000.0 * 2.0 + 1_000.0 * 3.0;
        assert!(
            (predicted - expected).abs() < expected * 0.01,
            "predicted {predicted}, expected ~{expected}"
        );
    }

    #[test]
    fn predict_without_weights_is_zero() {
        let model = train_model(&planar_listings(2));
        assert_eq!(model.predict(60.0, 2.0, 3.0), 0.0);
    }

    #[test]
    fn interval_collapses_on_non_positive_prediction() {
        let mut model = train_model(&planar_listings(40));
        // Force a negative point prediction through the intercept.
        model.weights = vec![-1_000_000.0, 0.0, 0.0, 0.0, 0.0];
        let interval = model.predict_with_interval(50.0, 2.0, 3.0);
        assert_eq!(interval.price, 0.0);
        assert_eq!(interval.min, 0.0);
        assert_eq!(interval.max, 0.0);
    }

    #[test]
    fn interval_inflates_for_unreliable_fits() {
        let mut model = train_model(&planar_listings(40));
        model.mae = 10_000.0;

        model.status = ModelStatus::Success;
        let tight = model.predict_with_interval(60.0, 2.0, 3.0);
        assert!((tight.max - tight.price - 10_000.0).abs() < 1e-9);

        model.status = ModelStatus::PoorFit;
        let wide = model.predict_with_interval(60.0, 2.0, 3.0);
        assert!((wide.max - wide.price - 15_000.0).abs() < 1e-9);
        assert!(wide.min >= 0.0);
    }
}
