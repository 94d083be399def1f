//! Core descriptive statistics.
//!
//! Conventions shared by every function here:
//!
//! - inputs are borrowed slices; sorting always happens on a copy
//! - variance is the population form (divide by `n`)
//! - an empty input yields 0 (or an empty vector), never NaN

use crate::domain::HistogramBin;

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divide by `n`); 0 for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg) * (v - avg)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Median of a copy of the input; midpoint average for even lengths.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// All values achieving the maximum observed frequency, sorted ascending.
///
/// A slice with no repeats is entirely modal, so every value comes back.
pub fn modes(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let sorted = sorted_copy(values);

    // Equal values are adjacent after sorting, so frequency counting is a
    // single run-length scan (f64 keys are not hashable).
    let mut runs: Vec<(f64, usize)> = Vec::new();
    let mut max_count = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let v = sorted[i];
        let mut j = i;
        while j < sorted.len() && sorted[j] == v {
            j += 1;
        }
        let count = j - i;
        runs.push((v, count));
        max_count = max_count.max(count);
        i = j;
    }

    runs.into_iter()
        .filter(|&(_, c)| c == max_count)
        .map(|(v, _)| v)
        .collect()
}

/// Percentile via linear interpolation between order statistics.
///
/// Uses `index = (p / 100) * (n - 1)`; `p <= 0` clamps to the minimum and
/// `p >= 100` clamps to the maximum. 0 for an empty slice.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sorted = sorted_copy(values);
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 100.0 {
        return sorted[sorted.len() - 1];
    }

    let n = sorted.len() as f64;
    let index = (p / 100.0) * (n - 1.0);
    let i = index as usize;
    let fraction = index - i as f64;

    if i + 1 < sorted.len() {
        sorted[i] + fraction * (sorted[i + 1] - sorted[i])
    } else {
        sorted[i]
    }
}

/// Quartile 1, 2, or 3 (any other `q` yields 0).
pub fn quartile(values: &[f64], q: u8) -> f64 {
    match q {
        1 => percentile(values, 25.0),
        2 => percentile(values, 50.0),
        3 => percentile(values, 75.0),
        _ => 0.0,
    }
}

/// Interquartile range `Q3 - Q1`.
pub fn iqr(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    quartile(values, 3) - quartile(values, 1)
}

/// Equal-width histogram spanning `[min, max]`.
///
/// Edge handling:
/// - `min == max` collapses to a single bin containing every point
/// - the final bin's upper edge is forced to `max` so floating-point rounding
///   cannot push the maximum out of range
/// - `rounded` switches the displayed edges to whole numbers (bucket
///   assignment is unaffected); otherwise edges display with 2 decimals
pub fn histogram(data: &[f64], bin_count: usize, rounded: bool) -> Vec<HistogramBin> {
    if data.is_empty() || bin_count == 0 {
        return Vec::new();
    }

    let mut min_val = data[0];
    let mut max_val = data[0];
    for &v in data {
        min_val = min_val.min(v);
        max_val = max_val.max(v);
    }

    if min_val == max_val {
        let edge = if rounded { min_val.round() } else { min_val };
        return vec![HistogramBin {
            from: edge,
            to: edge,
            count: data.len(),
        }];
    }

    let bin_width = (max_val - min_val) / bin_count as f64;
    let mut bins: Vec<HistogramBin> = (0..bin_count)
        .map(|i| {
            let from = min_val + i as f64 * bin_width;
            let to = if i == bin_count - 1 { max_val } else { from + bin_width };
            let (from_disp, to_disp) = if rounded {
                (from.round(), to.round())
            } else {
                (round_to(from, 2), round_to(to, 2))
            };
            HistogramBin {
                from: from_disp,
                to: to_disp,
                count: 0,
            }
        })
        .collect();

    for &v in data {
        let idx = (((v - min_val) / bin_width) as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }

    bins
}

/// Empirical-rule normality heuristic.
///
/// Classifies the sample as normal when the fraction of points within one
/// sigma of the mean falls in `[0.6, 0.8]`, within two sigma in `[0.9, 1.0]`,
/// and within three sigma is at least 0.98. Fewer than 3 points is never
/// normal; a zero-variance sample is always normal.
pub fn is_normal_distribution(values: &[f64]) -> bool {
    if values.len() < 3 {
        return false;
    }
    let avg = mean(values);
    let sigma = std_dev(values);
    if sigma == 0.0 {
        return true;
    }

    let mut within1 = 0usize;
    let mut within2 = 0usize;
    let mut within3 = 0usize;
    for &v in values {
        let diff = (v - avg).abs();
        if diff <= sigma {
            within1 += 1;
        }
        if diff <= 2.0 * sigma {
            within2 += 1;
        }
        if diff <= 3.0 * sigma {
            within3 += 1;
        }
    }

    let n = values.len() as f64;
    let p1 = within1 as f64 / n;
    let p2 = within2 as f64 / n;
    let p3 = within3 as f64 / n;

    (0.6..=0.8).contains(&p1) && (0.9..=1.0).contains(&p2) && p3 >= 0.98
}

/// Standardize each value to `(v - mean) / sigma`.
///
/// A zero-sigma input returns all zeros rather than dividing by zero.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let avg = mean(values);
    let sigma = std_dev(values);
    if sigma == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - avg) / sigma).collect()
}

/// Pearson correlation coefficient.
///
/// Returns 0 (never NaN) when either input is empty, lengths differ, or
/// either side has zero variance.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }
    let avg_x = mean(x);
    let avg_y = mean(y);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for i in 0..x.len() {
        let dx = x[i] - avg_x;
        let dy = y[i] - avg_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Round to `precision` decimal places for display.
pub fn round_to(x: f64, precision: i32) -> f64 {
    let ratio = 10f64.powi(precision);
    (x * ratio).round() / ratio
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}
