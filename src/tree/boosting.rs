//! Gradient boosting over shallow regression trees.

use crate::tree::regression::RegressionTree;

/// Depth cap for each boosted tree; boosting wants weak learners.
const BOOST_TREE_DEPTH: usize = 3;

/// An ordered ensemble of residual-fitted trees.
///
/// Order is semantic: tree `i` was fit against the residuals left by trees
/// `0..i`, so the sequence is not interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostingModel {
    trees: Vec<RegressionTree>,
    learning_rate: f64,
}

impl BoostingModel {
    /// Fit `n_trees` rounds of residual boosting.
    ///
    /// Residuals start as the raw targets; each round fits a depth-≤3 tree to
    /// the current residuals, appends it, and subtracts `learning_rate *
    /// tree.predict(x)` per row. Training stops early if a tree cannot be
    /// built. Returns `None` for an empty dataset.
    pub fn fit(x: &[Vec<f64>], y: &[f64], n_trees: usize, learning_rate: f64) -> Option<BoostingModel> {
        if y.is_empty() {
            return None;
        }

        let mut trees = Vec::with_capacity(n_trees);
        let mut residuals = y.to_vec();

        for _ in 0..n_trees {
            let Some(tree) = RegressionTree::fit(x, &residuals, BOOST_TREE_DEPTH) else {
                break;
            };

            for (j, row) in x.iter().enumerate() {
                residuals[j] -= learning_rate * tree.predict(row);
            }
            trees.push(tree);
        }

        Some(BoostingModel {
            trees,
            learning_rate,
        })
    }

    /// Sum of every tree's output, scaled by the learning rate.
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.trees
            .iter()
            .map(|t| self.learning_rate * t.predict(features))
            .sum()
    }

    /// Number of trees actually fit (early stop may undershoot the request).
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(xs: &[f64]) -> Vec<Vec<f64>> {
        xs.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn empty_dataset_fits_nothing() {
        assert!(BoostingModel::fit(&[], &[], 10, 0.1).is_none());
    }

    #[test]
    fn zero_rounds_predicts_zero() {
        let x = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let y = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let model = BoostingModel::fit(&x, &y, 0, 0.1).unwrap();
        assert_eq!(model.tree_count(), 0);
        assert_eq!(model.predict(&[3.0]), 0.0);
    }

    #[test]
    fn successive_rounds_shrink_training_error() {
        let xs: Vec<f64> = (0..24).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|v| 3.0 * v + 7.0).collect();
        let x = column(&xs);

        let small = BoostingModel::fit(&x, &ys, 2, 0.3).unwrap();
        let large = BoostingModel::fit(&x, &ys, 30, 0.3).unwrap();

        let sse = |m: &BoostingModel| -> f64 {
            xs.iter()
                .zip(ys.iter())
                .map(|(&v, &t)| (m.predict(&[v]) - t).powi(2))
                .sum()
        };
        assert!(sse(&large) < sse(&small));
    }

    #[test]
    fn converges_toward_step_targets() {
        let x = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 21.0, 22.0, 23.0, 24.0, 25.0]);
        let y = [10.0, 10.0, 10.0, 10.0, 10.0, 90.0, 90.0, 90.0, 90.0, 90.0];
        let model = BoostingModel::fit(&x, &y, 40, 0.2).unwrap();

        let low = model.predict(&[3.0]);
        let high = model.predict(&[23.0]);
        assert!((low - 10.0).abs() < 2.0, "low regime: got {low}");
        assert!((high - 90.0).abs() < 2.0, "high regime: got {high}");
    }

    #[test]
    fn prediction_is_scaled_sum_of_trees() {
        let x = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let y = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let model = BoostingModel::fit(&x, &y, 1, 0.5).unwrap();
        // One round on constant targets: every leaf holds 5.0.
        assert_eq!(model.tree_count(), 1);
        assert_eq!(model.predict(&[4.0]), 2.5);
    }
}
