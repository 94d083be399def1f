//! Variance-minimizing binary regression tree.
//!
//! Split search is exhaustive: every `(feature, observed value)` pair in the
//! node's subset is a candidate `feature <= value` split, scored by
//! `Var(left)*|left| + Var(right)*|right|`. Tie-breaking is deterministic:
//! the scan runs feature index ascending, then row order, and only a strict
//! improvement replaces the incumbent, so the first minimal candidate wins.
//! Replicating that scan order is required to reproduce predictions
//! bit-for-bit, since ties are common on small integer-like features.

use crate::stats::{mean, variance};

/// Minimum samples a node needs before a split is attempted.
const MIN_SPLIT_SIZE: usize = 5;

/// One arena slot: a leaf value or an internal split.
///
/// Child ids always point forward in the arena; the parent is the sole owner
/// of its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct WorkItem {
    node_id: usize,
    rows: Vec<usize>,
    depth: usize,
}

impl RegressionTree {
    /// Fit a tree on feature rows `x` and targets `y`.
    ///
    /// Returns `None` for an empty dataset. A node becomes a leaf (holding
    /// the mean of its targets) when the depth limit is reached, when it holds
    /// fewer than 5 samples, or when no candidate split leaves both sides
    /// non-empty.
    pub fn fit(x: &[Vec<f64>], y: &[f64], max_depth: usize) -> Option<RegressionTree> {
        if y.is_empty() || x.len() != y.len() {
            return None;
        }

        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut stack = vec![WorkItem {
            node_id: 0,
            rows: (0..y.len()).collect(),
            depth: 0,
        }];

        // Explicit work stack instead of recursion; depth is bounded by
        // `max_depth`, not by the call stack.
        while let Some(item) = stack.pop() {
            let targets: Vec<f64> = item.rows.iter().map(|&r| y[r]).collect();

            if item.depth >= max_depth || item.rows.len() < MIN_SPLIT_SIZE {
                nodes[item.node_id] = Node::Leaf {
                    value: mean(&targets),
                };
                continue;
            }

            let Some((feature, threshold)) = best_split(x, y, &item.rows) else {
                nodes[item.node_id] = Node::Leaf {
                    value: mean(&targets),
                };
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = item
                .rows
                .iter()
                .copied()
                .partition(|&r| x[r][feature] <= threshold);

            let left = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });
            let right = nodes.len();
            nodes.push(Node::Leaf { value: 0.0 });

            nodes[item.node_id] = Node::Split {
                feature,
                threshold,
                left,
                right,
            };
            stack.push(WorkItem {
                node_id: left,
                rows: left_rows,
                depth: item.depth + 1,
            });
            stack.push(WorkItem {
                node_id: right,
                rows: right_rows,
                depth: item.depth + 1,
            });
        }

        Some(RegressionTree { nodes })
    }

    /// Predict by descending from the root.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Number of arena nodes (leaves and splits).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Scan every (feature, observed value) candidate over `rows` and return the
/// first split minimizing the variance-weighted sum, or `None` when no split
/// leaves both sides non-empty.
fn best_split(x: &[Vec<f64>], y: &[f64], rows: &[usize]) -> Option<(usize, f64)> {
    let num_features = x[rows[0]].len();
    let mut best: Option<(usize, f64)> = None;
    let mut min_score = f64::INFINITY;

    for feature in 0..num_features {
        for &candidate_row in rows {
            let threshold = x[candidate_row][feature];

            let mut left_y = Vec::new();
            let mut right_y = Vec::new();
            for &r in rows {
                if x[r][feature] <= threshold {
                    left_y.push(y[r]);
                } else {
                    right_y.push(y[r]);
                }
            }

            if left_y.is_empty() || right_y.is_empty() {
                continue;
            }

            let score = variance(&left_y) * left_y.len() as f64
                + variance(&right_y) * right_y.len() as f64;
            if score < min_score {
                min_score = score;
                best = Some((feature, threshold));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(xs: &[f64]) -> Vec<Vec<f64>> {
        xs.iter().map(|&v| vec![v]).collect()
    }

    #[test]
    fn empty_dataset_fits_nothing() {
        assert!(RegressionTree::fit(&[], &[], 3).is_none());
    }

    #[test]
    fn tiny_dataset_becomes_a_single_leaf() {
        let x = column(&[1.0, 2.0, 3.0]);
        let y = [10.0, 20.0, 30.0];
        let tree = RegressionTree::fit(&x, &y, 5).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[100.0]), 20.0);
    }

    #[test]
    fn zero_depth_yields_global_mean() {
        let x = column(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let tree = RegressionTree::fit(&x, &y, 0).unwrap();
        assert_eq!(tree.predict(&[1.0]), 3.5);
        assert_eq!(tree.predict(&[6.0]), 3.5);
    }

    #[test]
    fn splits_a_clear_step_function() {
        // Two flat regimes; the first split should separate them exactly.
        let x = column(&[1.0, 2.0, 3.0, 4.0, 11.0, 12.0, 13.0, 14.0]);
        let y = [10.0, 10.0, 10.0, 10.0, 100.0, 100.0, 100.0, 100.0];
        let tree = RegressionTree::fit(&x, &y, 4).unwrap();
        assert_eq!(tree.predict(&[2.0]), 10.0);
        assert_eq!(tree.predict(&[13.0]), 100.0);
    }

    #[test]
    fn constant_feature_stays_a_leaf() {
        // Every candidate split puts all rows on the left: no valid split.
        let x = column(&[7.0; 8]);
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let tree = RegressionTree::fit(&x, &y, 5).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict(&[7.0]), 4.5);
    }

    #[test]
    fn monotonic_data_predicts_monotonically_and_beats_mean_baseline() {
        let xs: Vec<f64> = (0..30).map(f64::from).collect();
        let ys = xs.clone();
        let x = column(&xs);
        let tree = RegressionTree::fit(&x, &ys, 6).unwrap();

        let predictions: Vec<f64> = xs.iter().map(|&v| tree.predict(&[v])).collect();
        for pair in predictions.windows(2) {
            assert!(pair[1] >= pair[0], "predictions must be non-decreasing");
        }

        let baseline = mean(&ys);
        let tree_sse: f64 = xs
            .iter()
            .zip(ys.iter())
            .map(|(&v, &t)| (tree.predict(&[v]) - t).powi(2))
            .sum();
        let baseline_sse: f64 = ys.iter().map(|&t| (t - baseline).powi(2)).sum();
        assert!(tree_sse < baseline_sse);
    }

    #[test]
    fn multi_feature_split_prefers_the_informative_feature() {
        // Feature 0 is noise (constant), feature 1 carries the signal.
        let x: Vec<Vec<f64>> = (0..12)
            .map(|i| vec![5.0, if i < 6 { 1.0 } else { 2.0 }])
            .collect();
        let y: Vec<f64> = (0..12).map(|i| if i < 6 { 10.0 } else { 50.0 }).collect();
        let tree = RegressionTree::fit(&x, &y, 3).unwrap();
        assert_eq!(tree.predict(&[5.0, 1.0]), 10.0);
        assert_eq!(tree.predict(&[5.0, 2.0]), 50.0);
    }

    #[test]
    fn depth_limit_bounds_the_tree() {
        let xs: Vec<f64> = (0..64).map(f64::from).collect();
        let ys = xs.clone();
        let x = column(&xs);
        let tree = RegressionTree::fit(&x, &ys, 2).unwrap();
        // Depth 2 allows at most 4 leaves and 3 splits.
        assert!(tree.node_count() <= 7);
    }
}
