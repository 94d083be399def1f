//! Normal-equations solver.
//!
//! We repeatedly solve small linear regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T w)^2
//! ```
//!
//! The design matrix is tall (n rows, 5 columns), so we form the normal
//! equations `(XᵀX) w = Xᵀy` and run Gaussian elimination with partial
//! pivoting on the augmented 5x6 system.
//!
//! Implementation choices:
//! - The largest-magnitude pivot-column entry is swapped to the pivot row for
//!   numerical stability.
//! - A pivot below `PIVOT_EPS` marks a near-collinear feature; its weight is
//!   forced to 0 and the solve continues, rather than failing the whole fit.
//!   The sqm/sqm² pair makes near-collinearity a routine occurrence on small
//!   homogeneous districts.

use nalgebra::{DMatrix, DVector};

/// Pivots below this magnitude are treated as degenerate.
const PIVOT_EPS: f64 = 1e-10;

/// Solve `(XᵀX) w = Xᵀy` for `w`.
///
/// Returns `None` only for an empty system (no rows or no columns); a rank
/// deficient system still solves, with the affected weights zeroed.
pub fn solve_normal_equations(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<Vec<f64>> {
    let n = x.nrows();
    let m = x.ncols();
    if n == 0 || m == 0 || y.len() != n {
        return None;
    }

    // Augmented [XᵀX | Xᵀy], m rows by m+1 columns.
    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;
    let mut aug = DMatrix::<f64>::zeros(m, m + 1);
    aug.view_mut((0, 0), (m, m)).copy_from(&xtx);
    aug.set_column(m, &xty);

    // Forward elimination with partial pivoting.
    for i in 0..m {
        let mut pivot = i;
        for j in (i + 1)..m {
            if aug[(j, i)].abs() > aug[(pivot, i)].abs() {
                pivot = j;
            }
        }
        aug.swap_rows(i, pivot);

        if aug[(i, i)].abs() < PIVOT_EPS {
            continue;
        }
        for j in (i + 1)..m {
            let factor = aug[(j, i)] / aug[(i, i)];
            for k in i..=m {
                aug[(j, k)] -= factor * aug[(i, k)];
            }
        }
    }

    // Back substitution; degenerate pivots zero the corresponding weight.
    let mut weights = vec![0.0; m];
    for i in (0..m).rev() {
        if aug[(i, i)].abs() < PIVOT_EPS {
            weights[i] = 0.0;
            continue;
        }
        let mut sum = aug[(i, m)];
        for j in (i + 1)..m {
            sum -= aug[(i, j)] * weights[j];
        }
        weights[i] = sum / aug[(i, i)];
    }

    Some(weights)
}
