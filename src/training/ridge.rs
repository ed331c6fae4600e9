//! Ridge regression (L2-regularized least squares)

use crate::error::{Result, TrainJobError};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Relative size below which a Cholesky pivot counts as zero
const CHOLESKY_RTOL: f64 = 1e-10;

/// Solve the symmetric positive-definite system `a * x = b` by Cholesky
/// decomposition. Returns `None` if `a` is not numerically positive definite.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= CHOLESKY_RTOL * a[[i, i]].abs() || !diag.is_finite() {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L * z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T * x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Gaussian elimination with partial pivoting, for systems Cholesky rejects.
/// Pivots below `n * EPS` times the largest entry of `a` count as zero.
fn gauss_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut m = a.clone();
    let mut rhs = b.clone();
    let scale = a.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tolerance = n as f64 * f64::EPSILON * scale;

    for col in 0..n {
        let pivot = (col..n).max_by(|&r1, &r2| m[[r1, col]].abs().total_cmp(&m[[r2, col]].abs()))?;
        if m[[pivot, col]].abs() <= tolerance {
            return None;
        }
        if pivot != col {
            for j in 0..n {
                m.swap([col, j], [pivot, j]);
            }
            rhs.swap(col, pivot);
        }

        for row in (col + 1)..n {
            let factor = m[[row, col]] / m[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                m[[row, j]] -= factor * m[[col, j]];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| m[[i, j]] * x[j]).sum();
        x[i] = (rhs[i] - sum) / m[[i, i]];
    }
    Some(x)
}

/// Solve `a * x = b` for a symmetric positive semi-definite `a`.
///
/// A rank-deficient `a` (duplicated or constant features at `alpha = 0`) is
/// retried with a diagonal jitter of `1e-8` times its mean diagonal, which
/// approaches the minimum-norm least-squares solution.
fn solve_normal_equations(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    if let Some(x) = cholesky_solve(a, b) {
        return Some(x);
    }

    let n = a.nrows();
    let mean_diag = a.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64;
    let jitter = (1e-8 * mean_diag).max(f64::EPSILON);
    let mut a_reg = a.clone();
    for i in 0..n {
        a_reg[[i, i]] += jitter;
    }
    debug!(jitter, "Normal equations rank deficient, retrying regularized");

    cholesky_solve(&a_reg, b).or_else(|| gauss_solve(&a_reg, b))
}

/// Ridge regression minimizing `||y - Xw - b||^2 + alpha * ||w||^2`.
///
/// The intercept is not penalized. `alpha = 0` is ordinary least squares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RidgeRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    pub fit_intercept: bool,
    /// L2 regularization strength
    pub alpha: f64,
    pub is_fitted: bool,
}

impl Default for RidgeRegression {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RidgeRegression {
    pub fn new(alpha: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha,
            is_fitted: false,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        if n_samples != y.len() {
            return Err(TrainJobError::ShapeMismatch {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(TrainJobError::Training("cannot fit ridge on zero rows".to_string()));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(TrainJobError::Training("inputs contain NaN or infinite values".to_string()));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(TrainJobError::InvalidParameter {
                name: "alpha".to_string(),
                value: self.alpha.to_string(),
                reason: "must be a finite non-negative number".to_string(),
            });
        }

        let (x_c, y_c, offsets) = if self.fit_intercept {
            let x_mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| TrainJobError::Training("empty feature matrix".to_string()))?;
            let y_mean = y.mean().unwrap_or(0.0);
            (x - &x_mean.view().insert_axis(Axis(0)), y - y_mean, Some((x_mean, y_mean)))
        } else {
            (x.to_owned(), y.to_owned(), None)
        };

        let mut xtx = x_c.t().dot(&x_c);
        for i in 0..n_features {
            xtx[[i, i]] += self.alpha;
        }
        let xty = x_c.t().dot(&y_c);

        let coefficients = solve_normal_equations(&xtx, &xty)
            .ok_or_else(|| {
                TrainJobError::Training(format!(
                    "normal equations are singular for alpha = {}",
                    self.alpha
                ))
            })?;

        self.intercept = Some(match offsets {
            Some((x_mean, y_mean)) => y_mean - coefficients.dot(&x_mean),
            None => 0.0,
        });
        self.coefficients = Some(coefficients);
        self.is_fitted = true;
        Ok(self)
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = match (&self.coefficients, self.is_fitted) {
            (Some(c), true) => c,
            _ => return Err(TrainJobError::ModelNotFitted),
        };
        if x.ncols() != coefficients.len() {
            return Err(TrainJobError::ShapeMismatch {
                expected: format!("{} features", coefficients.len()),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(x.dot(coefficients) + self.intercept.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn linear_data() -> (Array2<f64>, Array1<f64>) {
        // y = 2*x0 - 3*x1 + 5
        let x = array![
            [1.0, 0.5],
            [2.0, 1.5],
            [3.0, 0.0],
            [4.0, 2.0],
            [5.0, 1.0],
            [6.0, 3.5],
        ];
        let y = x.map_axis(Axis(1), |r| 2.0 * r[0] - 3.0 * r[1] + 5.0);
        (x, y)
    }

    #[test]
    fn test_zero_alpha_is_least_squares() {
        let (x, y) = linear_data();
        let mut model = RidgeRegression::new(0.0);
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.as_ref().unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-9);
        assert!((coef[1] + 3.0).abs() < 1e-9);
        assert!((model.intercept.unwrap() - 5.0).abs() < 1e-9);
        let residual = (&model.predict(&x).unwrap() - &y).mapv(f64::abs).sum();
        assert!(residual < 1e-9);
    }

    #[test]
    fn test_alpha_shrinks_coefficients() {
        let (x, y) = linear_data();
        let norm = |alpha: f64| {
            let mut m = RidgeRegression::new(alpha);
            m.fit(&x, &y).unwrap();
            m.coefficients.unwrap().mapv(|c| c * c).sum()
        };
        assert!(norm(10.0) < norm(0.5));
        assert!(norm(0.5) < norm(0.0));
    }

    #[test]
    fn test_collinear_least_squares_still_fits() {
        let x = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0], [4.0, 8.0]];
        let y = array![1.0, 2.0, 3.0, 4.0];
        let mut model = RidgeRegression::new(0.0);
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-6);
        }
        // Weight is shared along the collinear direction: c0 + 2 * c1 = 1
        let coef = model.coefficients.unwrap();
        assert!((coef[0] + 2.0 * coef[1] - 1.0).abs() < 1e-6);
        assert!(coef.iter().all(|c| c.abs() < 1.0));
    }

    #[test]
    fn test_constant_feature_gets_zero_weight() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0], [4.0, 5.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];
        let mut model = RidgeRegression::new(0.0);
        model.fit(&x, &y).unwrap();

        let coef = model.coefficients.unwrap();
        assert!((coef[0] - 2.0).abs() < 1e-6);
        assert!(coef[1].abs() < 1e-9);
    }

    #[test]
    fn test_gauss_tolerance_is_scale_free() {
        // Well-conditioned but tiny entries must not be mistaken for zero pivots
        let a = array![[2e-14, 1e-14], [1e-14, 3e-14]];
        let b = array![3e-14, 4e-14];
        let x = gauss_solve(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-9);
        assert!((x[1] - 1.0).abs() < 1e-9);

        let singular = array![[1e6, 2e6], [2e6, 4e6]];
        assert!(gauss_solve(&singular, &array![1.0, 2.0]).is_none());
    }

    #[test]
    fn test_non_finite_inputs_rejected() {
        let x = array![[1.0], [f64::NAN]];
        let y = array![1.0, 2.0];
        assert!(matches!(
            RidgeRegression::new(0.5).fit(&x, &y),
            Err(TrainJobError::Training(_))
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let (x, y) = linear_data();
        assert!(matches!(
            RidgeRegression::new(-1.0).fit(&x, &y),
            Err(TrainJobError::InvalidParameter { .. })
        ));
        assert!(matches!(
            RidgeRegression::new(0.1).predict(&x),
            Err(TrainJobError::ModelNotFitted)
        ));

        let mut model = RidgeRegression::new(0.1);
        model.fit(&x, &y).unwrap();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(TrainJobError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_without_intercept() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![2.0, 4.0, 6.0];
        let mut model = RidgeRegression::new(0.0).with_fit_intercept(false);
        model.fit(&x, &y).unwrap();
        assert_eq!(model.intercept, Some(0.0));
        assert!((model.coefficients.unwrap()[0] - 2.0).abs() < 1e-12);
    }
}
