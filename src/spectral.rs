//! Low-rank spectral bases for kernel covariance matrices.
//!
//! Eigendecompose, rank eigenpairs descending, keep the smallest prefix
//! holding the target energy fraction, scale each kept eigenvector by
//! sqrt(eigenvalue) (so `energy = 1.0` reproduces the covariance exactly).
//! The discrete eigenvectors become continuous basis functions via linear
//! interpolation over the grid, extrapolating linearly outside it.

use nalgebra::DMatrix;
use ndarray::ArrayView1;

use crate::error::FormulaError;
use crate::types::{Matrix, Vector};

/// Eigenvalues below this fraction of the largest one are treated as zero
/// and excluded from the spectral basis.
const RELATIVE_EIGEN_EPS: f64 = 1e-12;

/// Piecewise-linear interpolant over a strictly increasing grid.
///
/// Out-of-grid evaluation extends the first/last segment linearly rather
/// than clamping, so derivatives stay finite near the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Interp1d {
    xs: Vector,
    ys: Vector,
}

impl Interp1d {
    pub fn new(xs: Vector, ys: Vector) -> Result<Self, FormulaError> {
        if xs.len() != ys.len() {
            return Err(FormulaError::DimensionMismatch(format!(
                "interpolation grid has {} points but {} values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(FormulaError::DimensionMismatch(format!(
                "interpolation grid needs at least 2 points, got {}",
                xs.len()
            )));
        }
        if let Some(w) = xs.windows(2).into_iter().find(|w| w[1] <= w[0]) {
            // grid must be strictly increasing
            return Err(FormulaError::InvalidParameter {
                name: "grid",
                value: w[1],
            });
        }
        Ok(Self { xs, ys })
    }

    pub fn eval(&self, t: f64) -> f64 {
        let n = self.xs.len();
        // segment index; end segments double as extrapolation lines
        let i = if t <= self.xs[1] {
            0
        } else if t >= self.xs[n - 2] {
            n - 2
        } else {
            // binary search for xs[i] <= t < xs[i + 1]
            let (mut lo, mut hi) = (1, n - 2);
            while lo + 1 < hi {
                let mid = (lo + hi) / 2;
                if self.xs[mid] <= t {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            lo
        };
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (t - x0) / (x1 - x0)
    }
}

// copy into nalgebra's column-major storage for the eigendecomposition
fn to_dmatrix(cov: &Matrix) -> DMatrix<f64> {
    let n = cov.nrows();
    let mut out = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        for i in 0..n {
            out[(i, j)] = cov[[i, j]];
        }
    }
    out
}

/// Retains the leading eigenvectors of a symmetric covariance matrix,
/// scaled by the square roots of their eigenvalues.
///
/// `energy` must lie in (0, 1]: the returned prefix is the smallest one
/// whose cumulative eigenvalue sum reaches `energy` times the total.
pub fn scaled_principal_eigvecs(cov: &Matrix, energy: f64) -> Result<Vec<Vector>, FormulaError> {
    if !(energy > 0.0 && energy <= 1.0) {
        return Err(FormulaError::InvalidParameter {
            name: "energy",
            value: energy,
        });
    }
    if cov.nrows() != cov.ncols() {
        return Err(FormulaError::DimensionMismatch(format!(
            "covariance matrix must be square, got {}x{}",
            cov.nrows(),
            cov.ncols()
        )));
    }

    let n = cov.nrows();
    let eigen = to_dmatrix(cov).symmetric_eigen();

    let max_eigval = eigen.eigenvalues.iter().fold(0.0f64, |a, &b| a.max(b));
    if max_eigval <= 0.0 {
        return Err(FormulaError::DegenerateCovariance);
    }
    let threshold = max_eigval * RELATIVE_EIGEN_EPS;

    let mut pairs: Vec<(f64, Vector)> = (0..n)
        .filter(|&k| eigen.eigenvalues[k] > threshold)
        .map(|k| {
            let col = Vector::from_iter(eigen.eigenvectors.column(k).iter().copied());
            (eigen.eigenvalues[k], col)
        })
        .collect();
    if pairs.is_empty() {
        return Err(FormulaError::DegenerateCovariance);
    }
    pairs.sort_by(|a, b| b.0.partial_cmp(&a.0).expect("eigenvalues are finite"));

    let total: f64 = pairs.iter().map(|(lambda, _)| lambda).sum();
    let mut cumulative = 0.0;
    let mut basis = Vec::new();
    for (lambda, vec) in pairs {
        cumulative += lambda;
        basis.push(vec * lambda.sqrt());
        if cumulative / total >= energy {
            break;
        }
    }
    Ok(basis)
}

/// One linear interpolant per scaled eigenvector, each usable as a
/// continuous basis function on arbitrary (non-gridded) input.
pub fn interp_basis(
    eigvecs: Vec<Vector>,
    grid: ArrayView1<f64>,
) -> Result<Vec<Interp1d>, FormulaError> {
    eigvecs
        .into_iter()
        .map(|v| Interp1d::new(grid.to_owned(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::exp_squared;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    fn grid(n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|i| i as f64))
    }

    #[test]
    fn test_full_energy_reconstructs_covariance() {
        let g = grid(8);
        let cov = exp_squared(g.view(), g.view(), 0.5, 1.0).unwrap();
        let basis = scaled_principal_eigvecs(&cov, 1.0).unwrap();

        let mut reconstructed = Matrix::zeros((8, 8));
        for v in &basis {
            for i in 0..8 {
                for j in 0..8 {
                    reconstructed[[i, j]] += v[i] * v[j];
                }
            }
        }
        assert_abs_diff_eq!(reconstructed, cov, epsilon = 1e-8);
    }

    #[test]
    fn test_energy_truncation_is_monotone() {
        let g = grid(16);
        let cov = exp_squared(g.view(), g.view(), 4.0, 1.0).unwrap();
        let low = scaled_principal_eigvecs(&cov, 0.5).unwrap();
        let high = scaled_principal_eigvecs(&cov, 0.99).unwrap();
        assert!(low.len() <= high.len());
        assert!(high.len() <= 16);
        // a long length-scale concentrates energy in few components
        assert!(low.len() < 16);
    }

    #[test]
    fn test_eigvecs_sorted_by_energy() {
        let g = grid(10);
        let cov = exp_squared(g.view(), g.view(), 2.0, 1.0).unwrap();
        let basis = scaled_principal_eigvecs(&cov, 1.0).unwrap();
        let norms: Vec<f64> = basis.iter().map(|v| v.dot(v)).collect();
        for w in norms.windows(2) {
            assert!(w[0] >= w[1] - 1e-12);
        }
    }

    #[test]
    fn test_degenerate_covariance_rejected() {
        let cov = Matrix::zeros((4, 4));
        assert!(matches!(
            scaled_principal_eigvecs(&cov, 0.9),
            Err(FormulaError::DegenerateCovariance)
        ));
    }

    #[test]
    fn test_energy_out_of_range_rejected() {
        let cov = Matrix::eye(3);
        assert!(scaled_principal_eigvecs(&cov, 0.0).is_err());
        assert!(scaled_principal_eigvecs(&cov, 1.5).is_err());
    }

    #[test]
    fn test_interp_matches_grid_and_extrapolates_linearly() {
        let interp = Interp1d::new(array![0.0, 1.0, 2.0], array![0.0, 1.0, 4.0]).unwrap();
        assert_abs_diff_eq!(interp.eval(1.0), 1.0);
        assert_abs_diff_eq!(interp.eval(1.5), 2.5);
        // linear continuation of the end segments, not clamping
        assert_abs_diff_eq!(interp.eval(-1.0), -1.0);
        assert_abs_diff_eq!(interp.eval(3.0), 7.0);
    }

    #[test]
    fn test_interp_rejects_bad_grids() {
        // a non-increasing grid is a malformed parameter, not a shape issue
        assert!(matches!(
            Interp1d::new(array![0.0, 0.0, 1.0], array![1.0, 2.0, 3.0]),
            Err(FormulaError::InvalidParameter { name: "grid", .. })
        ));
        assert!(matches!(
            Interp1d::new(array![0.0, 1.0], array![1.0]),
            Err(FormulaError::DimensionMismatch(_))
        ));
        assert!(matches!(
            Interp1d::new(array![0.0], array![1.0]),
            Err(FormulaError::DimensionMismatch(_))
        ));
    }
}
