//! Gaussian priors over term coefficients.

use crate::error::FormulaError;
use crate::math::{block_diag, kronecker_product, kronecker_vec};
use crate::types::{Matrix, Vector};

/// An independent Gaussian belief over the coefficients of one basis
/// group: a mean vector and a precision (inverse covariance) matrix.
///
/// The precision matrix is expected to be symmetric positive
/// semi-definite; that is a caller contract and is not validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianPrior {
    mean: Vector,
    precision: Matrix,
}

impl GaussianPrior {
    pub fn new(mean: Vector, precision: Matrix) -> Result<Self, FormulaError> {
        let (rows, cols) = precision.dim();
        if rows != cols || rows != mean.len() {
            return Err(FormulaError::DimensionMismatch(format!(
                "prior mean has length {} but precision is {}x{}",
                mean.len(),
                rows,
                cols
            )));
        }
        Ok(Self { mean, precision })
    }

    /// The default prior for library terms: zero mean, identity precision.
    pub fn white_noise(dim: usize) -> Self {
        Self {
            mean: Vector::zeros(dim),
            precision: Matrix::eye(dim),
        }
    }

    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &Vector {
        &self.mean
    }

    pub fn precision(&self) -> &Matrix {
        &self.precision
    }

    pub fn into_parts(self) -> (Vector, Matrix) {
        (self.mean, self.precision)
    }

    /// Independent concatenation: means stacked, precisions combined
    /// block-diagonally with zero cross-terms. `self` occupies the
    /// leading positions.
    pub fn stack(&self, other: &GaussianPrior) -> GaussianPrior {
        let mut mean = Vector::zeros(self.dim() + other.dim());
        mean.slice_mut(ndarray::s![..self.dim()]).assign(&self.mean);
        mean.slice_mut(ndarray::s![self.dim()..]).assign(&other.mean);
        GaussianPrior {
            mean,
            precision: block_diag(&self.precision, &other.precision),
        }
    }

    /// Kronecker combination for tensor-product terms.
    pub fn kron(&self, other: &GaussianPrior) -> GaussianPrior {
        GaussianPrior {
            mean: kronecker_vec(&self.mean, &other.mean),
            precision: kronecker_product(&self.precision, &other.precision),
        }
    }
}
