//! Covariance kernel functions over pairs of 1-D input points.
//!
//! These are pure and deterministic: they build the dense covariance
//! matrices that the spectral basis builder eigendecomposes.

use ndarray::ArrayView1;

use crate::error::FormulaError;
use crate::types::Matrix;

fn require_positive(name: &'static str, value: f64) -> Result<(), FormulaError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(FormulaError::InvalidParameter { name, value })
    }
}

/// Exponentiated-quadratic (RBF) kernel:
/// `sigma^2 * exp(-0.5 * d^2 / l^2)` over pairwise distances.
pub fn exp_squared(
    x1: ArrayView1<f64>,
    x2: ArrayView1<f64>,
    l: f64,
    sigma: f64,
) -> Result<Matrix, FormulaError> {
    require_positive("l", l)?;
    require_positive("sigma", sigma)?;

    let mut cov = Matrix::zeros((x1.len(), x2.len()));
    for (i, &a) in x1.iter().enumerate() {
        for (j, &b) in x2.iter().enumerate() {
            let d = a - b;
            cov[[i, j]] = sigma * sigma * (-0.5 * d * d / (l * l)).exp();
        }
    }
    Ok(cov)
}

/// Periodic exponentiated-quadratic kernel:
/// `sigma^2 * exp(-2 * sin^2(pi * d / period) / l^2)`.
pub fn exp_sine_squared(
    x1: ArrayView1<f64>,
    x2: ArrayView1<f64>,
    l: f64,
    sigma: f64,
    period: f64,
) -> Result<Matrix, FormulaError> {
    require_positive("l", l)?;
    require_positive("sigma", sigma)?;
    require_positive("period", period)?;

    let mut cov = Matrix::zeros((x1.len(), x2.len()));
    for (i, &a) in x1.iter().enumerate() {
        for (j, &b) in x2.iter().enumerate() {
            let s = (std::f64::consts::PI * (a - b).abs() / period).sin();
            cov[[i, j]] = sigma * sigma * (-2.0 * s * s / (l * l)).exp();
        }
    }
    Ok(cov)
}

/// White-noise kernel: `sigma^2 * I`.
pub fn white_noise(n: usize, sigma: f64) -> Result<Matrix, FormulaError> {
    require_positive("sigma", sigma)?;
    Ok(Matrix::eye(n) * (sigma * sigma))
}
