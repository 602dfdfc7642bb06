//! Ready-made formula terms.
//!
//! Each constructor wires a kernel, spectral, or spline builder into a
//! [`Formula`] with a default white-noise prior sized to the basis. Kernel
//! terms optionally take a [`MeanBasis`], whose columns and prior go in
//! front.

use ndarray::ArrayView1;

use crate::basis::{BasisFn, BasisGroup, InputMap};
use crate::error::FormulaError;
use crate::formula::Formula;
use crate::kernels;
use crate::prior::GaussianPrior;
use crate::spectral::{interp_basis, scaled_principal_eigvecs};
use crate::splines::bspline_basis;

/// User-supplied mean basis prepended to a kernel term, with its own
/// prior over the extra coefficients.
#[derive(Debug, Clone)]
pub struct MeanBasis {
    pub basis: BasisGroup,
    pub prior: GaussianPrior,
}

impl MeanBasis {
    pub fn new(basis: BasisGroup, prior: GaussianPrior) -> Result<Self, FormulaError> {
        if basis.len() != prior.dim() {
            return Err(FormulaError::DimensionMismatch(format!(
                "mean basis holds {} functions but its prior has dimension {}",
                basis.len(),
                prior.dim()
            )));
        }
        Ok(Self { basis, prior })
    }
}

// Shared tail of the kernel-term constructors: interpolate the scaled
// eigenvectors, give them a white-noise prior, and prepend the optional
// mean basis.
fn spectral_term(
    cov: &crate::types::Matrix,
    grid: ArrayView1<f64>,
    energy: f64,
    mean: Option<MeanBasis>,
) -> Result<Formula, FormulaError> {
    let eigvecs = scaled_principal_eigvecs(cov, energy)?;
    let interped = interp_basis(eigvecs, grid)?;

    let mut basis: BasisGroup = Vec::new();
    let mut prior = GaussianPrior::white_noise(interped.len());
    if let Some(mean) = mean {
        prior = mean.prior.stack(&prior);
        basis.extend(mean.basis);
    }
    basis.extend(interped.into_iter().map(BasisFn::Interp));
    Formula::single(basis, prior)
}

/// Exponentiated-quadratic (smooth) model term over a grid. The kernel is
/// eigendecomposed and truncated to the given retained-energy fraction.
pub fn exp_squared_1d(
    grid: ArrayView1<f64>,
    l: f64,
    sigma: f64,
    energy: f64,
    mean: Option<MeanBasis>,
) -> Result<Formula, FormulaError> {
    let cov = kernels::exp_squared(grid, grid, l, sigma)?;
    spectral_term(&cov, grid, energy, mean)
}

/// Periodic model term over a grid.
pub fn exp_sine_squared_1d(
    grid: ArrayView1<f64>,
    l: f64,
    sigma: f64,
    period: f64,
    energy: f64,
    mean: Option<MeanBasis>,
) -> Result<Formula, FormulaError> {
    let cov = kernels::exp_sine_squared(grid, grid, l, sigma, period)?;
    spectral_term(&cov, grid, energy, mean)
}

/// Uncorrelated (white-noise) term: one hat function per grid point.
pub fn white_noise_1d(
    grid: ArrayView1<f64>,
    sigma: f64,
    energy: f64,
    mean: Option<MeanBasis>,
) -> Result<Formula, FormulaError> {
    let cov = kernels::white_noise(grid.len(), sigma)?;
    spectral_term(&cov, grid, energy, mean)
}

/// Constant (intercept) term with an explicit one-dimensional prior.
pub fn scalar(prior: GaussianPrior) -> Result<Formula, FormulaError> {
    Formula::single(vec![BasisFn::Constant], prior)
}

/// Linear term `t -> t` with an explicit one-dimensional prior.
pub fn line(prior: GaussianPrior) -> Result<Formula, FormulaError> {
    Formula::single(vec![BasisFn::Identity], prior)
}

/// Single custom basis function with an explicit one-dimensional prior.
pub fn function(f: InputMap, prior: GaussianPrior) -> Result<Formula, FormulaError> {
    Formula::single(vec![BasisFn::Custom(f)], prior)
}

fn ramp_term(
    grid: ArrayView1<f64>,
    flipped: bool,
    prior: Option<GaussianPrior>,
) -> Result<Formula, FormulaError> {
    if grid.len() < 3 {
        return Err(FormulaError::DimensionMismatch(format!(
            "ramp terms need at least 3 grid points, got {}",
            grid.len()
        )));
    }
    // one ramp per interior grid point, endpoints excluded
    let basis: BasisGroup = grid
        .iter()
        .skip(1)
        .take(grid.len() - 2)
        .map(|&knee| BasisFn::Ramp { knee, flipped })
        .collect();
    let prior = prior.unwrap_or_else(|| GaussianPrior::white_noise(basis.len()));
    Formula::single(basis, prior)
}

/// One-sided ramps `max(t - c, 0)` at each interior grid point
/// (dimension `grid.len() - 2`).
pub fn relu_1d(grid: ArrayView1<f64>, prior: Option<GaussianPrior>) -> Result<Formula, FormulaError> {
    ramp_term(grid, false, prior)
}

/// Mirrored ramps `max(c - t, 0)` at each interior grid point.
pub fn flipped_relu_1d(
    grid: ArrayView1<f64>,
    prior: Option<GaussianPrior>,
) -> Result<Formula, FormulaError> {
    ramp_term(grid, true, prior)
}

/// Clamped B-spline term over a grid (dimension `grid.len() + order - 2`).
pub fn bspline_1d(
    grid: ArrayView1<f64>,
    order: usize,
    extrapolate: bool,
    prior: Option<GaussianPrior>,
) -> Result<Formula, FormulaError> {
    let basis: BasisGroup = bspline_basis(grid, order, extrapolate)?
        .into_iter()
        .map(BasisFn::Spline)
        .collect();
    let prior = prior.unwrap_or_else(|| GaussianPrior::white_noise(basis.len()));
    Formula::single(basis, prior)
}
