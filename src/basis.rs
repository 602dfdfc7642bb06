//! Basis functions and design-matrix construction.
//!
//! A basis group evaluates to an `N x k` design submatrix; column order
//! must match the order used to build the corresponding prior.

use std::fmt;
use std::sync::Arc;

use ndarray::parallel::prelude::*;
use ndarray::{ArrayView1, Axis};

use crate::spectral::Interp1d;
use crate::splines::SplineElement;
use crate::types::Matrix;

/// Below this many design-matrix cells, sequential evaluation is faster
/// than spinning up rayon.
const PARALLEL_THRESHOLD: usize = 10_000;

/// A user-supplied scalar map over the input domain. Used both as a basis
/// function in its own right and as the transform in pointwise
/// multiplication and input remapping.
pub type InputMap = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// One basis function: a scalar-valued function of one input observation,
/// tagged by where it came from so spectral, spline, and user-defined
/// bases share a single interface.
#[derive(Clone)]
pub enum BasisFn {
    /// `t -> 1`, the intercept column.
    Constant,
    /// `t -> t`, the linear column.
    Identity,
    /// Interpolated spectral eigenvector basis.
    Interp(Interp1d),
    /// Clamped B-spline basis element.
    Spline(SplineElement),
    /// One-sided ramp at `knee`: `max(t - knee, 0)`, or `max(knee - t, 0)`
    /// when flipped.
    Ramp { knee: f64, flipped: bool },
    /// Arbitrary user-supplied function.
    Custom(InputMap),
    /// Pointwise product of two basis functions (tensor interactions).
    Product(Box<BasisFn>, Box<BasisFn>),
    /// `t -> f(map(t))`: the inner basis consuming a remapped domain.
    Remapped { inner: Box<BasisFn>, map: InputMap },
    /// `t -> f(t) * w(t)`: dimension-preserving reweighting of a basis.
    Weighted { inner: Box<BasisFn>, weight: InputMap },
}

impl BasisFn {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        BasisFn::Custom(Arc::new(f))
    }

    pub fn eval(&self, t: f64) -> f64 {
        match self {
            BasisFn::Constant => 1.0,
            BasisFn::Identity => t,
            BasisFn::Interp(interp) => interp.eval(t),
            BasisFn::Spline(element) => element.eval(t),
            BasisFn::Ramp { knee, flipped } => {
                if *flipped {
                    (knee - t).max(0.0)
                } else {
                    (t - knee).max(0.0)
                }
            }
            BasisFn::Custom(f) => f(t),
            BasisFn::Product(a, b) => a.eval(t) * b.eval(t),
            BasisFn::Remapped { inner, map } => inner.eval(map(t)),
            BasisFn::Weighted { inner, weight } => inner.eval(t) * weight(t),
        }
    }
}

impl fmt::Debug for BasisFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisFn::Constant => write!(f, "Constant"),
            BasisFn::Identity => write!(f, "Identity"),
            BasisFn::Interp(interp) => f.debug_tuple("Interp").field(interp).finish(),
            BasisFn::Spline(element) => f.debug_tuple("Spline").field(element).finish(),
            BasisFn::Ramp { knee, flipped } => f
                .debug_struct("Ramp")
                .field("knee", knee)
                .field("flipped", flipped)
                .finish(),
            BasisFn::Custom(_) => write!(f, "Custom(..)"),
            BasisFn::Product(a, b) => f.debug_tuple("Product").field(a).field(b).finish(),
            BasisFn::Remapped { inner, .. } => {
                f.debug_struct("Remapped").field("inner", inner).finish_non_exhaustive()
            }
            BasisFn::Weighted { inner, .. } => {
                f.debug_struct("Weighted").field("inner", inner).finish_non_exhaustive()
            }
        }
    }
}

/// An ordered sequence of basis functions constituting one model term.
pub type BasisGroup = Vec<BasisFn>;

/// Evaluates one basis group over the input data, producing the `N x k`
/// design submatrix with columns in basis order.
pub fn design_matrix(input_data: ArrayView1<f64>, basis: &[BasisFn]) -> Matrix {
    let n = input_data.len();
    let k = basis.len();
    let mut x = Matrix::zeros((n, k));

    if n * k >= PARALLEL_THRESHOLD {
        x.axis_iter_mut(Axis(1))
            .into_par_iter()
            .enumerate()
            .for_each(|(j, mut col)| {
                for (i, &t) in input_data.iter().enumerate() {
                    col[i] = basis[j].eval(t);
                }
            });
    } else {
        for (j, f) in basis.iter().enumerate() {
            for (i, &t) in input_data.iter().enumerate() {
                x[[i, j]] = f.eval(t);
            }
        }
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_constant_and_identity() {
        let input = array![0.0, 1.5, -2.0];
        let x = design_matrix(input.view(), &[BasisFn::Constant, BasisFn::Identity]);
        assert_abs_diff_eq!(x, array![[1.0, 0.0], [1.0, 1.5], [1.0, -2.0]]);
    }

    #[test]
    fn test_ramps() {
        let relu = BasisFn::Ramp { knee: 1.0, flipped: false };
        assert_abs_diff_eq!(relu.eval(0.5), 0.0);
        assert_abs_diff_eq!(relu.eval(3.0), 2.0);

        let flipped = BasisFn::Ramp { knee: 1.0, flipped: true };
        assert_abs_diff_eq!(flipped.eval(0.5), 0.5);
        assert_abs_diff_eq!(flipped.eval(3.0), 0.0);
    }

    #[test]
    fn test_product_and_weighted() {
        let f = BasisFn::Product(Box::new(BasisFn::Identity), Box::new(BasisFn::Identity));
        assert_abs_diff_eq!(f.eval(3.0), 9.0);

        let g = BasisFn::Weighted {
            inner: Box::new(BasisFn::Identity),
            weight: Arc::new(|t| t + 1.0),
        };
        assert_abs_diff_eq!(g.eval(2.0), 6.0);
    }

    #[test]
    fn test_remapped_composes() {
        let f = BasisFn::Remapped {
            inner: Box::new(BasisFn::Identity),
            map: Arc::new(|t: f64| t * t),
        };
        assert_abs_diff_eq!(f.eval(-3.0), 9.0);
    }

    #[test]
    fn test_large_design_matrix_matches_sequential() {
        // big enough to take the rayon path
        let input = ndarray::Array1::linspace(0.0, 1.0, 6000);
        let basis = vec![BasisFn::Constant, BasisFn::Identity, BasisFn::custom(|t| t * t)];
        let x = design_matrix(input.view(), &basis);
        assert_eq!(x.dim(), (6000, 3));
        for i in [0, 2999, 5999] {
            let t = input[i];
            assert_abs_diff_eq!(x[[i, 0]], 1.0);
            assert_abs_diff_eq!(x[[i, 1]], t);
            assert_abs_diff_eq!(x[[i, 2]], t * t);
        }
    }
}
