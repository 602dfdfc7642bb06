//! Formula algebra for building generalized additive models.
//!
//! Compose basis-function terms (spectral kernel bases, B-splines, white
//! noise, linear/scalar terms, ramps, custom functions) into one linear
//! model, each term carrying its own Gaussian prior over coefficients.
//! Terms combine by summation, pointwise multiplication, input remapping,
//! and tensor (Kronecker) products, with the joint prior kept consistent
//! with design-matrix column order throughout.
//!
//! The crate only builds numeric artifacts: the `(design matrix, prior
//! mean, prior precision)` triple is handed to an external inference
//! engine, which is where estimation happens.
//!
//! ```
//! use gam_formula::{terms, GaussianPrior};
//! use ndarray::Array1;
//!
//! # fn main() -> Result<(), gam_formula::FormulaError> {
//! let grid = Array1::linspace(0.0, 10.0, 20);
//! let smooth = terms::exp_squared_1d(grid.view(), 2.0, 1.0, 0.99, None)?;
//! let trend = terms::line(GaussianPrior::new(
//!     ndarray::array![0.0],
//!     ndarray::array![[1e-6]],
//! )?)?;
//! let model = smooth.sum(&trend);
//!
//! let data = Array1::linspace(0.0, 10.0, 50);
//! let inputs = model.build(data.view());
//! assert_eq!(inputs.design.ncols(), model.dim());
//! # Ok(())
//! # }
//! ```

mod basis;
mod error;
mod formula;
mod math;
mod prior;
mod types;

pub mod kernels;
pub mod spectral;
pub mod splines;
pub mod terms;

pub use basis::{design_matrix, BasisFn, BasisGroup, InputMap};
pub use error::FormulaError;
pub use formula::Formula;
pub use prior::GaussianPrior;
pub use terms::MeanBasis;
pub use types::{Matrix, ModelInputs, Vector};
