//! The composable formula: ordered basis groups plus one joint Gaussian
//! prior. Formulas are immutable; combinators return new ones, and shape
//! errors surface at combination time rather than during design-matrix
//! construction.

use ndarray::{concatenate, ArrayView1, Axis};

use crate::basis::{design_matrix, BasisFn, BasisGroup, InputMap};
use crate::error::FormulaError;
use crate::prior::GaussianPrior;
use crate::types::{Matrix, ModelInputs};

#[derive(Debug, Clone)]
pub struct Formula {
    bases: Vec<BasisGroup>,
    prior: GaussianPrior,
}

impl Formula {
    /// Invariant: the prior dimension equals the total number of basis
    /// functions across all groups.
    pub fn new(bases: Vec<BasisGroup>, prior: GaussianPrior) -> Result<Self, FormulaError> {
        let total: usize = bases.iter().map(|g| g.len()).sum();
        if total != prior.dim() {
            return Err(FormulaError::DimensionMismatch(format!(
                "basis groups hold {} functions but the prior has dimension {}",
                total,
                prior.dim()
            )));
        }
        Ok(Self { bases, prior })
    }

    /// Single-group convenience constructor.
    pub fn single(basis: BasisGroup, prior: GaussianPrior) -> Result<Self, FormulaError> {
        Self::new(vec![basis], prior)
    }

    pub fn bases(&self) -> &[BasisGroup] {
        &self.bases
    }

    pub fn prior(&self) -> &GaussianPrior {
        &self.prior
    }

    pub fn num_groups(&self) -> usize {
        self.bases.len()
    }

    /// Total coefficient count, i.e. the design-matrix column count.
    pub fn dim(&self) -> usize {
        self.prior.dim()
    }

    /// Concatenates two formulas: `self`'s groups come first, and the
    /// priors combine independently (block-diagonal precision). Content is
    /// commutative but column ordering is not.
    pub fn sum(&self, other: &Formula) -> Formula {
        let mut bases = self.bases.clone();
        bases.extend(other.bases.iter().cloned());
        Formula {
            bases,
            prior: self.prior.stack(&other.prior),
        }
    }

    /// Merges all basis groups into one, preserving function order. The
    /// prior is reused unless explicitly overridden (the override must
    /// keep the dimension).
    pub fn flatten(&self, prior: Option<GaussianPrior>) -> Result<Formula, FormulaError> {
        let merged: BasisGroup = self.bases.iter().flatten().cloned().collect();
        let prior = match prior {
            Some(p) if p.dim() != self.dim() => {
                return Err(FormulaError::DimensionMismatch(format!(
                    "override prior has dimension {} but the formula has {}",
                    p.dim(),
                    self.dim()
                )));
            }
            Some(p) => p,
            None => self.prior.clone(),
        };
        Formula::single(merged, prior)
    }

    /// Reweights every basis function pointwise: `f` becomes
    /// `t -> f(t) * weight(t)`. The prior is untouched (this is a
    /// dimension-preserving linear reweighting of the basis).
    ///
    /// Only single-group formulas are supported; multi-group broadcasting
    /// is ambiguous and is rejected rather than silently miscomputed.
    pub fn multiply_pointwise(&self, weight: InputMap) -> Result<Formula, FormulaError> {
        if self.num_groups() != 1 {
            return Err(FormulaError::UnsupportedOperation(format!(
                "pointwise multiplication requires exactly one basis group, found {}",
                self.num_groups()
            )));
        }
        let reweighted: BasisGroup = self.bases[0]
            .iter()
            .map(|f| BasisFn::Weighted {
                inner: Box::new(f.clone()),
                weight: weight.clone(),
            })
            .collect();
        Formula::single(reweighted, self.prior.clone())
    }

    /// Lifts every basis function onto a remapped input domain: `f`
    /// becomes `t -> f(map(t))`, one map per basis group. Dimensionality
    /// is unchanged.
    pub fn remap_inputs(&self, maps: &[InputMap]) -> Result<Formula, FormulaError> {
        if maps.len() != self.num_groups() {
            return Err(FormulaError::ArityMismatch {
                expected: self.num_groups(),
                got: maps.len(),
            });
        }
        let bases = self
            .bases
            .iter()
            .zip(maps)
            .map(|(group, map)| {
                group
                    .iter()
                    .map(|f| BasisFn::Remapped {
                        inner: Box::new(f.clone()),
                        map: map.clone(),
                    })
                    .collect()
            })
            .collect();
        Ok(Formula {
            bases,
            prior: self.prior.clone(),
        })
    }

    /// Tensor (Kronecker) product of two formulas. Non-commutative: the
    /// result holds products `f * g` for every `g` in `b` and `f` in `a`,
    /// with `a`'s functions varying fastest, matching standard
    /// Kronecker-product index ordering. Priors combine as
    /// `(kron(mu_a, mu_b), kron(Lambda_a, Lambda_b))`.
    ///
    /// Both operands' bases are assumed to represent zero-mean random
    /// variables; only then does the Kronecker product of the precisions
    /// describe the product variable. This is deliberately left as a
    /// caller contract.
    pub fn kron(a: &Formula, b: &Formula) -> Formula {
        let a_flat: Vec<&BasisFn> = a.bases.iter().flatten().collect();
        let b_flat: Vec<&BasisFn> = b.bases.iter().flatten().collect();

        let mut basis = BasisGroup::with_capacity(a_flat.len() * b_flat.len());
        for g in &b_flat {
            for f in &a_flat {
                basis.push(BasisFn::Product(
                    Box::new((*f).clone()),
                    Box::new((*g).clone()),
                ));
            }
        }
        Formula {
            bases: vec![basis],
            prior: a.prior.kron(&b.prior),
        }
    }

    /// The `N x D` design matrix over the input data: one submatrix per
    /// basis group, horizontally concatenated in group order. Column `i`
    /// corresponds to coefficient `i` of the prior.
    pub fn design_matrix(&self, input_data: ArrayView1<f64>) -> Matrix {
        if self.bases.is_empty() {
            return Matrix::zeros((input_data.len(), 0));
        }
        let parts = self.group_design_matrices(input_data);
        let views: Vec<_> = parts.iter().map(|m| m.view()).collect();
        concatenate(Axis(1), &views).expect("group submatrices share the row count")
    }

    /// The design submatrix of group `i`, for per-term diagnostics.
    pub fn group_design_matrix(&self, input_data: ArrayView1<f64>, i: usize) -> Matrix {
        design_matrix(input_data, &self.bases[i])
    }

    pub fn group_design_matrices(&self, input_data: ArrayView1<f64>) -> Vec<Matrix> {
        self.bases
            .iter()
            .map(|group| design_matrix(input_data, group))
            .collect()
    }

    /// Materializes the triple handed to the external inference engine.
    pub fn build(&self, input_data: ArrayView1<f64>) -> ModelInputs {
        let (prior_mean, prior_precision) = self.prior.clone().into_parts();
        ModelInputs {
            design: self.design_matrix(input_data),
            prior_mean,
            prior_precision,
        }
    }
}
