use ndarray::{Array1, Array2};

// ----- Mnemonics because the ndarray names stink
pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

/// Everything the downstream inference engine needs from one formula:
/// the design matrix over the observed inputs plus the joint Gaussian
/// prior over the coefficients. Column `i` of `design` corresponds to
/// coefficient `i` of the prior.
#[derive(Debug, Clone)]
pub struct ModelInputs {
    pub design: Matrix,
    pub prior_mean: Vector,
    pub prior_precision: Matrix,
}
