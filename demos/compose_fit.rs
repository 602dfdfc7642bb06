use gam_formula::{terms, FormulaError, GaussianPrior, MeanBasis};
use ndarray::{array, Array1};
use rand::Rng;

fn main() -> Result<(), FormulaError> {
    // Generate synthetic observations
    let mut rng = rand::rng();
    let n = 200;
    let data: Array1<f64> =
        Array1::from_iter((0..n).map(|i| i as f64 * 0.1 + rng.random_range(-0.02..0.02)));

    // A smooth long-range trend with a linear mean basis in front
    let grid = Array1::linspace(-2.0, 22.0, 40);
    let mean = MeanBasis::new(
        vec![gam_formula::BasisFn::Identity],
        GaussianPrior::new(array![0.0], array![[1e-6]])?,
    )?;
    let trend = terms::exp_squared_1d(grid.view(), 5.0, 1.0, 0.99, Some(mean))?;

    // A periodic component
    let seasonal = terms::exp_sine_squared_1d(grid.view(), 1.0, 0.5, 5.0, 0.99, None)?;

    // An intercept
    let intercept = terms::scalar(GaussianPrior::new(array![0.0], array![[1e-6]])?)?;

    // Compose the additive model
    let model = trend.sum(&seasonal).sum(&intercept);
    println!("Composed model with {} terms, dimension {}", model.num_groups(), model.dim());

    // Build the artifacts the inference engine consumes
    let inputs = model.build(data.view());
    println!("Design matrix: {} x {}", inputs.design.nrows(), inputs.design.ncols());
    println!("Prior mean length: {}", inputs.prior_mean.len());
    println!(
        "Prior precision: {} x {}",
        inputs.prior_precision.nrows(),
        inputs.prior_precision.ncols()
    );

    // Per-term submatrices for diagnostics
    for (i, x_i) in model.group_design_matrices(data.view()).iter().enumerate() {
        println!("Term {} contributes {} columns", i, x_i.ncols());
    }

    Ok(())
}
