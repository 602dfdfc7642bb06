//! Dense linear-algebra helpers for combining priors.

use ndarray::s;

use crate::types::{Matrix, Vector};

/// Stacks two square matrices into a block-diagonal matrix with zero
/// cross-terms. This is how two terms' precisions combine under prior
/// independence.
pub fn block_diag(a: &Matrix, b: &Matrix) -> Matrix {
    let (m, n) = a.dim();
    let (p, q) = b.dim();
    let mut c = Matrix::zeros((m + p, n + q));
    c.slice_mut(s![..m, ..n]).assign(a);
    c.slice_mut(s![m.., n..]).assign(b);
    c
}

pub fn kronecker_product(a: &Matrix, b: &Matrix) -> Matrix {
    // A little bit of linear algebra magic
    let (m, n) = a.dim();
    let (p, q) = b.dim();
    let mut c = Matrix::zeros((m * p, n * q));

    for i in 0..m {
        for j in 0..n {
            let a_scalar = a[[i, j]];
            let mut block = c.slice_mut(s![i * p..(i + 1) * p, j * q..(j + 1) * q]);
            block.assign(&(b * a_scalar));
        }
    }
    c
}

pub fn kronecker_vec(a: &Vector, b: &Vector) -> Vector {
    let mut c = Vector::zeros(a.len() * b.len());
    for (i, &a_i) in a.iter().enumerate() {
        for (j, &b_j) in b.iter().enumerate() {
            c[i * b.len() + j] = a_i * b_j;
        }
    }
    c
}
