//! Clamped B-spline bases on a grid.
//!
//! Knot vector is the grid with both endpoints repeated to multiplicity
//! `order`, giving `grid.len() + order - 2` elements evaluated by
//! Cox-de Boor over their own knot window. With extrapolation on, the two
//! boundary-touching elements extend past the grid on their own side; a
//! one-sided step factor zeroes them past the far edge of their support,
//! so only they take part in extrapolation.

use ndarray::ArrayView1;

use crate::error::FormulaError;

/// Where a basis element sits relative to the grid boundaries. Boundary
/// elements carry the extrapolation and damping behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Interior,
    Right,
}

/// One clamped B-spline basis element over a window of `order + 1` knots.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineElement {
    knots: Vec<f64>,
    order: usize,
    side: Side,
    extrapolate: bool,
}

impl SplineElement {
    /// Degree-`order - 1` polynomial pieces live on the spans
    /// `[knots[s], knots[s + 1])` for `s` in `0..order`.
    fn first_nonempty_span(&self) -> usize {
        (0..self.order)
            .find(|&s| self.knots[s + 1] > self.knots[s])
            .unwrap_or(0)
    }

    fn last_nonempty_span(&self) -> usize {
        (0..self.order)
            .rev()
            .find(|&s| self.knots[s + 1] > self.knots[s])
            .unwrap_or(self.order - 1)
    }

    fn find_span(&self, t: f64) -> usize {
        let last = self.last_nonempty_span();
        if t >= self.knots[last] {
            return last;
        }
        (0..self.order)
            .find(|&s| self.knots[s] <= t && t < self.knots[s + 1])
            .unwrap_or(last)
    }

    /// Cox-de Boor recursion with the base case pinned to one span: the
    /// result is the polynomial of piece `span` evaluated at `t`, which is
    /// what makes one-sided extrapolation beyond the window possible.
    fn piece(&self, i: usize, degree: usize, span: usize, t: f64) -> f64 {
        if degree == 0 {
            return if i == span { 1.0 } else { 0.0 };
        }
        let mut value = 0.0;
        let den_left = self.knots[i + degree] - self.knots[i];
        if den_left > 0.0 {
            value += (t - self.knots[i]) / den_left * self.piece(i, degree - 1, span, t);
        }
        let den_right = self.knots[i + degree + 1] - self.knots[i + 1];
        if den_right > 0.0 {
            value += (self.knots[i + degree + 1] - t) / den_right
                * self.piece(i + 1, degree - 1, span, t);
        }
        value
    }

    pub fn eval(&self, t: f64) -> f64 {
        let degree = self.order - 1;
        let lo = self.knots[0];
        let hi = self.knots[self.order];

        let value = if t < lo {
            if self.side == Side::Left && self.extrapolate {
                // continue the boundary polynomial piece leftwards
                self.piece(0, degree, self.first_nonempty_span(), t)
            } else {
                // interior elements vanish here; the rightmost one is
                // step-damped to zero on this side
                0.0
            }
        } else if t > hi {
            if self.side == Side::Right && self.extrapolate {
                self.piece(0, degree, self.last_nonempty_span(), t)
            } else {
                0.0
            }
        } else if t == hi && self.side != Side::Right {
            // half-open support; only the terminal element owns the
            // closed right end, keeping the basis a partition of unity
            0.0
        } else {
            self.piece(0, degree, self.find_span(t), t)
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

fn validate_grid(grid: ArrayView1<f64>, order: usize) -> Result<(), FormulaError> {
    if order < 1 {
        return Err(FormulaError::InvalidParameter {
            name: "order",
            value: order as f64,
        });
    }
    if grid.len() < 2 {
        return Err(FormulaError::DimensionMismatch(format!(
            "spline grid needs at least 2 points, got {}",
            grid.len()
        )));
    }
    if let Some(w) = grid.windows(2).into_iter().find(|w| w[1] <= w[0]) {
        // grid must be strictly increasing
        return Err(FormulaError::InvalidParameter {
            name: "grid",
            value: w[1],
        });
    }
    Ok(())
}

/// Clamped knot vector: the grid with both endpoints repeated to
/// multiplicity `order`.
fn extended_knots(grid: ArrayView1<f64>, order: usize) -> Vec<f64> {
    let mut knots = Vec::with_capacity(grid.len() + 2 * (order - 1));
    knots.extend(std::iter::repeat(grid[0]).take(order - 1));
    knots.extend(grid.iter().copied());
    knots.extend(std::iter::repeat(grid[grid.len() - 1]).take(order - 1));
    knots
}

/// Builds the full B-spline basis over `grid`, of size
/// `grid.len() + order - 2`, ordered left to right.
pub fn bspline_basis(
    grid: ArrayView1<f64>,
    order: usize,
    extrapolate: bool,
) -> Result<Vec<SplineElement>, FormulaError> {
    validate_grid(grid, order)?;
    let knots = extended_knots(grid, order);
    let n_elements = knots.len() - order;

    let elements = (0..n_elements)
        .map(|i| {
            let side = if i == 0 {
                Side::Left
            } else if i == n_elements - 1 {
                Side::Right
            } else {
                Side::Interior
            };
            SplineElement {
                knots: knots[i..=i + order].to_vec(),
                order,
                side,
                extrapolate,
            }
        })
        .collect();
    Ok(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array1;

    fn grid(n: usize) -> Array1<f64> {
        Array1::from_iter((0..n).map(|i| i as f64))
    }

    fn basis_sum(basis: &[SplineElement], t: f64) -> f64 {
        basis.iter().map(|b| b.eval(t)).sum()
    }

    #[test]
    fn test_basis_size() {
        for order in 1..=4 {
            for n in 4..=8 {
                let basis = bspline_basis(grid(n).view(), order, true).unwrap();
                assert_eq!(basis.len(), n + order - 2);
            }
        }
    }

    #[test]
    fn test_partition_of_unity_on_grid() {
        for order in 2..=4 {
            let g = grid(7);
            let basis = bspline_basis(g.view(), order, true).unwrap();
            for &t in g.iter() {
                assert_abs_diff_eq!(basis_sum(&basis, t), 1.0, epsilon = 1e-10);
            }
            // and between knots
            for t in [0.5, 1.3, 3.7, 5.9] {
                assert_abs_diff_eq!(basis_sum(&basis, t), 1.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_only_boundary_elements_extrapolate() {
        let basis = bspline_basis(grid(6).view(), 4, true).unwrap();
        let n = basis.len();

        // left of the grid only the leftmost element survives
        for (i, b) in basis.iter().enumerate() {
            let v = b.eval(-0.5);
            if i == 0 {
                assert!(v > 0.0);
            } else {
                assert_abs_diff_eq!(v, 0.0);
            }
        }
        // right of the grid only the rightmost element survives
        for (i, b) in basis.iter().enumerate() {
            let v = b.eval(5.5);
            if i == n - 1 {
                assert!(v > 0.0);
            } else {
                assert_abs_diff_eq!(v, 0.0);
            }
        }
    }

    #[test]
    fn test_no_extrapolation_outside_grid() {
        let basis = bspline_basis(grid(6).view(), 4, false).unwrap();
        assert_abs_diff_eq!(basis_sum(&basis, -0.5), 0.0);
        assert_abs_diff_eq!(basis_sum(&basis, 5.5), 0.0);
        // inside, the flag changes nothing
        assert_abs_diff_eq!(basis_sum(&basis, 2.5), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_extrapolation_is_continuous_at_boundaries() {
        let basis = bspline_basis(grid(6).view(), 4, true).unwrap();
        let left = &basis[0];
        assert_abs_diff_eq!(left.eval(-1e-9), left.eval(0.0), epsilon = 1e-6);
        let right = &basis[basis.len() - 1];
        assert_abs_diff_eq!(right.eval(5.0 + 1e-9), right.eval(5.0), epsilon = 1e-6);
    }

    #[test]
    fn test_clamped_endpoints() {
        let basis = bspline_basis(grid(5).view(), 3, true).unwrap();
        // with clamped knots the boundary elements hit exactly 1 at the ends
        assert_abs_diff_eq!(basis[0].eval(0.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(basis[basis.len() - 1].eval(4.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_order_one_is_piecewise_constant() {
        let basis = bspline_basis(grid(4).view(), 1, true).unwrap();
        assert_eq!(basis.len(), 3);
        assert_abs_diff_eq!(basis[1].eval(1.5), 1.0);
        assert_abs_diff_eq!(basis[1].eval(2.5), 0.0);
    }

    #[test]
    fn test_bad_inputs_rejected() {
        assert!(matches!(
            bspline_basis(grid(5).view(), 0, true),
            Err(FormulaError::InvalidParameter { name: "order", .. })
        ));
        assert!(matches!(
            bspline_basis(Array1::from_vec(vec![0.0]).view(), 3, true),
            Err(FormulaError::DimensionMismatch(_))
        ));
        // a non-increasing grid is a malformed parameter, not a shape issue
        assert!(matches!(
            bspline_basis(Array1::from_vec(vec![0.0, 1.0, 1.0]).view(), 3, true),
            Err(FormulaError::InvalidParameter { name: "grid", .. })
        ));
    }
}
