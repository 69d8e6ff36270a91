use ndarray::{Array1, ArrayView1, ArrayView2, Zip};

/// Row vector times square matrix: `out[j] = sum_i row[i] * m[i, j]`.
///
/// Each output entry is the dot product of `row` with one column of `m`, so the
/// serial and `parallel` builds sum in the same order and agree bit for bit.
pub fn row_times_matrix(row: ArrayView1<f64>, m: ArrayView2<f64>) -> Array1<f64> {
    assert_eq!(row.len(), m.nrows(), "row length must match matrix rows");
    let mut out = Array1::zeros(m.ncols());
    let zip = Zip::from(&mut out).and(m.columns());

    #[cfg(feature = "parallel")]
    zip.par_for_each(|o, col| *o = col.dot(&row));
    #[cfg(not(feature = "parallel"))]
    zip.for_each(|o, col| *o = col.dot(&row));

    out
}

/// Simple power iteration to approximate spectral radius (dominant eigenvalue)
/// of a non-negative square matrix.
pub fn spectral_radius_power_iteration(a: ArrayView2<f64>, max_iter: usize, tol: f64) -> f64 {
    let n = a.nrows();
    assert!(n > 0 && a.ncols() == n, "Matrix must be square");

    let mut x = Array1::from_elem(n, 1.0 / (n as f64));
    let mut lambda_old = 0.0;

    for _ in 0..max_iter {
        let y = a.dot(&x);
        // Rayleigh quotient approx
        let den = x.dot(&x);
        let lambda = if den > 0.0 { y.dot(&x) / den } else { 0.0 };

        let norm = y.dot(&y).sqrt();
        if norm > 0.0 {
            x = y / norm;
        }
        if (lambda - lambda_old).abs() < tol {
            return lambda;
        }
        lambda_old = lambda;
    }
    lambda_old
}

/// Largest `|m[i, j] - m[j, i]|` over the matrix.
pub fn max_asymmetry(m: ArrayView2<f64>) -> f64 {
    assert_eq!(m.nrows(), m.ncols(), "Matrix must be square");
    let mut worst: f64 = 0.0;
    Zip::from(m).and(m.t()).for_each(|a, b| worst = worst.max((a - b).abs()));
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn row_times_matrix_weights_sources_per_destination() {
        let m = array![[1.0, 0.5, 0.0], [0.0, 1.0, 2.0], [0.0, 0.0, 1.0]];
        let row = array![2.0, 1.0, 4.0];
        let out = row_times_matrix(row.view(), m.view());
        assert_eq!(out, array![2.0, 2.0, 6.0]);
    }

    #[test]
    fn spectral_radius_of_identity_is_one() {
        let eye = Array2::<f64>::eye(5);
        let rho = spectral_radius_power_iteration(eye.view(), 100, 1e-12);
        assert!((rho - 1.0).abs() < 1e-12);
    }

    #[test]
    fn asymmetry_of_triangular_matrix() {
        let m = array![[1.0, 3.0], [0.5, 1.0]];
        assert_eq!(max_asymmetry(m.view()), 2.5);
    }
}
