use ndarray::{s, Array2};

use crate::grid::GridShape;

/// Coupling between two cells `dr` rows and `dc` columns apart.
fn coupling(self_coupling: f64, decay: f64, dr: isize, dc: isize) -> f64 {
    let distance = ((dr * dr + dc * dc) as f64).sqrt();
    self_coupling * (-distance * decay).exp()
}

/// `T[j, i] = self_coupling * exp(-distance(i, j) * decay)` for every pair,
/// with Euclidean distance measured in grid cells.
pub fn exponential_topography(shape: impl Into<GridShape>, self_coupling: f64, decay: f64) -> Array2<f64> {
    let shape = shape.into();
    let size = shape.cells();
    Array2::from_shape_fn((size, size), |(j, i)| {
        let (rj, cj) = shape.coords(j);
        let (ri, ci) = shape.coords(i);
        coupling(
            self_coupling,
            decay,
            rj as isize - ri as isize,
            cj as isize - ci as isize,
        )
    })
}

/// Same matrix as [`exponential_topography`], built from a template of
/// couplings indexed by pure offset instead of evaluating `exp`/`sqrt` per pair.
///
/// The template covers row offsets `0..rows` and column offsets
/// `-(cols - 1)..cols`. Every source row copies template slices into the row
/// blocks at or below its own grid row; the blocks above it are then mirrored
/// from the transpose, so the result is bitwise equal to the direct builder for
/// any coupling and decay, negative or NaN included.
pub fn fast_exponential_topography(
    shape: impl Into<GridShape>,
    self_coupling: f64,
    decay: f64,
) -> Array2<f64> {
    let shape = shape.into();
    let (rows, cols) = shape.dim();
    let size = shape.cells();
    let mut t = Array2::zeros((size, size));
    if size == 0 {
        return t;
    }

    let centre = cols as isize - 1;
    let template = Array2::from_shape_fn((rows, 2 * cols - 1), |(dr, k)| {
        coupling(self_coupling, decay, dr as isize, k as isize - centre)
    });

    for i in 0..size {
        let (ri, ci) = shape.coords(i);
        // template column of destination column cj is start + cj
        let start = cols - 1 - ci;
        for rj in ri..rows {
            t.slice_mut(s![i, rj * cols..(rj + 1) * cols])
                .assign(&template.slice(s![rj - ri, start..start + cols]));
        }
    }

    mirror_upper_blocks(&mut t, shape);
    t
}

/// Fill row `i`'s blocks above its own grid row from column `i`, which the
/// template pass already wrote.
fn mirror_upper_blocks(t: &mut Array2<f64>, shape: GridShape) {
    let cols = shape.cols;
    for i in 0..shape.cells() {
        let (ri, _) = shape.coords(i);
        if ri == 0 {
            continue;
        }
        let block = 0..ri * cols;
        let mirrored = t.slice(s![block.clone(), i]).to_owned();
        t.slice_mut(s![i, block]).assign(&mirrored);
    }
}
