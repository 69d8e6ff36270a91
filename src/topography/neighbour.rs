use ndarray::Array2;

use crate::grid::GridShape;

const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Each cell affects itself with `self_coupling` and each of its (up to) eight
/// grid-adjacent cells with a uniform `neighbour_coupling`.
pub fn nearest_neighbour_topography(
    shape: impl Into<GridShape>,
    self_coupling: f64,
    neighbour_coupling: f64,
) -> Array2<f64> {
    let shape = shape.into();
    let size = shape.cells();
    let mut t = Array2::zeros((size, size));

    for i in 0..size {
        t[[i, i]] = self_coupling;
        let (row, col) = shape.coords(i);
        for (dr, dc) in NEIGHBOUR_OFFSETS {
            if let Some(src) = shape.offset(row, col, dr, dc) {
                t[[src, i]] = neighbour_coupling;
            }
        }
    }
    t
}
