use ndarray::Array2;

use crate::grid::GridShape;

/// `coupling_multiplier * exp(-|i - j| * distance_decay - (i + j) / 2 * coupling_decay)`
/// over flat cell indices.
///
/// Pairs at the same index distance couple more weakly the further along the
/// linearized grid they sit, modelling a population whose contact density
/// falls off with index.
pub fn stratified_topography(
    shape: impl Into<GridShape>,
    coupling_multiplier: f64,
    distance_decay: f64,
    coupling_decay: f64,
) -> Array2<f64> {
    let size = shape.into().cells();
    Array2::from_shape_fn((size, size), |(i, j)| {
        let average = (i + j) as f64 / 2.0;
        let distance = i.abs_diff(j) as f64;
        coupling_multiplier * (-distance * distance_decay - average * coupling_decay).exp()
    })
}
