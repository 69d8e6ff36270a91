//! Coupling matrices ("topographies") over a row-major linearized grid.
//!
//! Every builder returns a dense, non-negative `cells x cells` matrix where
//! `T[src, dst]` is the weight of infectious pressure at `src` on exposure at
//! `dst`. Matrices are never mutated by the model, so one instance can drive
//! any number of models over the same grid shape.

use ndarray::Array2;

use crate::grid::GridShape;
use crate::math::linalg::max_asymmetry;

pub mod exponential;
pub mod neighbour;
pub mod stratified;

pub use exponential::{exponential_topography, fast_exponential_topography};
pub use neighbour::nearest_neighbour_topography;
pub use stratified::stratified_topography;

/// Each cell couples only to itself; reduces the grid to independent cells.
pub fn identity_topography(shape: impl Into<GridShape>) -> Array2<f64> {
    Array2::eye(shape.into().cells())
}

pub fn is_symmetric(m: &Array2<f64>, tolerance: f64) -> bool {
    m.is_square() && max_asymmetry(m.view()) <= tolerance
}
