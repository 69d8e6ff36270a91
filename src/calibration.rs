use ndarray::Array2;

use crate::math::linalg::spectral_radius_power_iteration;

/// Compute beta to achieve a target R0 on a given topography.
/// R0 = spectral_radius( beta * T / removal_rate ) => beta = R0 * removal_rate / spectral_radius(T)
///
/// `removal_rate` is the rate of leaving I: gamma for SEIR, gamma + digamma for SEIRDS.
pub fn beta_for_r0(topography: &Array2<f64>, removal_rate: f64, r0: f64) -> f64 {
    let rho_t = spectral_radius_power_iteration(topography.view(), 10_000, 1e-10).max(1e-12);
    r0 * removal_rate / rho_t
}
