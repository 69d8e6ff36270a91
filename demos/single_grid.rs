use gridepi::calibration::beta_for_r0;
use gridepi::topography::nearest_neighbour_topography;
use gridepi::{GridModel, ModelVariant, Rates};
use ndarray::Array2;

fn main() -> anyhow::Result<()> {
    // Toy 10x10 grid, density falling off away from the top-left corner.
    let populations = Array2::from_shape_fn((10, 10), |(r, c)| 1_000.0 / (1.0 + (r + c) as f64));

    let topography = nearest_neighbour_topography((10, 10), 1.0, 0.1);

    let sigma = 52.0; // about one week exposed
    let gamma = 26.0; // about two weeks infected
    let digamma = 0.26; // about 1% of infections die
    let rho = 1.0; // about one year of immunity

    let mut rates = Rates::seirds(0.0, sigma, gamma, digamma, rho);
    rates.beta = beta_for_r0(&topography, rates.removal_rate(ModelVariant::Seirds), 3.0);
    rates.check()?;

    let mut model = GridModel::from_rates(&populations, ModelVariant::Seirds, &rates);
    model.infect_one((0, 0));

    // Two years of daily steps
    let series = model.run(2 * 365, 1.0 / 365.0, &topography);

    // Print weekly summary (every 7 steps)
    println!("day,total_S,total_E,total_I,total_R,total_D");
    for (idx, (_, totals)) in series.iter().enumerate() {
        if idx % 7 != 0 {
            continue;
        }
        println!(
            "{},{:.0},{:.0},{:.0},{:.0},{:.0}",
            idx, totals.susceptible, totals.exposed, totals.infected, totals.resistant, totals.dead
        );
    }

    model.check_invariants(1e-6)?;
    Ok(())
}
