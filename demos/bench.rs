use std::time::Instant;

use gridepi::topography::{exponential_topography, fast_exponential_topography};
use gridepi::GridModel;
use ndarray::Array2;

fn main() -> anyhow::Result<()> {
    // Large enough grid for the pairwise exp/sqrt cost to show
    let shape = (30, 30);

    let t_start = Instant::now();
    let direct = exponential_topography(shape, 1.0, 1.5);
    let dur1 = t_start.elapsed();

    let t_start2 = Instant::now();
    let fast = fast_exponential_topography(shape, 1.0, 1.5);
    let dur2 = t_start2.elapsed();

    anyhow::ensure!(direct == fast, "fast exponential topography diverged from direct");

    println!("direct_ms,fast_ms,speedup_x");
    let d_ms = dur1.as_secs_f64() * 1000.0;
    let f_ms = dur2.as_secs_f64() * 1000.0;
    println!("{:.3},{:.3},{:.2}", d_ms, f_ms, d_ms.max(1e-9) / f_ms.max(1e-9));

    // One simulated year on the same grid
    let populations = Array2::from_elem(shape, 100.0);
    let mut model = GridModel::seirds(&populations, 78.0, 52.0, 26.0, 0.26, 1.0);
    model.infect_one((0, 0));

    let t_start3 = Instant::now();
    for _ in 0..365 {
        model.timestep(1.0 / 365.0, &fast);
    }
    let step_ms = t_start3.elapsed().as_secs_f64() * 1000.0 / 365.0;
    println!("timestep_ms");
    println!("{:.3}", step_ms);

    Ok(())
}
