use gridepi::topography::{
    exponential_topography, fast_exponential_topography, nearest_neighbour_topography,
    stratified_topography,
};
use gridepi::GridModel;
use ndarray::Array2;
use proptest::prelude::*;

const ONE_DAY: f64 = 1.0 / 365.0;

fn population_grid() -> impl Strategy<Value = Array2<f64>> {
    (1usize..5, 1usize..5).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(1.0f64..1000.0, rows * cols)
            .prop_map(move |v| Array2::from_shape_vec((rows, cols), v).expect("shape"))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn fast_exponential_equals_direct(
        rows in 1usize..7,
        cols in 1usize..7,
        c in -3.0f64..3.0,
        d in -1.0f64..3.0,
    ) {
        let direct = exponential_topography((rows, cols), c, d);
        let fast = fast_exponential_topography((rows, cols), c, d);
        prop_assert_eq!(&direct, &fast);
        prop_assert!(fast == fast.t());
    }

    #[test]
    fn seirds_conserves_population(
        pop in population_grid(),
        seed_frac in 0.0f64..1.0,
        beta in 0.0f64..20.0,
        sigma in 0.0f64..52.0,
        gamma in 0.0f64..26.0,
        digamma in 0.0f64..1.0,
        rho in 0.0f64..2.0,
        neighbour in 0.0f64..0.5,
    ) {
        let (rows, cols) = pop.dim();
        let topography = nearest_neighbour_topography((rows, cols), 1.0, neighbour);
        let initial: f64 = pop.sum();

        let mut model = GridModel::seirds(&pop, beta, sigma, gamma, digamma, rho);
        model.infect((rows - 1, 0), seed_frac * pop[[rows - 1, 0]]);
        for _ in 0..50 {
            model.timestep(ONE_DAY, &topography);
            let total = model.totals().total();
            prop_assert!((total - initial).abs() <= 1e-9 * initial, "{} vs {}", total, initial);
        }
    }

    #[test]
    fn seir_conserves_population_on_stratified_grid(
        pop in population_grid(),
        beta in 0.0f64..20.0,
        sigma in 0.0f64..52.0,
        gamma in 0.0f64..26.0,
    ) {
        let (rows, cols) = pop.dim();
        let topography = stratified_topography((rows, cols), 0.2, 0.5, 0.1);
        let initial: f64 = pop.sum();

        let mut model = GridModel::seir(&pop, beta, sigma, gamma);
        model.infect((0, cols - 1), 0.5);
        let series = model.run(50, ONE_DAY, &topography);
        for (_, totals) in series {
            prop_assert!((totals.total() - initial).abs() <= 1e-9 * initial);
        }
    }
}
