use gridepi::math::linalg::row_times_matrix;
use gridepi::topography::{
    exponential_topography, fast_exponential_topography, identity_topography, is_symmetric,
    nearest_neighbour_topography, stratified_topography,
};
use ndarray::{array, Array1, Array2};

#[test]
fn nearest_neighbour_spreads_sources_to_adjacent_cells() {
    let topography = nearest_neighbour_topography((4, 4), 1.0, 0.1);

    let mut src = Array2::<f64>::zeros((4, 4));
    src[[0, 1]] = 3.0;
    src[[2, 2]] = 2.0;
    let flat: Array1<f64> = src.iter().copied().collect();
    let dest = row_times_matrix(flat.view(), topography.view());

    let expected = array![
        [0.3, 3.0, 0.3, 0.0],
        [0.3, 0.5, 0.5, 0.2],
        [0.0, 0.2, 2.0, 0.2],
        [0.0, 0.2, 0.2, 0.2],
    ];
    for (k, want) in expected.iter().enumerate() {
        assert!((dest[k] - want).abs() < 1e-12, "cell {}: {} vs {}", k, dest[k], want);
    }
}

#[test]
fn nearest_neighbour_counts_in_bounds_neighbours() {
    let t = nearest_neighbour_topography((3, 4), 1.0, 0.1);
    assert_eq!(t.dim(), (12, 12));
    // corner, edge and interior cells have 3, 5 and 8 neighbours
    let neighbours = |i: usize| t.column(i).iter().filter(|v| **v == 0.1).count();
    assert_eq!(neighbours(0), 3);
    assert_eq!(neighbours(1), 5);
    assert_eq!(neighbours(5), 8);
    assert!((0..12).all(|i| t[[i, i]] == 1.0));
    assert!(is_symmetric(&t, 0.0));
}

#[test]
fn exponential_decays_with_euclidean_distance() {
    let t = exponential_topography((3, 4), 2.0, 0.5);
    assert_eq!(t.dim(), (12, 12));
    assert_eq!(t[[0, 0]], 2.0);
    assert_eq!(t[[0, 1]], 2.0 * (-0.5f64).exp());
    // (0,0) to (1,1)
    assert_eq!(t[[0, 5]], 2.0 * (-(2.0f64).sqrt() * 0.5).exp());
    // (0,3) to (1,0) are flat neighbours but three columns apart
    assert_eq!(t[[3, 4]], 2.0 * (-(10.0f64).sqrt() * 0.5).exp());
}

#[test]
fn exponential_variants_are_exactly_symmetric() {
    for shape in [(1, 1), (1, 5), (5, 1), (3, 4), (4, 3), (6, 6)] {
        let direct = exponential_topography(shape, 1.0, 0.7);
        let fast = fast_exponential_topography(shape, 1.0, 0.7);
        assert!(direct == direct.t(), "direct {:?}", shape);
        assert!(fast == fast.t(), "fast {:?}", shape);
    }
}

#[test]
fn fast_exponential_matches_direct() {
    for shape in [(1, 1), (1, 7), (7, 1), (3, 4), (4, 3), (5, 5)] {
        for (c, d) in [(1.0, 0.0), (1.0, 1.0), (0.3, 2.5), (4.0, 0.1)] {
            let direct = exponential_topography(shape, c, d);
            let fast = fast_exponential_topography(shape, c, d);
            let worst = (&direct - &fast).iter().fold(0.0f64, |m, v| m.max(v.abs()));
            assert!(worst <= 1e-9, "shape {:?} c {} d {}: {}", shape, c, d, worst);
        }
    }
}

#[test]
fn stratified_weakens_along_the_index_gradient() {
    let t = stratified_topography((3, 4), 2.0, 0.5, 0.2);
    assert_eq!(t.dim(), (12, 12));
    assert_eq!(t[[0, 0]], 2.0);

    // same index distance, larger average index => weaker coupling
    for k in 0..11 {
        assert!(t[[k, k]] > t[[k + 1, k + 1]]);
        if k + 2 < 12 {
            assert!(t[[k, k + 1]] > t[[k + 1, k + 2]]);
        }
    }
    // only the average and distance of the two indices enter the weight
    assert!(is_symmetric(&t, 0.0));
}

#[test]
fn stratified_without_coupling_decay_is_translation_invariant() {
    let t = stratified_topography((2, 3), 1.0, 0.4, 0.0);
    assert_eq!(t[[0, 2]], t[[3, 5]]);
    assert_eq!(t[[1, 1]], 1.0);
}

#[test]
fn identity_is_eye() {
    let t = identity_topography((2, 3));
    assert_eq!(t, Array2::<f64>::eye(6));
}
