use gridepi::io::series::write_series_csv;
use gridepi::topography::identity_topography;
use gridepi::GridModel;
use ndarray::Array2;

#[test]
fn series_csv_snapshot_seeded_decay() {
    // No transmission and no incubation: the seed just recovers at rate 1.
    let populations = Array2::from_elem((2, 2), 100.0);
    let mut model = GridModel::seir(&populations, 0.0, 0.0, 1.0);
    model.infect_one((0, 0));

    let series = model.run(3, 0.5, &identity_topography((2, 2)));

    let mut buf = Vec::new();
    write_series_csv(&mut buf, &series).expect("write series");
    let csv = String::from_utf8(buf).expect("utf8");
    insta::assert_snapshot!(csv);
}
