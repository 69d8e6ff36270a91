use anyhow::Context;
use ndarray::Array2;

/// Load a population grid from CSV, one grid row per record. Non-numeric
/// fields (row labels) are skipped; every row must hold the same number of
/// numeric cells.
pub fn load_population_grid_csv(path: impl AsRef<std::path::Path>) -> anyhow::Result<Array2<f64>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open population CSV: {}", path.display()))?;

    let mut values: Vec<f64> = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0;
    for (line, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("bad CSV record at line {}", line + 1))?;
        let row_vals: Vec<f64> = record
            .iter()
            .filter_map(|field| field.trim().parse::<f64>().ok())
            .collect();
        if row_vals.is_empty() {
            continue;
        }
        match cols {
            None => cols = Some(row_vals.len()),
            Some(n) => anyhow::ensure!(
                row_vals.len() == n,
                "population row {} has {} cells, expected {}",
                rows + 1,
                row_vals.len(),
                n
            ),
        }
        values.extend(row_vals);
        rows += 1;
    }

    let cols = cols.context("population grid empty or unparsable")?;
    Array2::from_shape_vec((rows, cols), values).context("population grid shape")
}
