use anyhow::Context;

use crate::model::Totals;

/// Write a `(t, totals)` trajectory as `t,S,E,I,R,D` CSV with six decimals.
pub fn write_series_csv<W: std::io::Write>(writer: W, series: &[(f64, Totals)]) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["t", "S", "E", "I", "R", "D"])?;
    for (t, totals) in series {
        w.write_record([
            format!("{:.6}", t),
            format!("{:.6}", totals.susceptible),
            format!("{:.6}", totals.exposed),
            format!("{:.6}", totals.infected),
            format!("{:.6}", totals.resistant),
            format!("{:.6}", totals.dead),
        ])?;
    }
    w.flush().context("flush series CSV failed")?;
    Ok(())
}

pub fn write_series_csv_file(
    path: impl AsRef<std::path::Path>,
    series: &[(f64, Totals)],
) -> anyhow::Result<std::path::PathBuf> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).context("create series output dir failed")?;
    }
    let f = std::fs::File::create(path)
        .with_context(|| format!("create series file failed (path={:?})", path))?;
    write_series_csv(f, series)?;
    Ok(path.to_path_buf())
}
