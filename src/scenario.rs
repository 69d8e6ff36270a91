use std::path::{Path, PathBuf};

use anyhow::Context;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::grid::GridShape;
use crate::io::population::load_population_grid_csv;
use crate::model::{GridModel, ModelVariant, Rates, Totals};
use crate::topography::{
    exponential_topography, fast_exponential_topography, identity_topography,
    nearest_neighbour_topography, stratified_topography,
};

pub const ONE_DAY: f64 = 1.0 / 365.0;

/// Which coupling matrix to build for a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopographySpec {
    Identity,
    NearestNeighbour {
        self_coupling: f64,
        neighbour_coupling: f64,
    },
    Exponential {
        self_coupling: f64,
        decay: f64,
    },
    FastExponential {
        self_coupling: f64,
        decay: f64,
    },
    Stratified {
        coupling_multiplier: f64,
        distance_decay: f64,
        coupling_decay: f64,
    },
}

impl TopographySpec {
    /// Every parameter must be finite and `>= 0`. The builders themselves
    /// accept anything.
    pub fn check(&self) -> anyhow::Result<()> {
        let params: Vec<(&str, f64)> = match self {
            TopographySpec::Identity => vec![],
            TopographySpec::NearestNeighbour { self_coupling, neighbour_coupling } => vec![
                ("self_coupling", *self_coupling),
                ("neighbour_coupling", *neighbour_coupling),
            ],
            TopographySpec::Exponential { self_coupling, decay }
            | TopographySpec::FastExponential { self_coupling, decay } => {
                vec![("self_coupling", *self_coupling), ("decay", *decay)]
            }
            TopographySpec::Stratified { coupling_multiplier, distance_decay, coupling_decay } => vec![
                ("coupling_multiplier", *coupling_multiplier),
                ("distance_decay", *distance_decay),
                ("coupling_decay", *coupling_decay),
            ],
        };
        for (name, value) in params {
            anyhow::ensure!(
                value.is_finite() && value >= 0.0,
                "topography {} must be finite and >= 0 (got {})",
                name,
                value
            );
        }
        Ok(())
    }

    pub fn build(&self, shape: GridShape) -> Array2<f64> {
        match *self {
            TopographySpec::Identity => identity_topography(shape),
            TopographySpec::NearestNeighbour { self_coupling, neighbour_coupling } => {
                nearest_neighbour_topography(shape, self_coupling, neighbour_coupling)
            }
            TopographySpec::Exponential { self_coupling, decay } => {
                exponential_topography(shape, self_coupling, decay)
            }
            TopographySpec::FastExponential { self_coupling, decay } => {
                fast_exponential_topography(shape, self_coupling, decay)
            }
            TopographySpec::Stratified { coupling_multiplier, distance_decay, coupling_decay } => {
                stratified_topography(shape, coupling_multiplier, distance_decay, coupling_decay)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub row: usize,
    pub col: usize,
    #[serde(default = "default_seed_amount")]
    pub amount: f64,
}

fn default_seed_amount() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub rows: usize,
    pub cols: usize,

    // Population: a CSV grid if given, otherwise uniform per cell
    #[serde(default)]
    pub population_csv: Option<PathBuf>,
    #[serde(default = "default_population_per_cell")]
    pub population_per_cell: f64,

    pub variant: ModelVariant,
    pub rates: Rates,
    pub topography: TopographySpec,
    pub seeds: Vec<Seed>,

    #[serde(default = "default_dt")]
    pub dt: f64,
    pub steps: usize,
}

fn default_population_per_cell() -> f64 {
    100.0
}

fn default_dt() -> f64 {
    ONE_DAY
}

impl Default for ScenarioConfig {
    /// Twelve cells of 100 people, one seeded infection, one year of daily
    /// SEIRDS steps over a nearest-neighbour topography.
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 4,
            population_csv: None,
            population_per_cell: default_population_per_cell(),
            variant: ModelVariant::Seirds,
            rates: Rates::seirds(
                3.0 * 26.0, // three infections over a two week infectious period
                52.0,       // about one week exposed
                26.0,       // about two weeks infected
                0.26,       // about 1% of infections die
                1.0,        // about one year of immunity
            ),
            topography: TopographySpec::NearestNeighbour {
                self_coupling: 1.0,
                neighbour_coupling: 0.1,
            },
            seeds: vec![Seed { row: 0, col: 0, amount: 1.0 }],
            dt: ONE_DAY,
            steps: 365,
        }
    }
}

impl ScenarioConfig {
    pub fn load_json(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }

    /// Validation for driver input. The model itself accepts anything; this is
    /// where zero populations and out-of-grid seeds get rejected.
    pub fn check(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.rows >= 1 && self.cols >= 1, "grid must have at least one cell");
        anyhow::ensure!(self.dt.is_finite() && self.dt > 0.0, "dt must be > 0 (got {})", self.dt);
        self.rates.check()?;
        self.topography.check()?;
        if self.population_csv.is_none() {
            anyhow::ensure!(
                self.population_per_cell.is_finite() && self.population_per_cell > 0.0,
                "population_per_cell must be > 0 (got {})",
                self.population_per_cell
            );
        }
        for seed in &self.seeds {
            anyhow::ensure!(
                self.shape().contains(seed.row, seed.col),
                "seed ({}, {}) outside {}x{} grid",
                seed.row,
                seed.col,
                self.rows,
                self.cols
            );
            anyhow::ensure!(seed.amount >= 0.0, "seed amount must be >= 0 (got {})", seed.amount);
        }
        Ok(())
    }

    pub fn population(&self) -> anyhow::Result<Array2<f64>> {
        let Some(path) = &self.population_csv else {
            return Ok(Array2::from_elem(self.shape().dim(), self.population_per_cell));
        };
        let pop = load_population_grid_csv(path)?;
        anyhow::ensure!(
            pop.dim() == self.shape().dim(),
            "population grid is {:?}, scenario expects {}x{}",
            pop.dim(),
            self.rows,
            self.cols
        );
        anyhow::ensure!(
            pop.iter().all(|n| n.is_finite() && *n > 0.0),
            "population grid must be positive in every cell"
        );
        Ok(pop)
    }

    /// Fresh model with every seed applied.
    pub fn build_model(&self, population: &Array2<f64>) -> GridModel {
        let mut model = GridModel::from_rates(population, self.variant, &self.rates);
        for seed in &self.seeds {
            model.infect((seed.row, seed.col), seed.amount);
        }
        model
    }
}

pub struct ScenarioRun {
    pub model: GridModel,
    pub series: Vec<(f64, Totals)>,
}

pub fn run_scenario(cfg: &ScenarioConfig) -> anyhow::Result<ScenarioRun> {
    cfg.check()?;
    let population = cfg.population()?;
    let topography = cfg.topography.build(cfg.shape());
    debug!(cells = cfg.shape().cells(), topography = ?cfg.topography, "built topography");

    let mut model = cfg.build_model(&population);
    let series = model.run(cfg.steps, cfg.dt, &topography);
    info!(
        steps = cfg.steps,
        dead = model.number_dead(),
        infected = model.totals().infected,
        "scenario finished"
    );
    Ok(ScenarioRun { model, series })
}

/// `from, from + step, ...` up to but excluding `to`.
pub fn beta_range(from: f64, to: f64, step: f64) -> anyhow::Result<Vec<f64>> {
    anyhow::ensure!(
        from.is_finite() && to.is_finite() && step.is_finite() && step > 0.0,
        "beta range needs finite bounds and step > 0 (got {}..{} by {})",
        from,
        to,
        step
    );
    let count = ((to - from) / step).ceil().max(0.0) as usize;
    Ok((0..count).map(|k| from + k as f64 * step).collect())
}

/// Steps of size `dt` covering `years`, rounded to the nearest step.
pub fn steps_for_years(years: f64, dt: f64) -> anyhow::Result<usize> {
    anyhow::ensure!(years.is_finite() && years >= 0.0, "years must be >= 0 (got {})", years);
    anyhow::ensure!(dt.is_finite() && dt > 0.0, "dt must be > 0 (got {})", dt);
    Ok((years / dt).round() as usize)
}

/// Total dead after a full run for each beta, all other settings unchanged.
/// SEIR scenarios report 0.0 since they track no deaths.
pub fn sweep_beta(cfg: &ScenarioConfig, betas: &[f64]) -> anyhow::Result<Vec<(f64, f64)>> {
    cfg.check()?;
    let population = cfg.population()?;
    let topography = cfg.topography.build(cfg.shape());

    let mut out = Vec::with_capacity(betas.len());
    for &beta in betas {
        let mut run_cfg = cfg.clone();
        run_cfg.rates.beta = beta;
        run_cfg.rates.check()?;
        let mut model = run_cfg.build_model(&population);
        for _ in 0..run_cfg.steps {
            model.timestep(run_cfg.dt, &topography);
        }
        let dead = model.number_dead().unwrap_or(0.0);
        info!(beta, number_dead = dead, "beta sweep point");
        out.push((beta, dead));
    }
    Ok(out)
}
