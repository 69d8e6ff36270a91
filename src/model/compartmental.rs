use std::fmt;

use ndarray::{Array1, Array2, Array3, ArrayView2, ArrayView3, ArrayViewMut3, Axis, Ix3};
use serde::Serialize;
use tracing::{debug, trace};

use crate::grid::GridShape;
use crate::math::linalg::row_times_matrix;
use crate::math::ode::{euler_step_ws, EulerWorkspace};
use crate::model::config::{ModelVariant, Rates};
use crate::model::flows::{Compartment, FlowRate, FlowSet, SlotFlow};

/// Compartment sums over every cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    pub susceptible: f64,
    pub exposed: f64,
    pub infected: f64,
    pub resistant: f64,
    pub dead: f64,
}

impl Totals {
    pub fn total(&self) -> f64 {
        self.susceptible + self.exposed + self.infected + self.resistant + self.dead
    }
}

/// Grid of cells, each split into the compartments of a [`FlowSet`], coupled
/// through a `cells x cells` topography on every step.
///
/// State is stored compartment-major as `(compartments, rows, cols)`.
#[derive(Debug, Clone)]
pub struct GridModel {
    shape: GridShape,
    flow_set: FlowSet,
    flows: Vec<SlotFlow>,
    population: Array2<f64>,
    scale: Array2<f64>,
    state: Array3<f64>,
    ws: EulerWorkspace<Ix3>,
    t: f64,
    steps: usize,
}

impl GridModel {
    /// All cells start fully susceptible. `population` is copied; a zero cell
    /// yields an infinite scale factor and is not rejected here.
    pub fn new(population: &Array2<f64>, flow_set: FlowSet) -> Self {
        let (rows, cols) = population.dim();
        let state_dim = Ix3(flow_set.compartments().len(), rows, cols);

        let mut state = Array3::zeros(state_dim);
        state
            .index_axis_mut(Axis(0), flow_set.susceptible_slot())
            .assign(population);
        let ws = EulerWorkspace::new(state.raw_dim());

        Self {
            shape: GridShape::new(rows, cols),
            flows: flow_set.slot_flows(),
            flow_set,
            population: population.clone(),
            scale: population.mapv(|n| 1.0 / n),
            state,
            ws,
            t: 0.0,
            steps: 0,
        }
    }

    pub fn seir(population: &Array2<f64>, beta: f64, sigma: f64, gamma: f64) -> Self {
        Self::new(population, FlowSet::seir(beta, sigma, gamma))
    }

    pub fn seirds(
        population: &Array2<f64>,
        beta: f64,
        sigma: f64,
        gamma: f64,
        digamma: f64,
        rho: f64,
    ) -> Self {
        Self::new(population, FlowSet::seirds(beta, sigma, gamma, digamma, rho))
    }

    pub fn from_rates(population: &Array2<f64>, variant: ModelVariant, rates: &Rates) -> Self {
        Self::new(population, rates.flow_set(variant))
    }

    /// Move `amount` from S to I in one cell. Nothing stops S going negative.
    pub fn infect(&mut self, (row, col): (usize, usize), amount: f64) {
        self.state[[self.flow_set.susceptible_slot(), row, col]] -= amount;
        self.state[[self.flow_set.infected_slot(), row, col]] += amount;
    }

    pub fn infect_one(&mut self, cell: (usize, usize)) {
        self.infect(cell, 1.0);
    }

    /// Advance every cell by one explicit Euler step of size `dt`.
    ///
    /// Panics unless `topography` is `cells x cells`. `T[src, dst]` weights how
    /// much of the infectious pressure at `src` reaches the susceptibles at `dst`.
    pub fn timestep(&mut self, dt: f64, topography: &Array2<f64>) {
        let cells = self.shape.cells();
        assert_eq!(
            topography.dim(),
            (cells, cells),
            "topography must be {cells}x{cells} for a {}x{} grid",
            self.shape.rows,
            self.shape.cols
        );

        let flows = &self.flows;
        let scale = &self.scale;
        let infected = self.flow_set.infected_slot();
        euler_step_ws(&mut self.state, self.t, dt, &mut self.ws, |_, y, dy| {
            deriv(flows, infected, scale, topography.view(), y, dy)
        });

        self.t += dt;
        self.steps += 1;
        trace!(step = self.steps, t = self.t, "grid model step");
    }

    /// Take `steps` steps and return `(t, totals)` for the initial state and
    /// after every step.
    pub fn run(&mut self, steps: usize, dt: f64, topography: &Array2<f64>) -> Vec<(f64, Totals)> {
        debug!(steps, dt, cells = self.shape.cells(), "running grid model");
        let mut out = Vec::with_capacity(steps + 1);
        out.push((self.t, self.totals()));
        for _ in 0..steps {
            self.timestep(dt, topography);
            out.push((self.t, self.totals()));
        }
        out
    }

    pub fn infected(&self) -> ArrayView2<'_, f64> {
        self.state.index_axis(Axis(0), self.flow_set.infected_slot())
    }

    pub fn compartment(&self, c: Compartment) -> Option<ArrayView2<'_, f64>> {
        self.flow_set
            .slot(c)
            .map(|k| self.state.index_axis(Axis(0), k))
    }

    /// Total dead over the grid; `None` when the flow set tracks no deaths.
    pub fn number_dead(&self) -> Option<f64> {
        self.compartment(Compartment::Dead).map(|d| d.sum())
    }

    pub fn totals(&self) -> Totals {
        let sum = |c: Compartment| self.compartment(c).map(|v| v.sum()).unwrap_or(0.0);
        Totals {
            susceptible: sum(Compartment::Susceptible),
            exposed: sum(Compartment::Exposed),
            infected: sum(Compartment::Infected),
            resistant: sum(Compartment::Resistant),
            dead: sum(Compartment::Dead),
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn population(&self) -> &Array2<f64> {
        &self.population
    }

    pub fn flow_set(&self) -> &FlowSet {
        &self.flow_set
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Check that every value is finite and `>= -tolerance`, and that each cell
    /// still sums to its population within `tolerance` (relative).
    ///
    /// Opt-in only: stepping never clamps or validates.
    pub fn check_invariants(&self, tolerance: f64) -> anyhow::Result<()> {
        for (k, c) in self.flow_set.compartments().iter().enumerate() {
            let view = self.state.index_axis(Axis(0), k);
            for ((row, col), v) in view.indexed_iter() {
                anyhow::ensure!(v.is_finite(), "{}[{}, {}] is not finite ({})", c, row, col, v);
                anyhow::ensure!(*v >= -tolerance, "{}[{}, {}] is negative ({})", c, row, col, v);
            }
        }

        let per_cell = self.state.sum_axis(Axis(0));
        for ((row, col), total) in per_cell.indexed_iter() {
            let n = self.population[[row, col]];
            anyhow::ensure!(
                (total - n).abs() <= tolerance * n.abs().max(1.0),
                "cell [{}, {}] holds {} but population is {}",
                row,
                col,
                total,
                n
            );
        }
        Ok(())
    }
}

impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, c) in self.flow_set.compartments().iter().enumerate() {
            if k > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{}{}",
                c.symbol().to_ascii_lowercase(),
                self.state.index_axis(Axis(0), k)
            )?;
        }
        Ok(())
    }
}

/// Time derivative of the whole state, evaluated from `y` alone.
fn deriv(
    flows: &[SlotFlow],
    infected: usize,
    scale: &Array2<f64>,
    topography: ArrayView2<f64>,
    y: ArrayView3<f64>,
    mut dy: ArrayViewMut3<f64>,
) {
    dy.fill(0.0);
    for flow in flows {
        let source = y.index_axis(Axis(0), flow.from);
        let amount = match flow.rate {
            FlowRate::Contact(beta) => {
                exposure(beta, scale, y.index_axis(Axis(0), infected), topography) * &source
            }
            FlowRate::Linear(rate) => source.mapv(|v| rate * v),
        };

        let mut out = dy.index_axis_mut(Axis(0), flow.from);
        out -= &amount;
        let mut into = dy.index_axis_mut(Axis(0), flow.to);
        into += &amount;
    }
}

/// Per-cell force of infection: `(beta * scale * I)` flattened row-major,
/// times the topography, reshaped back onto the grid.
fn exposure(
    beta: f64,
    scale: &Array2<f64>,
    infected: ArrayView2<f64>,
    topography: ArrayView2<f64>,
) -> Array2<f64> {
    let pressure: Array1<f64> = scale
        .iter()
        .zip(infected.iter())
        .map(|(s, i)| beta * s * i)
        .collect();
    let flat = row_times_matrix(pressure.view(), topography);

    let cols = scale.ncols();
    Array2::from_shape_fn(scale.dim(), |(r, c)| flat[r * cols + c])
}
