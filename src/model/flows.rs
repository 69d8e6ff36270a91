use std::fmt;

use serde::{Deserialize, Serialize};

/// One population compartment of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compartment {
    Susceptible,
    Exposed,
    Infected,
    Resistant,
    Dead,
}

impl Compartment {
    pub const ALL: [Compartment; 5] = [
        Compartment::Susceptible,
        Compartment::Exposed,
        Compartment::Infected,
        Compartment::Resistant,
        Compartment::Dead,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Compartment::Susceptible => 'S',
            Compartment::Exposed => 'E',
            Compartment::Infected => 'I',
            Compartment::Resistant => 'R',
            Compartment::Dead => 'D',
        }
    }
}

impl fmt::Display for Compartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How the size of a flow is computed from the pre-step state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowRate {
    /// Force of infection: `beta * scale * I` pushed through the topography,
    /// then multiplied by the source compartment.
    Contact(f64),
    /// Per-capita rate applied to the source compartment.
    Linear(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub from: Compartment,
    pub to: Compartment,
    pub rate: FlowRate,
}

impl Flow {
    pub fn new(from: Compartment, to: Compartment, rate: FlowRate) -> Self {
        Self { from, to, rate }
    }
}

/// Flow with compartments resolved to storage slots.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotFlow {
    pub from: usize,
    pub to: usize,
    pub rate: FlowRate,
}

/// Compartments plus the directed flows between them.
///
/// Every flow removes from `from` exactly what it adds to `to`, so any flow set
/// conserves the per-cell total.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowSet {
    compartments: Vec<Compartment>,
    flows: Vec<Flow>,
    susceptible: usize,
    infected: usize,
}

impl FlowSet {
    pub fn new(compartments: Vec<Compartment>, flows: Vec<Flow>) -> anyhow::Result<Self> {
        for (n, c) in compartments.iter().enumerate() {
            anyhow::ensure!(!compartments[..n].contains(c), "compartment {} listed twice", c);
        }
        let Some(susceptible) = compartments.iter().position(|c| *c == Compartment::Susceptible) else {
            anyhow::bail!("flow set needs a Susceptible compartment");
        };
        let Some(infected) = compartments.iter().position(|c| *c == Compartment::Infected) else {
            anyhow::bail!("flow set needs an Infected compartment");
        };
        for flow in &flows {
            anyhow::ensure!(
                compartments.contains(&flow.from) && compartments.contains(&flow.to),
                "flow {}->{} references a compartment outside the set",
                flow.from,
                flow.to
            );
            anyhow::ensure!(flow.from != flow.to, "flow {}->{} is a self loop", flow.from, flow.to);
        }
        Ok(Self { compartments, flows, susceptible, infected })
    }

    /// `S -> E -> I -> R`; R absorbs recovery, quarantine and death.
    pub fn seir(beta: f64, sigma: f64, gamma: f64) -> Self {
        use Compartment::{Exposed, Infected, Resistant, Susceptible};
        Self {
            compartments: vec![Susceptible, Exposed, Infected, Resistant],
            flows: vec![
                Flow::new(Susceptible, Exposed, FlowRate::Contact(beta)),
                Flow::new(Exposed, Infected, FlowRate::Linear(sigma)),
                Flow::new(Infected, Resistant, FlowRate::Linear(gamma)),
            ],
            susceptible: 0,
            infected: 2,
        }
    }

    /// SEIR plus `I -> D` deaths and `R -> S` waning immunity.
    pub fn seirds(beta: f64, sigma: f64, gamma: f64, digamma: f64, rho: f64) -> Self {
        use Compartment::{Dead, Exposed, Infected, Resistant, Susceptible};
        Self {
            compartments: vec![Susceptible, Exposed, Infected, Resistant, Dead],
            flows: vec![
                Flow::new(Susceptible, Exposed, FlowRate::Contact(beta)),
                Flow::new(Exposed, Infected, FlowRate::Linear(sigma)),
                Flow::new(Infected, Resistant, FlowRate::Linear(gamma)),
                Flow::new(Infected, Dead, FlowRate::Linear(digamma)),
                Flow::new(Resistant, Susceptible, FlowRate::Linear(rho)),
            ],
            susceptible: 0,
            infected: 2,
        }
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn slot(&self, c: Compartment) -> Option<usize> {
        self.compartments.iter().position(|x| *x == c)
    }

    pub fn susceptible_slot(&self) -> usize {
        self.susceptible
    }

    pub fn infected_slot(&self) -> usize {
        self.infected
    }

    pub(crate) fn slot_flows(&self) -> Vec<SlotFlow> {
        // Membership is checked at construction.
        self.flows
            .iter()
            .filter_map(|f| {
                Some(SlotFlow {
                    from: self.slot(f.from)?,
                    to: self.slot(f.to)?,
                    rate: f.rate,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_sets_differ_only_in_extra_flows() {
        let seir = FlowSet::seir(1.0, 2.0, 3.0);
        let seirds = FlowSet::seirds(1.0, 2.0, 3.0, 0.5, 0.25);
        assert_eq!(seir.compartments().len(), 4);
        assert_eq!(seirds.compartments().len(), 5);
        assert_eq!(&seirds.flows()[..3], seir.flows());
        assert_eq!(seir.slot(Compartment::Dead), None);
        assert_eq!(seirds.slot(Compartment::Dead), Some(4));
    }

    #[test]
    fn rejects_flow_to_missing_compartment() {
        use Compartment::*;
        let err = FlowSet::new(
            vec![Susceptible, Infected],
            vec![Flow::new(Infected, Dead, FlowRate::Linear(1.0))],
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside the set"));
    }

    #[test]
    fn rejects_set_without_infected() {
        use Compartment::*;
        assert!(FlowSet::new(vec![Susceptible, Resistant], vec![]).is_err());
    }
}
