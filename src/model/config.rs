use serde::{Deserialize, Serialize};

use crate::model::flows::FlowSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    Seir,
    Seirds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    // Rates (per unit time, usually per year with dt = 1/365)
    pub beta: f64,  // exposure
    pub sigma: f64, // exposed -> infected
    pub gamma: f64, // infected -> resistant

    // SEIRDS only
    #[serde(default)]
    pub digamma: f64, // infected -> dead
    #[serde(default)]
    pub rho: f64, // resistant -> susceptible (waning immunity)
}

impl Rates {
    pub fn seir(beta: f64, sigma: f64, gamma: f64) -> Self {
        Self { beta, sigma, gamma, digamma: 0.0, rho: 0.0 }
    }

    pub fn seirds(beta: f64, sigma: f64, gamma: f64, digamma: f64, rho: f64) -> Self {
        Self { beta, sigma, gamma, digamma, rho }
    }

    pub fn check(&self) -> anyhow::Result<()> {
        for (name, v) in [
            ("beta", self.beta),
            ("sigma", self.sigma),
            ("gamma", self.gamma),
            ("digamma", self.digamma),
            ("rho", self.rho),
        ] {
            anyhow::ensure!(v.is_finite() && v >= 0.0, "{} must be finite and >= 0 (got {})", name, v);
        }
        Ok(())
    }

    /// Rate at which infected individuals leave I.
    pub fn removal_rate(&self, variant: ModelVariant) -> f64 {
        match variant {
            ModelVariant::Seir => self.gamma,
            ModelVariant::Seirds => self.gamma + self.digamma,
        }
    }

    pub fn flow_set(&self, variant: ModelVariant) -> FlowSet {
        match variant {
            ModelVariant::Seir => FlowSet::seir(self.beta, self.sigma, self.gamma),
            ModelVariant::Seirds => {
                FlowSet::seirds(self.beta, self.sigma, self.gamma, self.digamma, self.rho)
            }
        }
    }
}
