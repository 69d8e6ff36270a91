pub mod compartmental;
pub mod config;
pub mod flows;

pub use compartmental::{GridModel, Totals};
pub use config::{ModelVariant, Rates};
pub use flows::{Compartment, Flow, FlowRate, FlowSet};
