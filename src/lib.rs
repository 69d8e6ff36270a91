pub mod calibration;
pub mod grid;
pub mod io;
pub mod math;
pub mod model;
pub mod scenario;
pub mod topography;

pub use grid::GridShape;
pub use model::{Compartment, FlowSet, GridModel, ModelVariant, Rates, Totals};
pub use scenario::{ScenarioConfig, TopographySpec};
