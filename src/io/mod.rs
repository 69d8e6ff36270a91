pub mod population;
pub mod series;
