pub mod linalg;
pub mod ode;
