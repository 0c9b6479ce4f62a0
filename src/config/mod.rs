//! Solver configuration surface.

pub mod options;
pub use options::{PointErrorReport, SolverOptions};
