//! Model residual providers with known operators.

pub mod advection;
pub use advection::ModelBlock;
