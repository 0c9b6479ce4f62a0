//! Utilities shared by the relaxation drivers.

pub mod convergence;
