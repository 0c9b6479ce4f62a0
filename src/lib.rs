//! hyperlu: matrix-free implicit relaxation for block-structured flow solvers
//!
//! This crate provides the implicit-update kernel of a finite-volume solver on
//! domain-decomposed structured grids: LU-SGS swept along hyperplanes, DP-LUR
//! point relaxation, the shared diagonal-block inversion, and the halo
//! synchronization between sweep phases, with shared and distributed memory
//! parallelism.

pub mod parallel;

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod model;
pub mod solver;
pub mod utils;

// Re-exports for convenience
pub use crate::config::*;
pub use crate::context::*;
pub use crate::core::*;
pub use crate::error::*;
pub use crate::grid::*;
pub use crate::matrix::*;
pub use crate::solver::*;
pub use crate::utils::*;

// Re-export RelaxStats at the crate root for convenience
pub use utils::convergence::RelaxStats;
