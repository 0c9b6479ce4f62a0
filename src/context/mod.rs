//! Context module for hyperlu.
//!
//! This module provides the factory that turns a solver tag from the input
//! options into a ready-to-use relaxation scheme for a given grid level.
//!
//! Modules:
//! - [`solver_context`]: `SolverKind` parsing and `create_solver`.
//!
//! # Example
//! ```rust,ignore
//! let solver = hyperlu::create_solver("lusgs", &level)?;
//! let err = solver.relax(&level, &phys, &opts, rank, opts.matrix_sweeps, &mut du)?;
//! ```

pub mod solver_context;
pub use solver_context::{SolverKind, create_solver, solver_from_options};
