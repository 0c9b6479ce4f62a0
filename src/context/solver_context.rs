//! Factory for the relaxation schemes.
//!
//! This module provides `SolverKind`, parsed from the `matrix_solver` input
//! tag, and `create_solver`, which builds the matching [`LinearSolver`] for a
//! grid level. Construction is where per-level precomputation happens (the
//! LU-SGS hyperplane orders), so a solver is built once per grid topology.
//!
//! # Supported Solvers
//! - `lusgs`: symmetric Gauss-Seidel swept along hyperplanes
//! - `dplur`: data-parallel point relaxation

use crate::config::SolverOptions;
use crate::core::traits::GridLevel;
use crate::error::RelaxError;
use crate::solver::{Dplur, LinearSolver, Lusgs};
use std::fmt;
use std::str::FromStr;

/// Enum representing the available relaxation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Lower-Upper Symmetric Gauss-Seidel
    Lusgs,
    /// Data-Parallel Lower-Upper Relaxation
    Dplur,
}

impl FromStr for SolverKind {
    type Err = RelaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lusgs" => Ok(SolverKind::Lusgs),
            "dplur" => Ok(SolverKind::Dplur),
            _ => Err(RelaxError::UnknownSolverKind(s.to_string())),
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::Lusgs => write!(f, "lusgs"),
            SolverKind::Dplur => write!(f, "dplur"),
        }
    }
}

/// Build the solver named by `kind` for `level`.
///
/// # Returns
/// * `Ok(solver)` ready to `relax` on this level
/// * `Err(RelaxError::UnknownSolverKind)` for an unrecognized tag
pub fn create_solver<G>(kind: &str, level: &G) -> Result<Box<dyn LinearSolver<G>>, RelaxError>
where
    G: GridLevel + 'static,
{
    let kind: SolverKind = kind.parse()?;
    log::info!("building {kind} linear solver for {} blocks", level.num_blocks());
    let solver: Box<dyn LinearSolver<G>> = match kind {
        SolverKind::Lusgs => Box::new(Lusgs::new(level)),
        SolverKind::Dplur => Box::new(Dplur::new()),
    };
    Ok(solver)
}

/// Validate `opts` and build the solver its `matrix_solver` tag names.
pub fn solver_from_options<G>(
    opts: &SolverOptions,
    level: &G,
) -> Result<Box<dyn LinearSolver<G>>, RelaxError>
where
    G: GridLevel + 'static,
{
    opts.validate()?;
    create_solver(&opts.matrix_solver, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("lusgs".parse::<SolverKind>().unwrap(), SolverKind::Lusgs);
        assert_eq!(" DPLUR ".parse::<SolverKind>().unwrap(), SolverKind::Dplur);
        assert_eq!(SolverKind::Dplur.to_string(), "dplur");
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "gmres".parse::<SolverKind>().unwrap_err();
        assert_eq!(err, RelaxError::UnknownSolverKind("gmres".to_string()));
    }
}
