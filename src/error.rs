use crate::grid::index::Extents;
use thiserror::Error;

// Unified error type for hyperlu

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RelaxError {
    #[error("{what} mismatch: expected {expected}, found {found}")]
    StructureMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("{what} extents mismatch: expected {expected:?}, found {found:?}")]
    ExtentMismatch {
        what: &'static str,
        expected: Extents,
        found: Extents,
    },
    #[error("singular diagonal block at cell ({i}, {j}, {k})")]
    SingularBlock { i: usize, j: usize, k: usize },
    #[error("diagonal of block {0} has not been inverted")]
    DiagonalNotInverted(usize),
    #[error("diagonal block at cell ({i}, {j}, {k}) has not been inverted")]
    CellNotInverted { i: usize, j: usize, k: usize },
    #[error("unknown linear solver kind: {0:?}")]
    UnknownSolverKind(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("halo exchange error: {0}")]
    HaloExchange(String),
    #[error("communication error: {0}")]
    Communication(String),
}

impl RelaxError {
    /// Shorthand for the structural checks done before any sweep.
    pub(crate) fn mismatch(what: &'static str, expected: usize, found: usize) -> Self {
        RelaxError::StructureMismatch { what, expected, found }
    }
}
