//! Relaxation schemes for the linearized implicit system.
//!
//! Both schemes solve `A·Δu = b` approximately, where `A` is never assembled:
//! the diagonal blocks are stored inverted in a [`BlockDiagonal`] and the
//! off-diagonal products are supplied on the fly by the
//! [`ResidualProvider`].

use crate::config::SolverOptions;
use crate::context::SolverKind;
use crate::core::traits::{FieldView, GridLevel, PhysicsOf, ResidualProvider};
use crate::error::RelaxError;
use crate::grid::field::UnknownField;
use crate::grid::hyperplane::HyperplaneOrder;
use crate::matrix::BlockDiagonal;
use crate::utils::convergence::RelaxStats;
use bitflags::bitflags;

/// Common interface of the relaxation schemes.
pub trait LinearSolver<G: GridLevel> {
    fn kind(&self) -> SolverKind;

    /// Run `sweeps` relaxation sweeps over every local block of `level`,
    /// updating `du` in place. Returns per-sweep totals and the scalar the
    /// scheme reports to the nonlinear driver.
    fn relax_with_stats(
        &self,
        level: &G,
        phys: &PhysicsOf<G>,
        opts: &SolverOptions,
        rank: usize,
        sweeps: usize,
        du: &mut [UnknownField],
    ) -> Result<RelaxStats, RelaxError>;

    /// Run `sweeps` sweeps and return the scheme's convergence scalar.
    fn relax(
        &self,
        level: &G,
        phys: &PhysicsOf<G>,
        opts: &SolverOptions,
        rank: usize,
        sweeps: usize,
        du: &mut [UnknownField],
    ) -> Result<f64, RelaxError> {
        self.relax_with_stats(level, phys, opts, rank, sweeps, du)
            .map(|stats| stats.reported_error)
    }

    fn initialize_matrix_update(
        &self,
        blk: &G::Block,
        opts: &SolverOptions,
        phys: &PhysicsOf<G>,
        a_inv: &BlockDiagonal,
    ) -> Result<UnknownField, RelaxError> {
        implicit::initialize_matrix_update(blk, opts, phys, a_inv)
    }

    fn invert_diagonal(
        &self,
        blk: &G::Block,
        opts: &SolverOptions,
        diagonal: &mut BlockDiagonal,
    ) -> Result<(), RelaxError> {
        implicit::invert_diagonal(blk, opts, diagonal)
    }
}

bitflags! {
    /// Where a sweep sits within a `relax` call.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct SweepState: u8 {
        const FIRST_SWEEP = 0b01;
        const SEEDED      = 0b10;
    }
}

impl SweepState {
    pub fn new(sweep: usize, seeded: bool) -> Self {
        let mut state = Self::empty();
        state.set(Self::FIRST_SWEEP, sweep == 0);
        state.set(Self::SEEDED, seeded);
        state
    }

    /// Upper neighbors hold a meaningful update unless this is the first
    /// sweep over an unseeded (zero) field.
    pub fn includes_upper(self) -> bool {
        !self.contains(Self::FIRST_SWEEP) || self.contains(Self::SEEDED)
    }

    pub fn backward_path(self) -> BackwardPath {
        if self.includes_upper() {
            BackwardPath::FullRecompute
        } else {
            BackwardPath::CorrectionOnly
        }
    }
}

/// Update rule of the LU-SGS backward pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackwardPath {
    /// `x = D⁻¹·(b + L − U)`.
    FullRecompute,
    /// `x = x* − D⁻¹·U`; valid when the forward pass already folded in `b`
    /// and no upper term.
    CorrectionOnly,
}

/// One local block and the data a sweep phase needs for it.
pub(crate) struct BlockSweep<'a, B> {
    pub id: usize,
    pub block: &'a B,
    pub diagonal: &'a BlockDiagonal,
    pub field: &'a mut UnknownField,
}

pub(crate) fn block_sweeps<'a, G: GridLevel>(
    level: &'a G,
    du: &'a mut [UnknownField],
) -> Vec<BlockSweep<'a, G::Block>> {
    du.iter_mut()
        .enumerate()
        .map(|(id, field)| BlockSweep {
            id,
            block: level.block(id),
            diagonal: level.diagonal(id),
            field,
        })
        .collect()
}

/// Apply `f` to every block of a sweep phase and sum the results. Blocks only
/// couple through halo exchange, so they are processed concurrently.
pub(crate) fn sum_over_blocks<W, F>(work: &mut [W], f: F) -> f64
where
    W: Send,
    F: Fn(&mut W) -> f64 + Sync + Send,
{
    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        work.par_iter_mut().map(|w| f(w)).sum()
    }
    #[cfg(not(feature = "rayon"))]
    {
        work.iter_mut().map(|w| f(w)).sum()
    }
}

/// Check that the options, fields, orders and diagonals all describe `level`
/// before any field is touched.
pub(crate) fn validate_structure<G: GridLevel>(
    level: &G,
    opts: &SolverOptions,
    du: &[UnknownField],
    orders: Option<&[HyperplaneOrder]>,
) -> Result<(), RelaxError> {
    opts.validate()?;
    if level.num_blocks() != du.len() {
        return Err(RelaxError::mismatch("number of blocks", level.num_blocks(), du.len()));
    }
    if let Some(orders) = orders {
        if orders.len() != du.len() {
            return Err(RelaxError::mismatch("hyperplane order count", du.len(), orders.len()));
        }
    }
    for (b, field) in du.iter().enumerate() {
        let blk = level.block(b);
        let extents = blk.extents();
        if field.extents() != extents {
            return Err(RelaxError::ExtentMismatch {
                what: "update field",
                expected: extents,
                found: field.extents(),
            });
        }
        if field.num_ghosts() != blk.num_ghosts() {
            return Err(RelaxError::mismatch("ghost layers", blk.num_ghosts(), field.num_ghosts()));
        }
        if let Some(order) = orders.and_then(|o| o.get(b)) {
            if !order.matches(extents) {
                return Err(RelaxError::ExtentMismatch {
                    what: "hyperplane order",
                    expected: extents,
                    found: order.extents(),
                });
            }
        }
        let diagonal = level.diagonal(b);
        if diagonal.extents() != extents {
            return Err(RelaxError::ExtentMismatch {
                what: "diagonal",
                expected: extents,
                found: diagonal.extents(),
            });
        }
        if field.num_equations() != opts.num_equations {
            return Err(RelaxError::mismatch(
                "equations per cell",
                opts.num_equations,
                field.num_equations(),
            ));
        }
        if field.num_species() != opts.num_species {
            return Err(RelaxError::mismatch("species per cell", opts.num_species, field.num_species()));
        }
        if diagonal.block_len() != field.block_len() {
            return Err(RelaxError::mismatch(
                "variables per cell",
                diagonal.block_len(),
                field.block_len(),
            ));
        }
        if !diagonal.is_inverted() {
            return Err(RelaxError::DiagonalNotInverted(b));
        }
    }
    Ok(())
}

/// Ghost width used for halo exchange on this level.
pub(crate) fn ghost_width<G: GridLevel>(level: &G) -> usize {
    if level.num_blocks() == 0 { 0 } else { level.block(0).num_ghosts() }
}

pub mod dplur;
pub mod implicit;
pub mod lusgs;

pub use dplur::Dplur;
pub use implicit::{initialize_matrix_update, invert_diagonal, right_hand_side};
pub use lusgs::Lusgs;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_unseeded_sweep_skips_upper() {
        let s = SweepState::new(0, false);
        assert!(!s.includes_upper());
        assert_eq!(s.backward_path(), BackwardPath::CorrectionOnly);
        assert_eq!(SweepState::new(0, true).backward_path(), BackwardPath::FullRecompute);
        assert_eq!(SweepState::new(3, false).backward_path(), BackwardPath::FullRecompute);
        assert!(!SweepState::new(3, false).contains(SweepState::FIRST_SWEEP));
    }
}
