//! Lower-Upper Symmetric Gauss-Seidel (LU-SGS) along hyperplanes.
//!
//! A first-order implicit update linearizes the residual about time level n:
//!
//! ```text
//! [∂R/∂U + V/Δt] · ΔU = −R
//! ```
//!
//! which is the block-sparse system `A·x = b`, one `L×L` block per cell and
//! neighbor. Fully implicit methods store the flux Jacobians that populate
//! `A`; LU-SGS (Jameson & Yoon) instead factors
//!
//! ```text
//! A ≈ (D + L) · D⁻¹ · (D + U)
//! forward:  (D + L) · Δx* = b
//! backward: (D + U) · Δx  = D · Δx*
//! ```
//!
//! and forms the `L` and `U` products on the fly from the approximate
//! Jacobian `0.5·(Ac·S ± K·I)`. Sweeping along hyperplanes `i+j+k = const`
//! guarantees that every lower neighbor is already updated on the forward
//! pass and every upper neighbor on the backward pass, so no off-diagonal
//! storage is needed. Because the Jacobians are approximate anyway, a cheap
//! linear solve suffices; the outer nonlinear iteration corrects the defect.

use crate::config::SolverOptions;
use crate::context::SolverKind;
use crate::core::traits::{GridLevel, HaloExchange, PhysicsOf, ResidualProvider};
use crate::core::var_array::VarArray;
use crate::error::RelaxError;
use crate::grid::field::UnknownField;
use crate::grid::hyperplane::HyperplaneOrder;
use crate::matrix::BlockDiagonal;
use crate::solver::implicit::right_hand_side;
use crate::solver::{
    BackwardPath, LinearSolver, SweepState, block_sweeps, ghost_width, sum_over_blocks,
    validate_structure,
};
use crate::utils::convergence::RelaxStats;
use std::fmt;

/// LU-SGS relaxation with one cached hyperplane order per block.
///
/// The orders are computed at construction for the level's block extents. A
/// level whose extents change needs a new solver; `relax` rejects stale
/// orders.
#[derive(Clone, Debug)]
pub struct Lusgs {
    reorder: Vec<HyperplaneOrder>,
}

impl Lusgs {
    pub fn new<G: GridLevel>(level: &G) -> Self {
        let reorder = (0..level.num_blocks())
            .map(|b| HyperplaneOrder::new(level.block(b).extents()))
            .collect();
        Self { reorder }
    }

    pub fn orders(&self) -> &[HyperplaneOrder] {
        &self.reorder
    }

    /// Forward pass over one block in increasing plane order.
    pub fn forward_sweep<B: ResidualProvider>(
        &self,
        blk: &B,
        reorder: &HyperplaneOrder,
        phys: &B::Physics,
        opts: &SolverOptions,
        a_inv: &BlockDiagonal,
        state: SweepState,
        x: &mut UnknownField,
    ) {
        let theta_inv = opts.theta_inv();

        for &cell in reorder {
            // lower neighbors are already updated on this pass
            let mut off_diagonal = blk.lower_contribution(cell, &*x, phys, opts);
            if state.includes_upper() {
                off_diagonal -= blk.upper_contribution(cell, &*x, phys, opts);
            }

            let b = right_hand_side(blk, cell, opts, phys, theta_inv);
            x.insert_block(cell, &a_inv.apply_inverse(cell, &(b + off_diagonal)));
        }
    }

    /// Backward pass over one block in decreasing plane order. Returns the
    /// summed squared change of the block's update.
    pub fn backward_sweep<B: ResidualProvider>(
        &self,
        blk: &B,
        reorder: &HyperplaneOrder,
        phys: &B::Physics,
        opts: &SolverOptions,
        a_inv: &BlockDiagonal,
        state: SweepState,
        x: &mut UnknownField,
    ) -> f64 {
        let theta_inv = opts.theta_inv();
        let mut l2_error = VarArray::new(opts.num_equations, opts.num_species);

        for &cell in reorder.iter().rev() {
            let upper = blk.upper_contribution(cell, &*x, phys, opts);
            let xold = x.get_copy(cell);

            let value = match state.backward_path() {
                BackwardPath::FullRecompute => {
                    let lower = blk.lower_contribution(cell, &*x, phys, opts);
                    let b = right_hand_side(blk, cell, opts, phys, theta_inv);
                    a_inv.apply_inverse(cell, &(b + lower - upper))
                }
                BackwardPath::CorrectionOnly => xold.clone() - a_inv.apply_inverse(cell, &upper),
            };
            x.insert_block(cell, &value);

            let error = value - &xold;
            l2_error += error.squared();
        }
        l2_error.sum()
    }
}

impl<G: GridLevel> LinearSolver<G> for Lusgs {
    fn kind(&self) -> SolverKind {
        SolverKind::Lusgs
    }

    fn relax_with_stats(
        &self,
        level: &G,
        phys: &PhysicsOf<G>,
        opts: &SolverOptions,
        rank: usize,
        sweeps: usize,
        du: &mut [UnknownField],
    ) -> Result<RelaxStats, RelaxError> {
        validate_structure(level, opts, du, Some(&self.reorder))?;

        let num_ghosts = ghost_width(level);
        let mut stats = RelaxStats::with_capacity(sweeps);

        for sweep in 0..sweeps {
            let state = SweepState::new(sweep, opts.matrix_requires_initialization);

            level.halo().exchange(du, level.connections(), rank, num_ghosts)?;
            let mut work = block_sweeps(level, du);
            sum_over_blocks(&mut work, |w| {
                self.forward_sweep(w.block, &self.reorder[w.id], phys, opts, w.diagonal, state, w.field);
                0.0
            });

            level.halo().exchange(du, level.connections(), rank, num_ghosts)?;
            let mut work = block_sweeps(level, du);
            let matrix_error = sum_over_blocks(&mut work, |w| {
                let err = self.backward_sweep(
                    w.block,
                    &self.reorder[w.id],
                    phys,
                    opts,
                    w.diagonal,
                    state,
                    w.field,
                );
                log::trace!("lusgs sweep {sweep}: block {} error {err:.6e}", w.id);
                err
            });

            log::debug!("lusgs sweep {}/{}: matrix error = {:.6e}", sweep + 1, sweeps, matrix_error);
            stats.record(matrix_error);
        }

        stats.reported_error = stats.last_sweep();
        Ok(stats)
    }
}

impl fmt::Display for Lusgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: usize = self.reorder.iter().map(HyperplaneOrder::len).sum();
        write!(f, "LUSGS(blocks={}, cells={})", self.reorder.len(), cells)
    }
}
