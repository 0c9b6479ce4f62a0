//! Core traits: the seams between the relaxation kernel and its collaborators.

use crate::config::SolverOptions;
use crate::core::jacobian::SpectralRadius;
use crate::core::var_array::VarArray;
use crate::error::RelaxError;
use crate::grid::connection::Connection;
use crate::grid::field::UnknownField;
use crate::grid::index::{CellIndex, Extents};
use crate::matrix::BlockDiagonal;

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}

/// Read-only access to the per-cell unknowns of one block, ghosts included.
///
/// Implemented by the live [`UnknownField`] and by its immutable
/// [`FieldSnapshot`](crate::grid::FieldSnapshot). Which one a sweep hands to
/// the residual provider decides whether neighbors are read as already
/// updated (LU-SGS) or as of the previous sweep (DP-LUR).
pub trait FieldView<T = f64> {
    fn extents(&self) -> Extents;
    fn num_ghosts(&self) -> usize;
    fn num_species(&self) -> usize;
    /// Variables per cell.
    fn block_len(&self) -> usize;
    /// Values at a signed index in `[-G, N + G)` per axis.
    fn at(&self, i: isize, j: isize, k: isize) -> &[T];

    fn get(&self, cell: CellIndex) -> &[T] {
        let (i, j, k) = cell.signed();
        self.at(i, j, k)
    }
}

/// Per-block supplier of residuals and matrix-free off-diagonal products.
pub trait ResidualProvider: Sync {
    /// Physical models consulted by the history and flux-Jacobian terms.
    type Physics: Sync;

    fn extents(&self) -> Extents;
    fn num_ghosts(&self) -> usize;
    fn num_cells(&self) -> usize {
        self.extents().num_cells()
    }

    /// Steady residual of a physical cell.
    fn residual(&self, cell: CellIndex) -> VarArray;
    /// Explicit time-history term of the right-hand side.
    fn explicit_history(&self, cell: CellIndex, opts: &SolverOptions) -> VarArray;
    /// Secondary (dual-time) history term, subtracted from the right-hand side.
    fn dual_time_history(
        &self,
        cell: CellIndex,
        opts: &SolverOptions,
        phys: &Self::Physics,
    ) -> VarArray;
    /// Volume over time step contribution to the diagonal.
    fn diagonal_time_term(&self, cell: CellIndex, opts: &SolverOptions) -> f64;
    fn spectral_radius(&self, cell: CellIndex) -> SpectralRadius;

    /// Product of the lower neighbors' flux Jacobians with their values in `x`.
    fn lower_contribution<F: FieldView>(
        &self,
        cell: CellIndex,
        x: &F,
        phys: &Self::Physics,
        opts: &SolverOptions,
    ) -> VarArray;
    /// Product of the upper neighbors' flux Jacobians with their values in `x`.
    fn upper_contribution<F: FieldView>(
        &self,
        cell: CellIndex,
        x: &F,
        phys: &Self::Physics,
        opts: &SolverOptions,
    ) -> VarArray;
}

/// Synchronizes ghost layers of the local fields across connected blocks.
pub trait HaloExchange {
    fn exchange(
        &self,
        fields: &mut [UnknownField],
        connections: &[Connection],
        rank: usize,
        num_ghosts: usize,
    ) -> Result<(), RelaxError>;
}

/// One multigrid level as seen by the relaxation kernel.
pub trait GridLevel {
    type Block: ResidualProvider;
    type Halo: HaloExchange;

    fn num_blocks(&self) -> usize;
    fn block(&self, b: usize) -> &Self::Block;
    /// Inverted diagonal of block `b`.
    fn diagonal(&self, b: usize) -> &BlockDiagonal;
    fn connections(&self) -> &[Connection];
    fn halo(&self) -> &Self::Halo;
}

/// Physics context type of a grid level's blocks.
pub type PhysicsOf<G> = <<G as GridLevel>::Block as ResidualProvider>::Physics;
