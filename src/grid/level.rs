//! Reference grid level: local blocks, their diagonals, topology and halo.

use crate::config::SolverOptions;
use crate::core::traits::{GridLevel, HaloExchange, ResidualProvider};
use crate::error::RelaxError;
use crate::grid::connection::Connection;
use crate::grid::field::UnknownField;
use crate::matrix::BlockDiagonal;
use crate::solver::implicit;

/// The blocks one process owns on one grid level.
pub struct Level<B, H> {
    blocks: Vec<B>,
    diagonals: Vec<BlockDiagonal>,
    connections: Vec<Connection>,
    halo: H,
}

impl<B: ResidualProvider, H: HaloExchange> Level<B, H> {
    /// Zero diagonals of `block_len × block_len` are allocated per block.
    pub fn new(blocks: Vec<B>, connections: Vec<Connection>, halo: H, block_len: usize) -> Self {
        let diagonals = blocks
            .iter()
            .map(|b| BlockDiagonal::new(b.extents(), block_len))
            .collect();
        Self { blocks, diagonals, connections, halo }
    }

    pub fn blocks(&self) -> &[B] {
        &self.blocks
    }

    pub fn diagonal_mut(&mut self, b: usize) -> &mut BlockDiagonal {
        &mut self.diagonals[b]
    }

    /// Let the driver assemble the flux-Jacobian part of every diagonal.
    pub fn seed_diagonals(&mut self, mut f: impl FnMut(&B, &mut BlockDiagonal)) {
        for (blk, diag) in self.blocks.iter().zip(self.diagonals.iter_mut()) {
            f(blk, diag);
        }
    }

    /// Finish and invert every block's diagonal; see [`implicit::invert_diagonal`].
    pub fn invert_diagonals(&mut self, opts: &SolverOptions) -> Result<(), RelaxError> {
        for (blk, diag) in self.blocks.iter().zip(self.diagonals.iter_mut()) {
            implicit::invert_diagonal(blk, opts, diag)?;
        }
        Ok(())
    }

    /// One initial update field per block; see [`implicit::initialize_matrix_update`].
    ///
    /// # Errors
    /// `DiagonalNotInverted(b)` for the first block whose diagonal has not
    /// been through [`invert_diagonals`](Self::invert_diagonals).
    pub fn initial_updates(
        &self,
        opts: &SolverOptions,
        phys: &B::Physics,
    ) -> Result<Vec<UnknownField>, RelaxError> {
        self.blocks
            .iter()
            .zip(self.diagonals.iter())
            .enumerate()
            .map(|(b, (blk, diag))| {
                if !diag.is_inverted() {
                    return Err(RelaxError::DiagonalNotInverted(b));
                }
                implicit::initialize_matrix_update(blk, opts, phys, diag)
            })
            .collect()
    }
}

impl<B: ResidualProvider, H: HaloExchange> GridLevel for Level<B, H> {
    type Block = B;
    type Halo = H;

    fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    fn block(&self, b: usize) -> &B {
        &self.blocks[b]
    }

    fn diagonal(&self, b: usize) -> &BlockDiagonal {
        &self.diagonals[b]
    }

    fn connections(&self) -> &[Connection] {
        &self.connections
    }

    fn halo(&self) -> &H {
        &self.halo
    }
}
