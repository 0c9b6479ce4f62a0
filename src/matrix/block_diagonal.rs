//! Block-diagonal implicit operator on top of Faer.
//!
//! One dense `L×L` block per physical cell. The driver assembles the
//! spectral-radius part of each block, [`invert_diagonal`] adds the time term
//! and inverts in place; the relaxation sweeps then only apply the inverses.
//!
//! [`invert_diagonal`]: crate::solver::implicit::invert_diagonal

use crate::core::traits::MatVec;
use crate::core::var_array::VarArray;
use crate::error::RelaxError;
use crate::grid::index::{CellIndex, Extents};
use faer::linalg::solvers::{FullPivLu, SolveCore};
use faer::{Conj, Mat, MatRef};

/// Blocks whose reciprocal condition number `1 / (‖A‖∞·‖A⁻¹‖∞)` falls
/// below this many machine epsilons per row are treated as singular.
const RCOND_EPSILONS: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct BlockDiagonal {
    extents: Extents,
    block_len: usize,
    blocks: Vec<Mat<f64>>,
    inverted: Vec<bool>,
}

impl BlockDiagonal {
    /// Zero blocks for every physical cell.
    pub fn new(extents: Extents, block_len: usize) -> Self {
        Self::from_fn(extents, block_len, |_| Mat::zeros(block_len, block_len))
    }

    /// Build each block from a function of its cell.
    ///
    /// # Panics
    /// Panics if `f` returns a block that is not `block_len × block_len`.
    pub fn from_fn(
        extents: Extents,
        block_len: usize,
        mut f: impl FnMut(CellIndex) -> Mat<f64>,
    ) -> Self {
        let blocks: Vec<Mat<f64>> = extents
            .cells()
            .map(|c| {
                let m = f(c);
                assert!(
                    m.nrows() == block_len && m.ncols() == block_len,
                    "block at {c} is {}x{}, expected {block_len}x{block_len}",
                    m.nrows(),
                    m.ncols()
                );
                m
            })
            .collect();
        let inverted = vec![false; blocks.len()];
        Self { extents, block_len, blocks, inverted }
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    pub fn num_cells(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, cell: CellIndex) -> MatRef<'_, f64> {
        self.blocks[self.extents.linear(cell)].as_ref()
    }

    pub fn set_block(&mut self, cell: CellIndex, block: Mat<f64>) {
        assert!(block.nrows() == self.block_len && block.ncols() == self.block_len);
        let idx = self.extents.linear(cell);
        self.blocks[idx] = block;
        self.inverted[idx] = false;
    }

    pub fn add_on_diagonal(&mut self, cell: CellIndex, value: f64) {
        let idx = self.extents.linear(cell);
        let m = &mut self.blocks[idx];
        for d in 0..self.block_len {
            m[(d, d)] += value;
        }
        self.inverted[idx] = false;
    }

    /// Scale only the diagonal entries, e.g. by the matrix relaxation factor.
    pub fn multiply_on_diagonal(&mut self, cell: CellIndex, factor: f64) {
        let idx = self.extents.linear(cell);
        let m = &mut self.blocks[idx];
        for d in 0..self.block_len {
            m[(d, d)] *= factor;
        }
        self.inverted[idx] = false;
    }

    /// Replace the block at `cell` by its inverse (full-pivoting LU).
    pub fn invert(&mut self, cell: CellIndex) -> Result<(), RelaxError> {
        let idx = self.extents.linear(cell);
        let n = self.block_len;
        let a = &self.blocks[idx];
        let lu = FullPivLu::new(a.as_ref());
        let mut inv = Mat::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 });
        lu.solve_in_place_with_conj(Conj::No, inv.as_mut());

        // zero pivots surface as non-finite entries, tiny ones as a huge inverse
        if (0..n).any(|i| (0..n).any(|j| !inv[(i, j)].is_finite())) {
            return Err(singular(cell));
        }
        let norm = inf_norm(a.as_ref());
        let norm_inv = inf_norm(inv.as_ref());
        let rcond = 1.0 / (norm * norm_inv);
        if norm == 0.0 || !(rcond > RCOND_EPSILONS * n as f64 * f64::EPSILON) {
            log::debug!("diagonal block at {cell} rejected: rcond = {rcond:.3e}");
            return Err(singular(cell));
        }
        self.blocks[idx] = inv;
        self.inverted[idx] = true;
        Ok(())
    }

    /// True once every block holds its inverse.
    pub fn is_inverted(&self) -> bool {
        self.inverted.iter().all(|&v| v)
    }

    /// Error naming the first cell whose block is not yet inverted.
    pub fn ensure_inverted(&self) -> Result<(), RelaxError> {
        match self.inverted.iter().position(|&v| !v) {
            None => Ok(()),
            Some(idx) => {
                let (ni, nj) = (self.extents.ni, self.extents.nj);
                Err(RelaxError::CellNotInverted { i: idx % ni, j: (idx / ni) % nj, k: idx / (ni * nj) })
            }
        }
    }

    /// `D⁻¹·x` at `cell`; the block must have been inverted.
    pub fn apply_inverse(&self, cell: CellIndex, x: &VarArray) -> VarArray {
        let idx = self.extents.linear(cell);
        debug_assert!(self.inverted[idx], "diagonal at {cell} applied before inversion");
        let mut y = VarArray::new(self.block_len - x.num_species(), x.num_species());
        self.blocks[idx].matvec(x, &mut y);
        y
    }
}

/// Maximum absolute row sum.
fn inf_norm(m: MatRef<'_, f64>) -> f64 {
    (0..m.nrows())
        .map(|i| (0..m.ncols()).map(|j| m[(i, j)].abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

fn singular(cell: CellIndex) -> RelaxError {
    RelaxError::SingularBlock { i: cell.i, j: cell.j, k: cell.k }
}
