//! Inter-block connection topology.

use crate::grid::index::BlockFace;

/// One side of a block-to-block interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Patch {
    /// Process owning the block.
    pub rank: usize,
    /// Local index of the block on `rank`.
    pub block: usize,
    pub face: BlockFace,
}

impl Patch {
    pub const fn new(rank: usize, block: usize, face: BlockFace) -> Self {
        Self { rank, block, face }
    }
}

/// Interface between two block faces with matching tangential dimensions.
///
/// Tangential axes map in i-j-k order; the physical layer at depth `d` on one
/// side feeds the ghost layer at depth `d` on the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    pub first: Patch,
    pub second: Patch,
}

impl Connection {
    pub const fn new(first: Patch, second: Patch) -> Self {
        Self { first, second }
    }

    pub fn touches_rank(&self, rank: usize) -> bool {
        self.first.rank == rank || self.second.rank == rank
    }

    pub fn is_local_to(&self, rank: usize) -> bool {
        self.first.rank == rank && self.second.rank == rank
    }

    /// For a connection with exactly one side on `rank`: (local, remote).
    pub fn split_for(&self, rank: usize) -> Option<(Patch, Patch)> {
        match (self.first.rank == rank, self.second.rank == rank) {
            (true, false) => Some((self.first, self.second)),
            (false, true) => Some((self.second, self.first)),
            _ => None,
        }
    }
}
