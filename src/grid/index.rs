//! Cell addressing inside one structured block.

use std::fmt;

/// Physical cell of a block. Ghost cells are addressed with signed triples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl CellIndex {
    pub const fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    /// Hyperplane coordinate `i + j + k`.
    pub fn plane(&self) -> usize {
        self.i + self.j + self.k
    }

    /// Signed neighbor index, possibly inside the ghost layer.
    pub fn offset(&self, di: isize, dj: isize, dk: isize) -> (isize, isize, isize) {
        (self.i as isize + di, self.j as isize + dj, self.k as isize + dk)
    }

    pub fn signed(&self) -> (isize, isize, isize) {
        self.offset(0, 0, 0)
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

/// Physical cell counts of a block along i, j, k.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extents {
    pub ni: usize,
    pub nj: usize,
    pub nk: usize,
}

impl Extents {
    pub const fn new(ni: usize, nj: usize, nk: usize) -> Self {
        Self { ni, nj, nk }
    }

    pub fn num_cells(&self) -> usize {
        self.ni * self.nj * self.nk
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        cell.i < self.ni && cell.j < self.nj && cell.k < self.nk
    }

    /// Dense offset of a physical cell, i fastest.
    pub fn linear(&self, cell: CellIndex) -> usize {
        debug_assert!(self.contains(cell), "cell {cell} outside {self:?}");
        (cell.k * self.nj + cell.j) * self.ni + cell.i
    }

    pub fn along(&self, axis: Axis) -> usize {
        match axis {
            Axis::I => self.ni,
            Axis::J => self.nj,
            Axis::K => self.nk,
        }
    }

    /// Physical cells in storage order (k outermost, i innermost).
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        let (ni, nj, nk) = (self.ni, self.nj, self.nk);
        (0..nk).flat_map(move |k| {
            (0..nj).flat_map(move |j| (0..ni).map(move |i| CellIndex::new(i, j, k)))
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    I,
    J,
    K,
}

impl Axis {
    /// The two in-face axes, in i-j-k order.
    pub fn tangential(self) -> (Axis, Axis) {
        match self {
            Axis::I => (Axis::J, Axis::K),
            Axis::J => (Axis::I, Axis::K),
            Axis::K => (Axis::I, Axis::J),
        }
    }
}

/// One of the six boundary faces of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockFace {
    IMin,
    IMax,
    JMin,
    JMax,
    KMin,
    KMax,
}

impl BlockFace {
    pub fn axis(self) -> Axis {
        match self {
            BlockFace::IMin | BlockFace::IMax => Axis::I,
            BlockFace::JMin | BlockFace::JMax => Axis::J,
            BlockFace::KMin | BlockFace::KMax => Axis::K,
        }
    }

    pub fn is_max(self) -> bool {
        matches!(self, BlockFace::IMax | BlockFace::JMax | BlockFace::KMax)
    }

    /// Cell counts across the face (first, second tangential axis).
    pub fn tangential_dims(self, extents: Extents) -> (usize, usize) {
        let (a, b) = self.axis().tangential();
        (extents.along(a), extents.along(b))
    }

    /// Normal index of the physical layer `depth` cells away from the face.
    pub fn physical_layer(self, extents: Extents, depth: usize) -> isize {
        let n = extents.along(self.axis()) as isize;
        if self.is_max() { n - 1 - depth as isize } else { depth as isize }
    }

    /// Normal index of the ghost layer `depth` cells beyond the face.
    pub fn ghost_layer(self, extents: Extents, depth: usize) -> isize {
        let n = extents.along(self.axis()) as isize;
        if self.is_max() { n + depth as isize } else { -1 - depth as isize }
    }

    /// Signed cell indices of `layers` slabs, ordered by depth, then second
    /// and first tangential axis.
    pub fn layer_indices(
        self,
        extents: Extents,
        layers: usize,
        ghost: bool,
    ) -> Vec<(isize, isize, isize)> {
        let axis = self.axis();
        let (t1, t2) = self.tangential_dims(extents);
        let mut out = Vec::with_capacity(layers * t1 * t2);
        for depth in 0..layers {
            let n = if ghost {
                self.ghost_layer(extents, depth)
            } else {
                self.physical_layer(extents, depth)
            };
            for b in 0..t2 as isize {
                for a in 0..t1 as isize {
                    out.push(match axis {
                        Axis::I => (n, a, b),
                        Axis::J => (a, n, b),
                        Axis::K => (a, b, n),
                    });
                }
            }
        }
        out
    }
}
