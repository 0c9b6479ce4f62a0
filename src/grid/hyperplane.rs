//! Hyperplane traversal order for sequential sweeps.
//!
//! Cells are visited by increasing `p = i + j + k`. On a forward sweep every
//! lower neighbor `(i-1, j, k)`, `(i, j-1, k)`, `(i, j, k-1)` lies on plane
//! `p - 1` and has therefore already been updated; the backward sweep
//! mirrors this for upper neighbors. A 2-D block is numbered as
//!
//! ```text
//!  j
//!  ^  | 9 | 13 | 18 | 24 |
//!  |  | 5 |  8 | 12 | 17 |
//!  |  | 2 |  4 |  7 | 11 |
//!  |  | 0 |  1 |  3 |  6 | 10 | ...
//!  +-----------------------------> i
//! ```

use crate::grid::index::{CellIndex, Extents};

/// Visit order of the physical cells of one block, plane by plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HyperplaneOrder {
    extents: Extents,
    cells: Vec<CellIndex>,
}

impl HyperplaneOrder {
    /// Within a plane cells are listed k-major, then by j; `i` follows.
    pub fn new(extents: Extents) -> Self {
        let mut cells = Vec::with_capacity(extents.num_cells());
        let (ni, nj, nk) = (extents.ni, extents.nj, extents.nk);
        if extents.num_cells() > 0 {
            for p in 0..=(ni - 1 + nj - 1 + nk - 1) {
                for k in 0..nk.min(p + 1) {
                    for j in 0..nj.min(p - k + 1) {
                        let i = p - k - j;
                        if i < ni {
                            cells.push(CellIndex::new(i, j, k));
                        }
                    }
                }
            }
        }
        debug_assert_eq!(cells.len(), extents.num_cells());
        Self { extents, cells }
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// True when the order was computed for a block of these extents.
    pub fn matches(&self, extents: Extents) -> bool {
        self.extents == extents
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[CellIndex] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CellIndex> {
        self.cells.iter()
    }

    /// Number of distinct hyperplanes.
    pub fn plane_count(&self) -> usize {
        self.cells.last().map_or(0, |c| c.plane() + 1)
    }
}

impl<'a> IntoIterator for &'a HyperplaneOrder {
    type Item = &'a CellIndex;
    type IntoIter = std::slice::Iter<'a, CellIndex>;
    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
