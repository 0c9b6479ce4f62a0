//! Unknown (solution update) field of one block, with ghost layers.

use crate::core::traits::FieldView;
use crate::core::var_array::VarArray;
use crate::error::RelaxError;
use crate::grid::index::{BlockFace, CellIndex, Extents};
use num_traits::Float;

/// Per-cell vectors over the physical extent plus `G` ghost layers.
///
/// Storage is a flat `Vec<T>`, i fastest, each cell holding `block_len`
/// contiguous values. Relaxation writes physical cells through
/// [`insert_block`](Self::insert_block); ghosts are only written by
/// [`unpack_ghost_layers`](Self::unpack_ghost_layers).
#[derive(Clone, Debug, PartialEq)]
pub struct UnknownField<T = f64> {
    extents: Extents,
    num_ghosts: usize,
    num_equations: usize,
    num_species: usize,
    data: Vec<T>,
}

impl<T: Float> UnknownField<T> {
    pub fn new(
        extents: Extents,
        num_ghosts: usize,
        num_equations: usize,
        num_species: usize,
        value: T,
    ) -> Self {
        let g2 = 2 * num_ghosts;
        let total = (extents.ni + g2) * (extents.nj + g2) * (extents.nk + g2);
        Self {
            extents,
            num_ghosts,
            num_equations,
            num_species,
            data: vec![value; total * (num_equations + num_species)],
        }
    }

    pub fn zeros(extents: Extents, num_ghosts: usize, num_equations: usize, num_species: usize) -> Self {
        Self::new(extents, num_ghosts, num_equations, num_species, T::zero())
    }

    pub fn num_equations(&self) -> usize {
        self.num_equations
    }

    fn offset(&self, i: isize, j: isize, k: isize) -> usize {
        let g = self.num_ghosts as isize;
        let (ni, nj, nk) = (
            self.extents.ni as isize,
            self.extents.nj as isize,
            self.extents.nk as isize,
        );
        assert!(
            (-g..ni + g).contains(&i) && (-g..nj + g).contains(&j) && (-g..nk + g).contains(&k),
            "index ({i}, {j}, {k}) outside field with {g} ghost layers"
        );
        let (si, sj) = ((ni + 2 * g) as usize, (nj + 2 * g) as usize);
        let cell = ((k + g) as usize * sj + (j + g) as usize) * si + (i + g) as usize;
        cell * self.block_len()
    }

    /// Copy of a physical cell's values.
    pub fn get_copy(&self, cell: CellIndex) -> VarArray<T> {
        VarArray::from_slice(self.get(cell), self.num_species)
    }

    /// Overwrite a physical cell.
    pub fn insert_block(&mut self, cell: CellIndex, value: &VarArray<T>) {
        assert!(self.extents.contains(cell), "insert_block on non-physical cell {cell}");
        assert_eq!(value.len(), self.block_len(), "cell vector has incorrect length");
        let (i, j, k) = cell.signed();
        let start = self.offset(i, j, k);
        let len = self.block_len();
        self.data[start..start + len].copy_from_slice(value.as_slice());
    }

    /// Immutable copy of the whole field, ghosts included.
    pub fn snapshot(&self) -> FieldSnapshot<T> {
        FieldSnapshot { inner: self.clone() }
    }

    /// Physical layers adjacent to `face`, flattened for transfer.
    pub fn pack_face_layers(&self, face: BlockFace, layers: usize) -> Vec<T> {
        let len = self.block_len();
        let indices = face.layer_indices(self.extents, layers, false);
        let mut buf = Vec::with_capacity(indices.len() * len);
        for (i, j, k) in indices {
            buf.extend_from_slice(self.at(i, j, k));
        }
        buf
    }

    /// Fill the ghost layers beyond `face` from a buffer produced by
    /// [`pack_face_layers`](Self::pack_face_layers) on the donor block.
    pub fn unpack_ghost_layers(
        &mut self,
        face: BlockFace,
        layers: usize,
        buf: &[T],
    ) -> Result<(), RelaxError> {
        if layers > self.num_ghosts {
            return Err(RelaxError::HaloExchange(format!(
                "{layers} layers requested but field holds {} ghost layers",
                self.num_ghosts
            )));
        }
        let len = self.block_len();
        let indices = face.layer_indices(self.extents, layers, true);
        if buf.len() != indices.len() * len {
            return Err(RelaxError::HaloExchange(format!(
                "halo buffer for {face:?} holds {} values, expected {}",
                buf.len(),
                indices.len() * len
            )));
        }
        for ((i, j, k), chunk) in indices.into_iter().zip(buf.chunks_exact(len)) {
            let start = self.offset(i, j, k);
            self.data[start..start + len].copy_from_slice(chunk);
        }
        Ok(())
    }

    /// Largest absolute value over the physical cells.
    pub fn max_abs(&self) -> T {
        self.extents
            .cells()
            .flat_map(|c| self.get(c).iter().copied())
            .fold(T::zero(), |acc, v| acc.max(v.abs()))
    }
}

impl<T: Float> FieldView<T> for UnknownField<T> {
    fn extents(&self) -> Extents {
        self.extents
    }
    fn num_ghosts(&self) -> usize {
        self.num_ghosts
    }
    fn num_species(&self) -> usize {
        self.num_species
    }
    fn block_len(&self) -> usize {
        self.num_equations + self.num_species
    }
    fn at(&self, i: isize, j: isize, k: isize) -> &[T] {
        let start = self.offset(i, j, k);
        &self.data[start..start + self.block_len()]
    }
}

/// Frozen copy of an [`UnknownField`] taken at the start of a point sweep.
///
/// Offers no mutators, so neighbor reads through it always see the previous
/// sweep's state.
#[derive(Clone, Debug)]
pub struct FieldSnapshot<T = f64> {
    inner: UnknownField<T>,
}

impl<T: Float> FieldSnapshot<T> {
    pub fn get_copy(&self, cell: CellIndex) -> VarArray<T> {
        self.inner.get_copy(cell)
    }
}

impl<T: Float> FieldView<T> for FieldSnapshot<T> {
    fn extents(&self) -> Extents {
        self.inner.extents
    }
    fn num_ghosts(&self) -> usize {
        self.inner.num_ghosts
    }
    fn num_species(&self) -> usize {
        self.inner.num_species
    }
    fn block_len(&self) -> usize {
        self.inner.block_len()
    }
    fn at(&self, i: isize, j: isize, k: isize) -> &[T] {
        self.inner.at(i, j, k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_read_back() {
        let mut x = UnknownField::<f64>::zeros(Extents::new(3, 2, 2), 2, 2, 1);
        let v = VarArray::from_vec(vec![1.0, 2.0, 3.0], 1);
        x.insert_block(CellIndex::new(2, 1, 0), &v);
        assert_eq!(x.get_copy(CellIndex::new(2, 1, 0)), v);
        assert_eq!(x.at(-2, -2, -2), &[0.0, 0.0, 0.0]);
        assert_eq!(x.at(4, 3, 3), &[0.0, 0.0, 0.0]);
        assert_eq!(x.max_abs(), 3.0);
    }

    #[test]
    fn snapshot_is_frozen() {
        let mut x = UnknownField::<f64>::zeros(Extents::new(1, 1, 1), 1, 1, 0);
        let snap = x.snapshot();
        x.insert_block(CellIndex::new(0, 0, 0), &VarArray::from_vec(vec![5.0], 0));
        assert_eq!(snap.get(CellIndex::new(0, 0, 0)), &[0.0]);
        assert_eq!(x.get(CellIndex::new(0, 0, 0)), &[5.0]);
    }

    #[test]
    fn pack_then_unpack_fills_ghosts() {
        let e = Extents::new(2, 2, 1);
        let mut donor = UnknownField::<f64>::zeros(e, 1, 1, 0);
        for c in e.cells() {
            donor.insert_block(c, &VarArray::from_vec(vec![(10 * c.i + c.j) as f64], 0));
        }
        let buf = donor.pack_face_layers(BlockFace::IMax, 1);
        assert_eq!(buf, vec![10.0, 11.0]);
        let mut recv = UnknownField::<f64>::zeros(e, 1, 1, 0);
        recv.unpack_ghost_layers(BlockFace::IMin, 1, &buf).unwrap();
        assert_eq!(recv.at(-1, 0, 0), &[10.0]);
        assert_eq!(recv.at(-1, 1, 0), &[11.0]);
        assert!(recv.unpack_ghost_layers(BlockFace::IMin, 2, &buf).is_err());
        assert!(recv.unpack_ghost_layers(BlockFace::IMin, 1, &buf[..1]).is_err());
    }

    #[test]
    #[should_panic(expected = "non-physical")]
    fn insert_into_ghost_panics() {
        let mut x = UnknownField::<f64>::zeros(Extents::new(1, 1, 1), 1, 1, 0);
        x.insert_block(CellIndex::new(1, 0, 0), &VarArray::from_vec(vec![1.0], 0));
    }
}
