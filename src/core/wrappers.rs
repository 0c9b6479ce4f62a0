//! Wrappers for faer dense matrix types acting on per-cell variable arrays.
//!
//! The inverted diagonal blocks are stored as `faer::Mat<f64>`; these impls let
//! them multiply a [`VarArray`] without leaving the kernel's vector type.

use crate::core::traits::MatVec;
use crate::core::var_array::VarArray;
use faer::{Mat, MatRef};

/// Implements matrix-vector multiplication for `faer::Mat`.
///
/// Computes `y = A * x` where `A` is a dense block and `x`, `y` cell vectors.
impl MatVec<VarArray> for Mat<f64> {
    fn matvec(&self, x: &VarArray, y: &mut VarArray) {
        self.as_ref().matvec(x, y);
    }
}

/// Implements matrix-vector multiplication for a matrix reference (`faer::MatRef`).
impl<'a> MatVec<VarArray> for MatRef<'a, f64> {
    fn matvec(&self, x: &VarArray, y: &mut VarArray) {
        assert_eq!(self.nrows(), y.len(), "Output vector y has incorrect length");
        assert_eq!(self.ncols(), x.len(), "Input vector x has incorrect length");
        for i in 0..self.nrows() {
            let mut acc = 0.0;
            for j in 0..self.ncols() {
                acc += self[(i, j)] * x[j];
            }
            y[i] = acc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_times_cell_vector() {
        let a = Mat::from_fn(2, 2, |i, j| (2 * i + j + 1) as f64);
        let x = VarArray::from_vec(vec![1.0, -1.0], 0);
        let mut y = VarArray::new(2, 0);
        a.matvec(&x, &mut y);
        assert_eq!(y.as_slice(), &[-1.0, -1.0]);
    }
}
