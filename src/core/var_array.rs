//! Per-cell vector of flow and species variables.
//!
//! A `VarArray` holds the `L = num_equations + num_species` unknowns of one
//! cell. It is the currency between the residual provider, the diagonal
//! operator and the unknown field, and doubles as the squared-error
//! accumulator of a sweep.

use num_traits::Float;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

#[derive(Clone, Debug, PartialEq)]
pub struct VarArray<T = f64> {
    data: Vec<T>,
    num_species: usize,
}

impl<T: Float> VarArray<T> {
    /// Zero-filled array with `num_equations + num_species` entries.
    pub fn new(num_equations: usize, num_species: usize) -> Self {
        Self::filled(num_equations, num_species, T::zero())
    }

    pub fn filled(num_equations: usize, num_species: usize, value: T) -> Self {
        Self { data: vec![value; num_equations + num_species], num_species }
    }

    /// Wrap existing storage; the trailing `num_species` entries are species.
    pub fn from_vec(data: Vec<T>, num_species: usize) -> Self {
        assert!(num_species <= data.len(), "more species than variables");
        Self { data, num_species }
    }

    pub fn from_slice(data: &[T], num_species: usize) -> Self {
        Self::from_vec(data.to_vec(), num_species)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn num_species(&self) -> usize {
        self.num_species
    }

    pub fn num_equations(&self) -> usize {
        self.data.len() - self.num_species
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Sum of all entries; used to reduce the error accumulator to a scalar.
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &v| acc + v)
    }

    /// Elementwise square.
    pub fn squared(&self) -> Self {
        Self {
            data: self.data.iter().map(|&v| v * v).collect(),
            num_species: self.num_species,
        }
    }

    pub fn scale(&mut self, factor: T) {
        self.data.iter_mut().for_each(|v| *v = *v * factor);
    }

    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value);
    }

    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &v| acc.max(v.abs()))
    }

    fn zip_with(mut self, rhs: &Self, f: impl Fn(T, T) -> T) -> Self {
        assert_eq!(self.len(), rhs.len(), "VarArray length mismatch");
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = f(*a, b);
        }
        self
    }
}

impl<T> Index<usize> for VarArray<T> {
    type Output = T;
    fn index(&self, idx: usize) -> &T {
        &self.data[idx]
    }
}

impl<T> IndexMut<usize> for VarArray<T> {
    fn index_mut(&mut self, idx: usize) -> &mut T {
        &mut self.data[idx]
    }
}

impl<T> AsRef<[T]> for VarArray<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T> AsMut<[T]> for VarArray<T> {
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Float> Add for VarArray<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl<T: Float> Add<&VarArray<T>> for VarArray<T> {
    type Output = Self;
    fn add(self, rhs: &VarArray<T>) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Float> Sub for VarArray<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl<T: Float> Sub<&VarArray<T>> for VarArray<T> {
    type Output = Self;
    fn sub(self, rhs: &VarArray<T>) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }
}

/// Elementwise product.
impl<T: Float> Mul for VarArray<T> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.zip_with(&rhs, |a, b| a * b)
    }
}

impl<T: Float> Mul<T> for VarArray<T> {
    type Output = Self;
    fn mul(mut self, rhs: T) -> Self {
        self.scale(rhs);
        self
    }
}

impl<T: Float> Neg for VarArray<T> {
    type Output = Self;
    fn neg(mut self) -> Self {
        self.data.iter_mut().for_each(|v| *v = -*v);
        self
    }
}

impl<T: Float> AddAssign<&VarArray<T>> for VarArray<T> {
    fn add_assign(&mut self, rhs: &VarArray<T>) {
        assert_eq!(self.len(), rhs.len(), "VarArray length mismatch");
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a + b;
        }
    }
}

impl<T: Float> AddAssign for VarArray<T> {
    fn add_assign(&mut self, rhs: Self) {
        *self += &rhs;
    }
}

impl<T: Float> SubAssign<&VarArray<T>> for VarArray<T> {
    fn sub_assign(&mut self, rhs: &VarArray<T>) {
        assert_eq!(self.len(), rhs.len(), "VarArray length mismatch");
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a - b;
        }
    }
}

impl<T: Float> SubAssign for VarArray<T> {
    fn sub_assign(&mut self, rhs: Self) {
        *self -= &rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_accumulator_sums_squares() {
        let x = VarArray::from_vec(vec![1.0, -2.0, 3.0], 1);
        let xold = VarArray::from_vec(vec![0.5, 0.0, 3.0], 1);
        let mut acc = VarArray::<f64>::new(2, 1);
        let err = x - &xold;
        acc += err.clone() * err;
        assert_eq!(acc.as_slice(), &[0.25, 4.0, 0.0]);
        assert_eq!(acc.sum(), 4.25);
        assert_eq!(acc.num_equations(), 2);
    }

    #[test]
    fn scalar_ops_keep_species_split() {
        let r = VarArray::from_vec(vec![2.0_f64, 4.0], 1) * -0.5;
        assert_eq!(r.as_slice(), &[-1.0, -2.0]);
        assert_eq!(r.num_species(), 1);
        assert_eq!((-r).max_abs(), 2.0);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn mismatched_lengths_panic() {
        let _ = VarArray::<f64>::new(2, 0) + VarArray::<f64>::new(3, 0);
    }
}
