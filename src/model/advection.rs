//! Linear advection model block.
//!
//! A constant-coefficient scalar advection operator applied to every variable
//! of the cell vector. Each face flux Jacobian is `c·I` with a dissipation-
//! scaled spectral radius, so off-diagonal products go through the same
//! approximate-Jacobian split as a real flow solver while the exact operator
//! stays known. Used to verify the relaxation schemes and to benchmark them.

use crate::config::SolverOptions;
use crate::core::jacobian::{FaceSide, SpectralRadius, approximate_flux_product};
use crate::core::traits::{FieldView, ResidualProvider};
use crate::core::var_array::VarArray;
use crate::grid::index::{CellIndex, Extents};
use crate::matrix::BlockDiagonal;
use faer::Mat;

#[derive(Clone, Debug)]
pub struct ModelBlock {
    extents: Extents,
    num_ghosts: usize,
    num_equations: usize,
    num_species: usize,
    residual: Vec<VarArray>,
    explicit_history: VarArray,
    dual_time_history: VarArray,
    time_term: f64,
    wave_speed: [f64; 3],
    face_area: f64,
    dissipation: f64,
}

impl ModelBlock {
    /// Unit wave speeds and face areas, dissipation factor 1.5, unit time
    /// term, zero residual and history.
    ///
    /// # Panics
    /// Panics without at least one ghost layer, which neighbor reads need.
    pub fn new(extents: Extents, num_ghosts: usize, num_equations: usize, num_species: usize) -> Self {
        assert!(num_ghosts >= 1, "model block needs a ghost layer");
        let zero = VarArray::new(num_equations, num_species);
        Self {
            extents,
            num_ghosts,
            num_equations,
            num_species,
            residual: vec![zero.clone(); extents.num_cells()],
            explicit_history: zero.clone(),
            dual_time_history: zero,
            time_term: 1.0,
            wave_speed: [1.0; 3],
            face_area: 1.0,
            dissipation: 1.5,
        }
    }

    pub fn with_residual(mut self, mut f: impl FnMut(CellIndex) -> Vec<f64>) -> Self {
        let nsp = self.num_species;
        self.residual = self
            .extents
            .cells()
            .map(|c| VarArray::from_vec(f(c), nsp))
            .collect();
        self
    }

    pub fn with_history(mut self, explicit: Vec<f64>, dual_time: Vec<f64>) -> Self {
        self.explicit_history = VarArray::from_vec(explicit, self.num_species);
        self.dual_time_history = VarArray::from_vec(dual_time, self.num_species);
        self
    }

    pub fn with_time_term(mut self, time_term: f64) -> Self {
        self.time_term = time_term;
        self
    }

    pub fn with_wave_speed(mut self, wave_speed: [f64; 3]) -> Self {
        self.wave_speed = wave_speed;
        self
    }

    pub fn with_face_area(mut self, face_area: f64) -> Self {
        self.face_area = face_area;
        self
    }

    pub fn with_dissipation(mut self, dissipation: f64) -> Self {
        self.dissipation = dissipation;
        self
    }

    fn radius(&self, axis: usize) -> f64 {
        self.dissipation * self.wave_speed[axis].abs() * self.face_area
    }

    /// Scalar weights of the neighbor values in the lower and upper
    /// contributions, per axis: `0.5·(c·S ± ρ)`.
    pub fn coefficients(&self) -> ([f64; 3], [f64; 3]) {
        let mut lower = [0.0; 3];
        let mut upper = [0.0; 3];
        for axis in 0..3 {
            let flux = self.wave_speed[axis] * self.face_area;
            lower[axis] = 0.5 * (flux + self.radius(axis));
            upper[axis] = 0.5 * (flux - self.radius(axis));
        }
        (lower, upper)
    }

    /// Write the spectral-radius part of the implicit operator, `Σρ·I`.
    pub fn seed_diagonal(&self, diagonal: &mut BlockDiagonal) {
        let n = diagonal.block_len();
        for cell in self.extents.cells() {
            let sum = self.spectral_radius(cell).sum();
            diagonal.set_block(cell, Mat::from_fn(n, n, |i, j| if i == j { sum } else { 0.0 }));
        }
    }

    fn neighbor_product<F: FieldView>(&self, cell: CellIndex, x: &F, side: FaceSide) -> VarArray {
        let step: isize = match side {
            FaceSide::Lower => -1,
            FaceSide::Upper => 1,
        };
        let mut acc = VarArray::new(self.num_equations, self.num_species);
        for (axis, (di, dj, dk)) in [(step, 0, 0), (0, step, 0), (0, 0, step)].into_iter().enumerate() {
            let (i, j, k) = cell.offset(di, dj, dk);
            let du = VarArray::from_slice(x.at(i, j, k), self.num_species);
            let flux_change = du.clone() * self.wave_speed[axis];
            acc += approximate_flux_product(&flux_change, self.face_area, self.radius(axis), &du, side);
        }
        acc
    }
}

impl ResidualProvider for ModelBlock {
    type Physics = ();

    fn extents(&self) -> Extents {
        self.extents
    }

    fn num_ghosts(&self) -> usize {
        self.num_ghosts
    }

    fn residual(&self, cell: CellIndex) -> VarArray {
        self.residual[self.extents.linear(cell)].clone()
    }

    fn explicit_history(&self, _cell: CellIndex, _opts: &SolverOptions) -> VarArray {
        self.explicit_history.clone()
    }

    fn dual_time_history(&self, _cell: CellIndex, _opts: &SolverOptions, _phys: &()) -> VarArray {
        self.dual_time_history.clone()
    }

    fn diagonal_time_term(&self, _cell: CellIndex, _opts: &SolverOptions) -> f64 {
        self.time_term
    }

    fn spectral_radius(&self, _cell: CellIndex) -> SpectralRadius {
        SpectralRadius::new(self.radius(0), self.radius(1), self.radius(2))
    }

    fn lower_contribution<F: FieldView>(
        &self,
        cell: CellIndex,
        x: &F,
        _phys: &(),
        _opts: &SolverOptions,
    ) -> VarArray {
        self.neighbor_product(cell, x, FaceSide::Lower)
    }

    fn upper_contribution<F: FieldView>(
        &self,
        cell: CellIndex,
        x: &F,
        _phys: &(),
        _opts: &SolverOptions,
    ) -> VarArray {
        self.neighbor_product(cell, x, FaceSide::Upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::field::UnknownField;
    use approx::assert_relative_eq;

    #[test]
    fn contributions_use_the_split_coefficients() {
        let e = Extents::new(3, 3, 3);
        let blk = ModelBlock::new(e, 1, 1, 0).with_wave_speed([1.0, 2.0, 0.5]);
        let mut x = UnknownField::zeros(e, 1, 1, 0);
        x.insert_block(CellIndex::new(0, 1, 1), &VarArray::from_vec(vec![2.0], 0));
        x.insert_block(CellIndex::new(1, 2, 1), &VarArray::from_vec(vec![3.0], 0));
        let (lower, upper) = blk.coefficients();
        let opts = SolverOptions::default();
        let c = CellIndex::new(1, 1, 1);
        let l = blk.lower_contribution(c, &x, &(), &opts);
        let u = blk.upper_contribution(c, &x, &(), &opts);
        assert_relative_eq!(l[0], lower[0] * 2.0);
        assert_relative_eq!(u[0], upper[1] * 3.0);
        assert!(upper[1] < 0.0);
    }
}
