//! Shared builders for the integration tests: model levels and the dense
//! reference operator the relaxation schemes approximate.
#![allow(dead_code)]

use faer::Mat;
use faer::linalg::solvers::{FullPivLu, SolveCore};
use hyperlu::config::SolverOptions;
use hyperlu::core::{FieldView, ResidualProvider};
use hyperlu::grid::{CellIndex, Connection, Extents, Level, UnknownField};
use hyperlu::model::ModelBlock;
use hyperlu::parallel::LocalHalo;
use hyperlu::solver::right_hand_side;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type ModelLevel = Level<ModelBlock, LocalHalo>;

/// One equation, no species.
pub fn scalar_opts(seeded: bool) -> SolverOptions {
    SolverOptions {
        num_equations: 1,
        num_species: 0,
        matrix_requires_initialization: seeded,
        ..Default::default()
    }
}

/// Residual values in [-1, 1) drawn from a seeded generator.
pub fn random_values(seed: u64, n: usize) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| 2.0 * rng.r#gen::<f64>() - 1.0).collect()
}

/// Model block whose residual at `(i, j, k)` is taken from a field defined
/// over a larger domain, shifted by `i0` along i.
pub fn shifted_block(
    extents: Extents,
    i0: usize,
    global: Extents,
    values: &[f64],
    block_len: usize,
    num_species: usize,
) -> ModelBlock {
    ModelBlock::new(extents, 1, block_len - num_species, num_species).with_residual(|c| {
        let g = global.linear(CellIndex::new(c.i + i0, c.j, c.k));
        values[g * block_len..(g + 1) * block_len].to_vec()
    })
}

/// Level with spectral-radius diagonals, finished and inverted.
pub fn model_level(blocks: Vec<ModelBlock>, connections: Vec<Connection>, opts: &SolverOptions) -> ModelLevel {
    let mut level = Level::new(blocks, connections, LocalHalo, opts.block_len());
    level.seed_diagonals(|blk, d| blk.seed_diagonal(d));
    level.invert_diagonals(opts).unwrap();
    level
}

/// Dense operator of one model block with zero ghost values:
/// diagonal `ω·Σρ + time term`, lower neighbors `−0.5·(c·S + ρ)`, upper
/// neighbors `+0.5·(c·S − ρ)`, identical for every variable.
pub fn dense_operator(blk: &ModelBlock, opts: &SolverOptions) -> Mat<f64> {
    let e = blk.extents();
    let l = opts.block_len();
    let (lower, upper) = blk.coefficients();
    let mut a = Mat::<f64>::zeros(e.num_cells() * l, e.num_cells() * l);

    for c in e.cells() {
        let row = e.linear(c);
        let mut diag = opts.matrix_relaxation * blk.spectral_radius(c).sum() + blk.diagonal_time_term(c, opts);
        if opts.dual_time_enabled() {
            diag += blk.spectral_radius(c).max() / opts.dual_time_cfl;
        }
        let lower_nb = [
            (c.i > 0).then(|| CellIndex::new(c.i - 1, c.j, c.k)),
            (c.j > 0).then(|| CellIndex::new(c.i, c.j - 1, c.k)),
            (c.k > 0).then(|| CellIndex::new(c.i, c.j, c.k - 1)),
        ];
        let upper_nb = [
            CellIndex::new(c.i + 1, c.j, c.k),
            CellIndex::new(c.i, c.j + 1, c.k),
            CellIndex::new(c.i, c.j, c.k + 1),
        ];
        for v in 0..l {
            a[(row * l + v, row * l + v)] = diag;
            for axis in 0..3 {
                if let Some(nb) = lower_nb[axis] {
                    a[(row * l + v, e.linear(nb) * l + v)] = -lower[axis];
                }
                if e.contains(upper_nb[axis]) {
                    a[(row * l + v, e.linear(upper_nb[axis]) * l + v)] = upper[axis];
                }
            }
        }
    }
    a
}

/// Right-hand side of one block, cell-major.
pub fn dense_rhs(blk: &ModelBlock, opts: &SolverOptions) -> Vec<f64> {
    blk.extents()
        .cells()
        .flat_map(|c| right_hand_side(blk, c, opts, &(), opts.theta_inv()).as_slice().to_vec())
        .collect()
}

/// Exact solution of `a·x = b` by full-pivot LU.
pub fn dense_solve(a: &Mat<f64>, b: &[f64]) -> Vec<f64> {
    let lu = FullPivLu::new(a.as_ref());
    let mut x = b.to_vec();
    let n = x.len();
    let x_mat = faer::MatMut::from_column_major_slice_mut(&mut x, n, 1);
    lu.solve_in_place_with_conj(faer::Conj::No, x_mat);
    x
}

/// Physical values of a field, cell-major.
pub fn field_values(x: &UnknownField) -> Vec<f64> {
    x.extents().cells().flat_map(|c| x.get(c).to_vec()).collect()
}

/// Physical values of side-by-side blocks (stacked along i) in the merged
/// block's cell-major order.
pub fn merged_values(fields: &[UnknownField], merged: Extents) -> Vec<f64> {
    let l = fields[0].block_len();
    let mut out = vec![0.0; merged.num_cells() * l];
    let mut i0 = 0;
    for x in fields {
        for c in x.extents().cells() {
            let g = merged.linear(CellIndex::new(c.i + i0, c.j, c.k));
            out[g * l..(g + 1) * l].copy_from_slice(x.get(c));
        }
        i0 += x.extents().ni;
    }
    out
}

pub fn max_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
}
