//! Pieces shared by every relaxation scheme: the right-hand side, the
//! diagonal construction and inversion, and the seeded initial update.

use crate::config::SolverOptions;
use crate::core::traits::ResidualProvider;
use crate::core::var_array::VarArray;
use crate::error::RelaxError;
use crate::grid::field::UnknownField;
use crate::grid::index::CellIndex;
use crate::matrix::BlockDiagonal;

/// `b = −(1/θ)·R + explicit history − dual-time history` at one cell.
pub fn right_hand_side<B: ResidualProvider>(
    blk: &B,
    cell: CellIndex,
    opts: &SolverOptions,
    phys: &B::Physics,
    theta_inv: f64,
) -> VarArray {
    blk.residual(cell) * (-theta_inv) + blk.explicit_history(cell, opts)
        - blk.dual_time_history(cell, opts, phys)
}

/// Finish and invert the implicit operator's diagonal for one block.
///
/// On entry `diagonal` holds the flux-Jacobian part assembled by the driver.
/// Each block is scaled on its diagonal by ω, receives the volume/time term
/// (plus `ρ_max / CFL_τ` under dual time stepping) and is inverted in place.
/// Ghost cells have no diagonal and are never visited.
pub fn invert_diagonal<B: ResidualProvider>(
    blk: &B,
    opts: &SolverOptions,
    diagonal: &mut BlockDiagonal,
) -> Result<(), RelaxError> {
    if diagonal.extents() != blk.extents() {
        return Err(RelaxError::ExtentMismatch {
            what: "diagonal",
            expected: blk.extents(),
            found: diagonal.extents(),
        });
    }
    if diagonal.block_len() != opts.block_len() {
        return Err(RelaxError::mismatch(
            "variables per cell",
            opts.block_len(),
            diagonal.block_len(),
        ));
    }

    for cell in blk.extents().cells() {
        let mut diag_vol_time = blk.diagonal_time_term(cell, opts);
        if opts.dual_time_enabled() {
            // equal to volume / tau
            diag_vol_time += blk.spectral_radius(cell).max() / opts.dual_time_cfl;
        }
        diagonal.multiply_on_diagonal(cell, opts.matrix_relaxation);
        diagonal.add_on_diagonal(cell, diag_vol_time);
        diagonal.invert(cell)?;
    }
    Ok(())
}

/// Zero update over the block (ghosts included), seeded with `D⁻¹·b` in every
/// physical cell when the options ask for it.
///
/// # Errors
/// `CellNotInverted` if `a_inv` still holds an uninverted block.
pub fn initialize_matrix_update<B: ResidualProvider>(
    blk: &B,
    opts: &SolverOptions,
    phys: &B::Physics,
    a_inv: &BlockDiagonal,
) -> Result<UnknownField, RelaxError> {
    a_inv.ensure_inverted()?;
    let mut x = UnknownField::zeros(
        blk.extents(),
        blk.num_ghosts(),
        opts.num_equations,
        opts.num_species,
    );

    if opts.matrix_requires_initialization {
        let theta_inv = opts.theta_inv();
        for cell in blk.extents().cells() {
            let b = right_hand_side(blk, cell, opts, phys, theta_inv);
            x.insert_block(cell, &a_inv.apply_inverse(cell, &b));
        }
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::FieldView;
    use crate::grid::index::Extents;
    use crate::model::ModelBlock;
    use approx::assert_relative_eq;

    fn opts(seeded: bool) -> SolverOptions {
        SolverOptions {
            num_equations: 1,
            num_species: 0,
            theta: 0.5,
            matrix_requires_initialization: seeded,
            ..Default::default()
        }
    }

    #[test]
    fn rhs_combines_residual_and_history() {
        let blk = ModelBlock::new(Extents::new(1, 1, 1), 1, 1, 0)
            .with_residual(|_| vec![2.0])
            .with_history(vec![1.0], vec![0.25]);
        let o = opts(false);
        let b = right_hand_side(&blk, CellIndex::new(0, 0, 0), &o, &(), o.theta_inv());
        assert_relative_eq!(b[0], -4.0 + 1.0 - 0.25);
    }

    #[test]
    fn diagonal_gets_relaxation_time_and_dual_time_terms() {
        let e = Extents::new(2, 1, 1);
        let blk = ModelBlock::new(e, 1, 1, 0).with_time_term(3.0);
        let mut d = BlockDiagonal::new(e, 1);
        blk.seed_diagonal(&mut d);
        let base = blk.spectral_radius(CellIndex::new(0, 0, 0));
        let o = SolverOptions { matrix_relaxation: 0.5, dual_time_cfl: 2.0, ..opts(false) };
        invert_diagonal(&blk, &o, &mut d).unwrap();
        let expected = 0.5 * base.sum() + 3.0 + base.max() / 2.0;
        assert_relative_eq!(d.block(CellIndex::new(1, 0, 0))[(0, 0)], 1.0 / expected, epsilon = 1e-14);
    }

    #[test]
    fn singular_diagonal_is_reported() {
        let e = Extents::new(1, 1, 1);
        let blk = ModelBlock::new(e, 1, 1, 0).with_time_term(0.0);
        let mut d = BlockDiagonal::new(e, 1);
        let err = invert_diagonal(&blk, &opts(false), &mut d).unwrap_err();
        assert_eq!(err, RelaxError::SingularBlock { i: 0, j: 0, k: 0 });
    }

    #[test]
    fn diagonal_size_mismatch_is_structural() {
        let blk = ModelBlock::new(Extents::new(2, 2, 1), 1, 1, 0);
        let mut d = BlockDiagonal::new(Extents::new(2, 1, 1), 1);
        assert!(matches!(
            invert_diagonal(&blk, &opts(false), &mut d),
            Err(RelaxError::ExtentMismatch { .. })
        ));
    }

    #[test]
    fn seeding_only_when_requested() {
        let e = Extents::new(2, 2, 1);
        let blk = ModelBlock::new(e, 1, 1, 0).with_residual(|c| vec![1.0 + c.i as f64]);
        let mut d = BlockDiagonal::new(e, 1);
        blk.seed_diagonal(&mut d);
        invert_diagonal(&blk, &opts(true), &mut d).unwrap();

        let zero = initialize_matrix_update(&blk, &opts(false), &(), &d).unwrap();
        assert_eq!(zero.max_abs(), 0.0);

        let seeded = initialize_matrix_update(&blk, &opts(true), &(), &d).unwrap();
        for c in e.cells() {
            let b = right_hand_side(&blk, c, &opts(true), &(), 2.0);
            let expected = d.apply_inverse(c, &b);
            assert_relative_eq!(seeded.get(c), expected.as_slice());
        }
        assert_eq!(seeded.at(-1, 0, 0), &[0.0]);
    }
}
