//! Approximate flux Jacobians used to form off-diagonal products on the fly.
//!
//! LU-SGS never stores the off-diagonal blocks of the implicit operator. The
//! product of a face flux Jacobian with a neighbor update is approximated as
//!
//! ```text
//! A·S·Δu ≈ 0.5 · (ΔF·S ± K·Δu)
//! ```
//!
//! where `ΔF = Ac·Δu` is the change of the convective flux, `S` the face
//! area and `K` the (scaled) spectral radius. The `+` sign applies to a lower
//! neighbor and the `−` sign to an upper one; a larger `K` improves diagonal
//! dominance and stability at the cost of convergence rate.

use crate::core::var_array::VarArray;

/// Which side of the cell the neighbor lies on in the sweep order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceSide {
    Lower,
    Upper,
}

impl FaceSide {
    pub fn sign(self) -> f64 {
        match self {
            FaceSide::Lower => 1.0,
            FaceSide::Upper => -1.0,
        }
    }
}

/// Cell spectral radius per computational direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpectralRadius {
    pub i: f64,
    pub j: f64,
    pub k: f64,
}

impl SpectralRadius {
    pub const fn new(i: f64, j: f64, k: f64) -> Self {
        Self { i, j, k }
    }

    pub fn max(&self) -> f64 {
        self.i.max(self.j).max(self.k)
    }

    pub fn sum(&self) -> f64 {
        self.i + self.j + self.k
    }
}

/// Matrix-free product `0.5 · (ΔF·S ± K·Δu)` for one neighbor face.
pub fn approximate_flux_product(
    flux_change: &VarArray,
    face_area: f64,
    spectral_radius: f64,
    update: &VarArray,
    side: FaceSide,
) -> VarArray {
    let dissipation = update.clone() * (side.sign() * spectral_radius);
    (flux_change.clone() * face_area + dissipation) * 0.5
}
