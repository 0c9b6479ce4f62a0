//! Input options for the implicit relaxation.
//!
//! This module provides the `SolverOptions` struct, the subset of the flow
//! solver's input that the linear solver consumes: the equation layout, the
//! implicit time-integration coefficient θ, seeding and dual-time switches,
//! the diagonal relaxation factor ω, and which relaxation scheme to build.
//! It deserializes from any serde format; missing fields take defaults.

use crate::error::RelaxError;
use serde::{Deserialize, Serialize};

/// What the point-relaxation driver reports back from `relax`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointErrorReport {
    /// Per-sweep totals are computed but `relax` returns zero.
    #[default]
    Discarded,
    /// `relax` returns the last sweep's total, like LU-SGS.
    LastSweep,
}

/// Linear solver inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Relaxation scheme tag (lusgs, dplur).
    pub matrix_solver: String,
    /// Sweeps per nonlinear iteration requested by the driver.
    pub matrix_sweeps: usize,
    pub num_equations: usize,
    pub num_species: usize,
    /// Implicit time-integration coefficient θ.
    pub theta: f64,
    /// Seed the update with `D⁻¹·b` before the first sweep.
    pub matrix_requires_initialization: bool,
    /// Pseudo-time CFL number for dual time stepping; 0 disables it.
    pub dual_time_cfl: f64,
    /// Diagonal relaxation factor ω.
    pub matrix_relaxation: f64,
    pub point_error_report: PointErrorReport,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            matrix_solver: "lusgs".to_string(),
            matrix_sweeps: 1,
            num_equations: 5,
            num_species: 1,
            theta: 1.0,
            matrix_requires_initialization: false,
            dual_time_cfl: 0.0,
            matrix_relaxation: 1.0,
            point_error_report: PointErrorReport::default(),
        }
    }
}

impl SolverOptions {
    /// Variables per cell, `L = num_equations + num_species`.
    pub fn block_len(&self) -> usize {
        self.num_equations + self.num_species
    }

    pub fn theta_inv(&self) -> f64 {
        1.0 / self.theta
    }

    pub fn dual_time_enabled(&self) -> bool {
        self.dual_time_cfl > 0.0
    }

    pub fn validate(&self) -> Result<(), RelaxError> {
        if self.block_len() == 0 {
            return Err(RelaxError::InvalidConfig("no variables per cell".into()));
        }
        if !(self.theta.is_finite() && self.theta > 0.0) {
            return Err(RelaxError::InvalidConfig(format!("theta must be positive, got {}", self.theta)));
        }
        if !(self.matrix_relaxation.is_finite() && self.matrix_relaxation > 0.0) {
            return Err(RelaxError::InvalidConfig(format!(
                "matrix relaxation must be positive, got {}",
                self.matrix_relaxation
            )));
        }
        if !(self.dual_time_cfl.is_finite() && self.dual_time_cfl >= 0.0) {
            return Err(RelaxError::InvalidConfig(format!(
                "dual time CFL must be finite and non-negative, got {}",
                self.dual_time_cfl
            )));
        }
        Ok(())
    }
}
