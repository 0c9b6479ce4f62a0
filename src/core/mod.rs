//! Core types and traits of the relaxation kernel.

pub mod jacobian;
pub mod traits;
pub mod var_array;
pub mod wrappers;

pub use jacobian::{FaceSide, SpectralRadius, approximate_flux_product};
pub use traits::{FieldView, GridLevel, HaloExchange, MatVec, PhysicsOf, ResidualProvider};
pub use var_array::VarArray;
