//! Structured-block grid data: indices, fields, traversal orders, topology.

pub mod connection;
pub mod field;
pub mod hyperplane;
pub mod index;
pub mod level;

pub use connection::{Connection, Patch};
pub use field::{FieldSnapshot, UnknownField};
pub use hyperplane::HyperplaneOrder;
pub use index::{Axis, BlockFace, CellIndex, Extents};
pub use level::Level;
