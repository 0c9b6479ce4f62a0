//! Matrix module: the per-cell block-diagonal implicit operator.

pub mod block_diagonal;
pub use block_diagonal::BlockDiagonal;
