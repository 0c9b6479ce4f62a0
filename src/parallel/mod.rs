//! Ghost-layer exchange between connected blocks and thread-pool setup.
//!
//! [`LocalHalo`] serves connections whose two sides live on the same process.
//! [`MpiHalo`] (feature `mpi`) additionally ships face layers to and from
//! other ranks. Both implement [`HaloExchange`](crate::core::HaloExchange).

use crate::core::traits::FieldView;
use crate::error::RelaxError;
use crate::grid::connection::Connection;
use crate::grid::field::UnknownField;
use crate::grid::index::BlockFace;

pub mod local_halo;
pub use local_halo::LocalHalo;

#[cfg(feature = "mpi")]
pub mod mpi_halo;
#[cfg(feature = "mpi")]
pub use mpi_halo::MpiHalo;

#[cfg(feature = "rayon")]
pub mod rayon_pool;
#[cfg(feature = "rayon")]
pub use rayon_pool::init_thread_pool;

/// Swap `num_ghosts` layers across a connection whose two sides are both in
/// `fields`. Both faces are packed before either is unpacked, so a block
/// connected to itself (periodic) reads its pre-exchange values.
pub(crate) fn swap_local(
    fields: &mut [UnknownField],
    conn: &Connection,
    num_ghosts: usize,
) -> Result<(), RelaxError> {
    let (a, b) = (conn.first, conn.second);
    let dims_a = face_dims(fields, a.block, a.face, num_ghosts)?;
    let dims_b = face_dims(fields, b.block, b.face, num_ghosts)?;
    if dims_a != dims_b {
        return Err(RelaxError::HaloExchange(format!(
            "faces {:?} of block {} ({}x{}) and {:?} of block {} ({}x{}) do not match",
            a.face, a.block, dims_a.0, dims_a.1, b.face, b.block, dims_b.0, dims_b.1
        )));
    }

    let from_a = fields[a.block].pack_face_layers(a.face, num_ghosts);
    let from_b = fields[b.block].pack_face_layers(b.face, num_ghosts);
    fields[b.block].unpack_ghost_layers(b.face, num_ghosts, &from_a)?;
    fields[a.block].unpack_ghost_layers(a.face, num_ghosts, &from_b)?;
    Ok(())
}

/// Tangential dimensions of a local face, after checking the block exists and
/// is deep enough to donate `layers` physical layers.
pub(crate) fn face_dims(
    fields: &[UnknownField],
    block: usize,
    face: BlockFace,
    layers: usize,
) -> Result<(usize, usize), RelaxError> {
    let field = fields.get(block).ok_or_else(|| {
        RelaxError::HaloExchange(format!(
            "connection names block {block} but only {} blocks are local",
            fields.len()
        ))
    })?;
    let extents = field.extents();
    let depth = extents.along(face.axis());
    if depth < layers {
        return Err(RelaxError::HaloExchange(format!(
            "block {block} has {depth} cells normal to {face:?}, {layers} layers requested"
        )));
    }
    Ok(face.tangential_dims(extents))
}
