//! MPI-backed halo exchange.
//!
//! Connections are walked in the same global order on every rank, and each
//! inter-rank connection uses its position in that list as the message tag.
//! Of the two ranks a connection joins, the lower one sends first and then
//! receives; the higher one does the opposite. Together with the shared order
//! this keeps the blocking point-to-point calls from deadlocking.
//!
//! # Example
//! ```no_run
//! # #[cfg(feature = "mpi")] {
//! use hyperlu::parallel::MpiHalo;
//! let halo = MpiHalo::new().expect("MPI init");
//! println!("rank {} of {}", halo.rank(), halo.size());
//! # }
//! ```

use super::swap_local;
use crate::core::traits::HaloExchange;
use crate::error::RelaxError;
use crate::grid::connection::Connection;
use crate::grid::field::UnknownField;
use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

/// Halo exchange over `MPI_COMM_WORLD`.
///
/// Owns the MPI universe; MPI is finalized when this value is dropped.
pub struct MpiHalo {
    universe: Universe,
    rank: usize,
    size: usize,
}

impl MpiHalo {
    /// Initialize MPI.
    ///
    /// # Errors
    /// `RelaxError::Communication` if MPI is already initialized or fails to
    /// start.
    pub fn new() -> Result<Self, RelaxError> {
        let universe = mpi::initialize()
            .ok_or_else(|| RelaxError::Communication("MPI initialization failed".into()))?;
        let world = universe.world();
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        Ok(Self { universe, rank, size })
    }

    pub fn world(&self) -> SimpleCommunicator {
        self.universe.world()
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Synchronize all ranks.
    pub fn barrier(&self) {
        self.world().barrier();
    }
}

impl HaloExchange for MpiHalo {
    fn exchange(
        &self,
        fields: &mut [UnknownField],
        connections: &[Connection],
        rank: usize,
        num_ghosts: usize,
    ) -> Result<(), RelaxError> {
        if rank != self.rank {
            return Err(RelaxError::Communication(format!(
                "exchange called for rank {rank} on MPI rank {}",
                self.rank
            )));
        }
        if num_ghosts == 0 {
            return Ok(());
        }

        let world = self.world();
        for (n, conn) in connections.iter().enumerate() {
            if conn.is_local_to(rank) {
                swap_local(fields, conn, num_ghosts)?;
                continue;
            }
            let Some((local, remote)) = conn.split_for(rank) else {
                continue;
            };
            if remote.rank >= self.size {
                return Err(RelaxError::Communication(format!(
                    "connection {n} names rank {} but the job has {} ranks",
                    remote.rank, self.size
                )));
            }
            super::face_dims(fields, local.block, local.face, num_ghosts)?;

            let tag = i32::try_from(n)
                .map_err(|_| RelaxError::Communication(format!("connection index {n} exceeds tag range")))?;
            let send = fields[local.block].pack_face_layers(local.face, num_ghosts);
            let partner = world.process_at_rank(remote.rank as i32);

            let recv: Vec<f64> = if rank < remote.rank {
                partner.send_with_tag(&send[..], tag);
                partner.receive_vec_with_tag::<f64>(tag).0
            } else {
                let (recv, _status) = partner.receive_vec_with_tag::<f64>(tag);
                partner.send_with_tag(&send[..], tag);
                recv
            };
            fields[local.block].unpack_ghost_layers(local.face, num_ghosts, &recv)?;
        }
        log::trace!("mpi halo: rank {rank} exchanged {} connections", connections.len());
        Ok(())
    }
}
