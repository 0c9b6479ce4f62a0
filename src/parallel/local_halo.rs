//! Shared-memory halo exchange.

use super::swap_local;
use crate::core::traits::HaloExchange;
use crate::error::RelaxError;
use crate::grid::connection::Connection;
use crate::grid::field::UnknownField;

/// Exchanges ghost layers between blocks owned by one process.
///
/// Connections that do not involve `rank` are skipped. A connection with only
/// one side on `rank` cannot be served without a communicator and is an
/// error.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalHalo;

impl HaloExchange for LocalHalo {
    fn exchange(
        &self,
        fields: &mut [UnknownField],
        connections: &[Connection],
        rank: usize,
        num_ghosts: usize,
    ) -> Result<(), RelaxError> {
        if num_ghosts == 0 {
            return Ok(());
        }
        for (n, conn) in connections.iter().enumerate() {
            if conn.is_local_to(rank) {
                swap_local(fields, conn, num_ghosts)?;
            } else if conn.touches_rank(rank) {
                return Err(RelaxError::HaloExchange(format!(
                    "connection {n} joins ranks {} and {}; local exchange only serves rank {rank}",
                    conn.first.rank, conn.second.rank
                )));
            }
        }
        log::trace!("local halo: {} connections on rank {rank}", connections.len());
        Ok(())
    }
}
