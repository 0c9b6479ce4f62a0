//! Sweep statistics reported by the relaxation drivers.

/// Outcome of one `relax` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelaxStats<T = f64> {
    /// Sweeps performed; always the requested count.
    pub sweeps: usize,
    /// Scalar handed back to the nonlinear driver.
    pub reported_error: T,
    /// Squared-update norm summed over all local blocks, one entry per sweep.
    pub history: Vec<T>,
}

impl<T: Copy + num_traits::Float> RelaxStats<T> {
    pub fn with_capacity(sweeps: usize) -> Self {
        Self { sweeps: 0, reported_error: T::zero(), history: Vec::with_capacity(sweeps) }
    }

    pub fn record(&mut self, sweep_error: T) {
        self.sweeps += 1;
        self.history.push(sweep_error);
    }

    /// Total of the final sweep, zero if no sweep ran.
    pub fn last_sweep(&self) -> T {
        self.history.last().copied().unwrap_or_else(T::zero)
    }

    /// Ratio of the last to the first sweep total, if both are available.
    pub fn reduction(&self) -> Option<T> {
        match (self.history.first(), self.history.last()) {
            (Some(&first), Some(&last)) if self.history.len() > 1 && first > T::zero() => {
                Some(last / first)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_sweep_and_reduction() {
        let mut s = RelaxStats::<f64>::with_capacity(3);
        assert_eq!(s.last_sweep(), 0.0);
        assert_eq!(s.reduction(), None);
        s.record(4.0);
        s.record(1.0);
        assert_eq!(s.sweeps, 2);
        assert_eq!(s.last_sweep(), 1.0);
        assert_eq!(s.reduction(), Some(0.25));
    }
}
