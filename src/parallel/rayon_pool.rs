//! Global rayon pool used by the per-block and per-cell parallel loops.

/// Size the global rayon pool. `None` uses one thread per logical CPU.
///
/// The global pool can only be built once per process; later calls leave the
/// existing pool alone. Returns the number of threads actually in use.
pub fn init_thread_pool(threads: Option<usize>) -> usize {
    let requested = threads.unwrap_or_else(num_cpus::get).max(1);
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(requested)
        .build_global()
    {
        log::debug!("rayon pool already initialized: {err}");
    }
    rayon::current_num_threads()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_a_usable_pool() {
        assert!(init_thread_pool(Some(2)) >= 1);
        // second call keeps the first pool
        assert_eq!(init_thread_pool(None), rayon::current_num_threads());
    }
}
