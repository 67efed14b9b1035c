//! Explicit worker-pool handle for intra-step parallelism.
//!
//! A [`Workers`] value is created per solve call and threaded through the
//! Arnoldi step; there is no process-wide parallelism setting, so concurrent
//! solves in one process never interfere. With the `rayon` feature disabled
//! the handle degrades to inline execution.

/// Bounded worker pool for the orthogonalization fan-out.
pub struct Workers {
    #[cfg(feature = "rayon")]
    pool: Option<rayon::ThreadPool>,
}

impl Workers {
    /// Build a dedicated pool with `threads` workers (`None` sizes the pool
    /// by the available CPUs). Falls back to inline execution if the pool
    /// cannot be built.
    #[cfg(feature = "rayon")]
    pub fn new(threads: Option<usize>) -> Self {
        let threads = threads.unwrap_or_else(num_cpus::get);
        if threads <= 1 {
            return Self::serial();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .ok();
        Workers { pool }
    }

    #[cfg(not(feature = "rayon"))]
    pub fn new(_threads: Option<usize>) -> Self {
        Workers {}
    }

    /// A handle that always runs inline.
    pub fn serial() -> Self {
        Workers {
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Number of workers the fan-out will use.
    pub fn threads(&self) -> usize {
        #[cfg(feature = "rayon")]
        if let Some(pool) = &self.pool {
            return pool.current_num_threads();
        }
        1
    }

    /// Run `f` inside the pool, blocking until it completes. Inline when no
    /// pool is available.
    pub fn install<R: Send>(&self, f: impl FnOnce() -> R + Send) -> R {
        #[cfg(feature = "rayon")]
        if let Some(pool) = &self.pool {
            return pool.install(f);
        }
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_runs_inline() {
        let workers = Workers::serial();
        assert_eq!(workers.threads(), 1);
        assert_eq!(workers.install(|| 41 + 1), 42);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn pool_respects_thread_count() {
        let workers = Workers::new(Some(2));
        assert_eq!(workers.threads(), 2);
        assert_eq!(workers.install(|| 7 * 6), 42);
    }
}
