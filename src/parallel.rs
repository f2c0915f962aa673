//! Thread pool configuration for the parallel reductions and resampling

use crate::errors::{Result, RuClimError};
use rayon::ThreadPoolBuilder;

/// Configuration of Rayon's global thread pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParallelConfig {
    /// `None` leaves Rayon's default of one thread per core
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    #[must_use]
    pub const fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Configuration using every available CPU core
    #[must_use]
    pub fn all_cores() -> Self {
        Self::with_threads(num_cpus::get())
    }

    #[must_use]
    pub const fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Builds the global pool.
    ///
    /// # Errors
    ///
    /// Returns [`RuClimError::ThreadPoolError`] for a zero thread count or if
    /// the global pool was already built.
    pub fn setup_global_pool(&self) -> Result<()> {
        let Some(num_threads) = self.num_threads else {
            tracing::debug!(threads = rayon::current_num_threads(), "using default thread pool");
            return Ok(());
        };

        if num_threads == 0 {
            return Err(RuClimError::ThreadPoolError(
                "thread count must be at least 1".to_string(),
            ));
        }

        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                RuClimError::ThreadPoolError(format!(
                    "Failed to initialize thread pool with {num_threads} threads: {e}"
                ))
            })?;

        println!("✅ Configured parallel processing with {num_threads} threads");
        Ok(())
    }

    /// Threads in the pool currently in use
    #[must_use]
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }
}

/// Information about the parallel processing environment
#[derive(Debug, Clone, Copy)]
pub struct ParallelInfo {
    pub current_threads: usize,
    pub available_cores: usize,
    pub available_parallelism: usize,
}

impl ParallelInfo {
    #[must_use]
    pub fn collect() -> Self {
        Self {
            current_threads: rayon::current_num_threads(),
            available_cores: num_cpus::get(),
            available_parallelism: std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
        }
    }

    pub fn print_info(&self) {
        println!("📊 Parallel Processing Information:");
        println!("   Current threads: {}", self.current_threads);
        println!("   Available CPU cores: {}", self.available_cores);
        println!("   Available parallelism: {}", self.available_parallelism);
    }
}
