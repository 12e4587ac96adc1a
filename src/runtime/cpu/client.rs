//! CPU client implementation

use super::device::CpuDevice;
use super::runtime::CpuRuntime;
use crate::runtime::RuntimeClient;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Default minimum number of elements handed to one rayon task
const DEFAULT_MIN_LEN: usize = 4096;

/// Thread-count and chunking knobs for CPU kernels
///
/// `None` fields fall back to the rayon global pool and the built-in
/// chunk size respectively.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    /// Number of worker threads (None = rayon global pool)
    pub num_threads: Option<usize>,
    /// Minimum elements per parallel task
    pub chunk_size: Option<usize>,
}

impl ParallelismConfig {
    /// Create a new parallelism configuration
    pub fn new(num_threads: Option<usize>, chunk_size: Option<usize>) -> Self {
        Self {
            num_threads,
            chunk_size,
        }
    }
}

/// CPU client for operation dispatch
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    parallelism: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a new CPU client
    pub fn new(device: CpuDevice) -> Self {
        Self {
            device,
            parallelism: ParallelismConfig::default(),
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Return a client using the given parallelism configuration
    ///
    /// A dedicated thread pool is built when `num_threads` is set. If the
    /// pool cannot be created the client keeps using the global pool.
    pub fn with_parallelism(mut self, config: ParallelismConfig) -> Self {
        self.parallelism = config;
        #[cfg(feature = "rayon")]
        {
            self.pool = config.num_threads.and_then(|n| {
                match rayon::ThreadPoolBuilder::new().num_threads(n).build() {
                    Ok(pool) => Some(Arc::new(pool)),
                    Err(err) => {
                        log::warn!("failed to build {n}-thread pool, using global pool: {err}");
                        None
                    }
                }
            });
        }
        self
    }

    /// Current parallelism configuration
    pub fn parallelism(&self) -> ParallelismConfig {
        self.parallelism
    }

    /// Minimum number of elements per rayon task
    #[inline]
    pub fn rayon_min_len(&self) -> usize {
        self.parallelism.chunk_size.unwrap_or(DEFAULT_MIN_LEN).max(1)
    }

    /// Run `f` inside this client's thread pool
    #[cfg(feature = "rayon")]
    pub fn install_parallelism<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // CPU operations are synchronous, nothing to do
    }
}
