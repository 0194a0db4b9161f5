use std::{num::NonZeroUsize, time::Duration};

/// Configuration of the [`Synchronizer`](crate::Synchronizer).
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// The maximum number of in-flight tasks per worker pool.
    pub max_inflight: usize,
    /// The delay between retries of a failed upstream request.
    pub retry_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_inflight: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
            retry_interval: Duration::from_millis(50),
        }
    }
}
