use std::collections::TryReserveError;

use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, ThisError, PartialEq, Clone)]
pub enum Error {
    /// A bucket array of the requested size could not be allocated.
    #[error("out of memory allocating {buckets} buckets")]
    OutOfMemory { buckets: usize },

    #[error("invalid capacity: {0}")]
    InvalidCapacity(usize),

    #[error("growth factor must be finite and greater than 1, got {0}")]
    InvalidGrowthFactor(f64),

    #[error("chain length threshold must be at least 1")]
    InvalidThreshold,
}

impl Error {
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub(crate) fn out_of_memory(buckets: usize, error: TryReserveError) -> Self {
        log::debug!("failed to reserve {buckets} buckets: {error}");
        Error::OutOfMemory { buckets }
    }
}
