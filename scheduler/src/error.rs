use market::{ProviderError, SnapshotError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("initial snapshot rejected: {0}")]
    InvalidSeed(#[from] SnapshotError),

    #[error("bootstrap fetch failed: {0}")]
    Bootstrap(#[from] ProviderError),

    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
}
