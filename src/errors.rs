//! Error types for reactive runtime operations

use thiserror::Error;

use crate::runtime::PartitionId;
use crate::state_machine::{PartitionState, TransitionError};

/// Errors that can occur while driving partitions and crossings
///
/// Errors inside a running pipeline never surface here; dynamic evaluation
/// reports them on its error branch instead.
#[derive(Debug, Error)]
pub enum ReactiveError {
    /// Work was offered to a partition that no longer accepts it
    #[error("Partition {partition} is {state} and cannot accept work")]
    PartitionUnavailable {
        partition: PartitionId,
        state: PartitionState,
    },

    /// Invalid lifecycle transition
    #[error("Partition lifecycle error: {0}")]
    Lifecycle(#[from] TransitionError),

    /// The background executor could not be built or joined
    #[error("Executor error: {0}")]
    Executor(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

/// Result type for reactive runtime operations
pub type ReactiveResult<T> = Result<T, ReactiveError>;

impl From<std::io::Error> for ReactiveError {
    fn from(err: std::io::Error) -> Self {
        ReactiveError::Executor(err.to_string())
    }
}
