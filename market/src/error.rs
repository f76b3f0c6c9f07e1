use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Reason a snapshot fails the data-model invariants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("rsi {0} outside [0, 100]")]
    RsiOutOfRange(f64),

    #[error("history is empty")]
    EmptyHistory,

    #[error("history out of order at position {position}: {previous:?} then {label:?}")]
    HistoryOutOfOrder {
        position: usize,
        previous: String,
        label: String,
    },

    #[error("field {0} is not a finite number")]
    NonFinite(&'static str),
}

/// Failure reported by a [`DataProvider`](crate::provider::DataProvider).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network failure, timeout, rate limit: no snapshot could be produced.
    #[error("market data unavailable: {0}")]
    Unavailable(String),

    /// A payload arrived but violates the snapshot invariants.
    #[error("malformed market data: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Unavailable(_) => ErrorKind::Unavailable,
            ProviderError::Malformed(_) => ErrorKind::Malformed,
        }
    }
}

impl From<SnapshotError> for ProviderError {
    fn from(err: SnapshotError) -> Self {
        ProviderError::Malformed(err.to_string())
    }
}

/// Diagnostic kind kept in engine state after a failed refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Unavailable,
    Malformed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unavailable => f.write_str("unavailable"),
            ErrorKind::Malformed => f.write_str("malformed"),
        }
    }
}
