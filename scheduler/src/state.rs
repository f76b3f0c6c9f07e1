//! Engine state owned by the refresh scheduler.
//!
//! Every transition builds a whole new value; nothing here is edited in
//! place. Readers get clones (the snapshot itself is shared via `Arc`).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use market::signal::display::{MetricStatuses, classify_metrics};
use market::{ErrorKind, MarketSnapshot, SignalTally, evaluate};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// Last known-good snapshot. Never empty, never partially updated.
    pub current: Arc<MarketSnapshot>,
    pub is_refreshing: bool,
    /// Time of the last successful refresh (construction time before that).
    pub last_updated: DateTime<Utc>,
    /// Kind of the most recent failure; cleared by the next success.
    pub last_error: Option<ErrorKind>,
}

impl EngineState {
    pub(crate) fn new(current: Arc<MarketSnapshot>, at: DateTime<Utc>) -> Self {
        Self {
            current,
            is_refreshing: false,
            last_updated: at,
            last_error: None,
        }
    }

    pub(crate) fn refreshing(&self) -> Self {
        Self {
            is_refreshing: true,
            ..self.clone()
        }
    }

    pub(crate) fn applied(&self, snapshot: Arc<MarketSnapshot>, at: DateTime<Utc>) -> Self {
        Self {
            current: snapshot,
            is_refreshing: false,
            last_updated: at,
            last_error: None,
        }
    }

    /// Keeps the previous snapshot and timestamp, records the failure.
    pub(crate) fn failed(&self, kind: ErrorKind) -> Self {
        Self {
            is_refreshing: false,
            last_error: Some(kind),
            ..self.clone()
        }
    }
}

/// What presentation sinks receive: the state plus everything derived
/// from its snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineView {
    pub state: EngineState,
    pub tally: SignalTally,
    pub metrics: MetricStatuses,
}

impl EngineView {
    pub fn from_state(state: EngineState) -> Self {
        let tally = evaluate(&state.current);
        let metrics = classify_metrics(&state.current);
        Self {
            state,
            tally,
            metrics,
        }
    }
}
