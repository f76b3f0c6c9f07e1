//! Market data sources.
//!
//! The engine only depends on [`DataProvider`]; how a snapshot is produced
//! (simulation, a file on disk, a fixed value) is up to the adapter.

mod file;
mod fixed;
mod simulated;

pub use file::JsonFileProvider;
pub use fixed::StaticProvider;
pub use simulated::{SimulatedProvider, apply_move};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::MarketSnapshot;

/// Supplies a fresh snapshot on demand.
///
/// `previous` is the engine's current snapshot, if any. Providers may build
/// on it (e.g. to simulate a bounded move) or ignore it. Providers bound
/// their own latency unless the scheduler is given a fetch timeout.
#[async_trait]
pub trait DataProvider: Send + Sync + 'static {
    async fn fetch(
        &self,
        previous: Option<Arc<MarketSnapshot>>,
    ) -> Result<MarketSnapshot, ProviderError>;
}
