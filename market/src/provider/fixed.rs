use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::DataProvider;
use crate::error::ProviderError;
use crate::types::MarketSnapshot;

/// Always answers with the same readings, stamped with the fetch time.
#[derive(Clone, Debug)]
pub struct StaticProvider {
    snapshot: MarketSnapshot,
}

impl StaticProvider {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for StaticProvider {
    fn default() -> Self {
        Self::new(MarketSnapshot::seed())
    }
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn fetch(
        &self,
        _previous: Option<Arc<MarketSnapshot>>,
    ) -> Result<MarketSnapshot, ProviderError> {
        Ok(MarketSnapshot {
            captured_at: Utc::now(),
            ..self.snapshot.clone()
        })
    }
}
