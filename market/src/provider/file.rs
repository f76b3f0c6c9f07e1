use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::DataProvider;
use crate::error::ProviderError;
use crate::types::MarketSnapshot;

/// Reads a camelCase JSON snapshot document from disk on every fetch.
///
/// Whatever keeps the file current (a cron job, another process) is outside
/// the engine. A missing or unreadable file is `Unavailable`; a document
/// that does not parse is `Malformed`.
#[derive(Clone, Debug)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataProvider for JsonFileProvider {
    #[instrument(skip(self, _previous), fields(path = %self.path.display()), level = "debug")]
    async fn fetch(
        &self,
        _previous: Option<Arc<MarketSnapshot>>,
    ) -> Result<MarketSnapshot, ProviderError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ProviderError::Unavailable(format!("read {}: {}", self.path.display(), e))
        })?;

        let snapshot: MarketSnapshot = serde_json::from_str(&raw).map_err(|e| {
            ProviderError::Malformed(format!("parse {}: {}", self.path.display(), e))
        })?;

        debug!(
            price = snapshot.index.price,
            history_len = snapshot.history.len(),
            "snapshot loaded from file"
        );

        Ok(snapshot)
    }
}
