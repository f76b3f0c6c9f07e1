pub mod error;
pub mod provider;
pub mod signal;
pub mod types;

pub use error::{ErrorKind, ProviderError, SnapshotError};
pub use provider::DataProvider;
pub use signal::{Recommendation, SignalTally, evaluate};
pub use types::MarketSnapshot;
