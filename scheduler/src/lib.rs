pub mod engine;
pub mod error;
pub mod sink;
pub mod state;
pub mod types;

pub use engine::RefreshScheduler;
pub use error::SchedulerError;
pub use sink::{PresentationSink, TracingSink};
pub use state::{EngineState, EngineView};
pub use types::{RefreshOutcome, SchedulerConfig, Trigger};
