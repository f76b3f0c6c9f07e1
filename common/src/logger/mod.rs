//! Logging bootstrap and span helpers shared by every crate in the workspace.

mod init;
mod span;
mod trace_id;

pub use init::init_logger;
pub use span::{cycle_span, warn_if_slow};
pub use trace_id::TraceId;
