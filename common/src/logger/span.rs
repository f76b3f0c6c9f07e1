use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{Span, field};

use super::TraceId;

/// Root span for a single refresh cycle.
///
/// `outcome` is left empty so the cycle can record it once it finishes.
pub fn cycle_span(trigger: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "refresh_cycle",
        trace_id = %trace_id,
        trigger = trigger,
        outcome = field::Empty
    )
}

/// Awaits `fut` and emits a warning under the `performance` target when it
/// took longer than `max`.
pub async fn warn_if_slow<F, T>(label: &'static str, max: Duration, fut: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let out = fut.await;
    let elapsed = start.elapsed();
    if elapsed > max {
        tracing::warn!(
            target: "performance",
            label = label,
            elapsed_ms = elapsed.as_millis() as u64,
            "slow operation detected"
        );
    }
    out
}
