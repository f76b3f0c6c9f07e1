use tracing::info;

use crate::state::EngineView;

/// Consumer of engine transitions (a terminal, a UI bridge, a log).
///
/// Called once per transition, in order, from the refresh task. The only
/// way back into the engine is `RefreshScheduler::refresh_now`.
pub trait PresentationSink: Send + Sync {
    fn present(&self, view: &EngineView);
}

impl<F> PresentationSink for F
where
    F: Fn(&EngineView) + Send + Sync,
{
    fn present(&self, view: &EngineView) {
        self(view)
    }
}

/// Logs every transition as a structured event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl PresentationSink for TracingSink {
    fn present(&self, view: &EngineView) {
        let s = &view.state;
        info!(
            target: "presentation",
            refreshing = s.is_refreshing,
            price = s.current.index.price,
            overall = %view.tally.overall,
            bullish = view.tally.bullish,
            bearish = view.tally.bearish,
            neutral = view.tally.neutral,
            last_error = ?s.last_error,
            last_updated = %s.last_updated,
            "engine state"
        );
    }
}
