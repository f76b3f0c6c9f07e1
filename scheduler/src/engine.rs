//! The refresh scheduler.
//!
//! Owns the engine state and decides when the snapshot is refreshed:
//!   1. A ticker fires a refresh immediately on `start()` and then on a
//!      fixed interval until `stop()`.
//!   2. `refresh_now()` fires one out of band.
//!
//! Both triggers go through the same guard, so at most one fetch is ever in
//! flight; a trigger that arrives while one is running joins it instead.
//! Each cycle runs in its own task, which means stopping the ticker or
//! dropping a caller never aborts a fetch that has already started.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};

use chrono::Utc;
use common::logger::{TraceId, cycle_span, warn_if_slow};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use market::{DataProvider, ErrorKind, MarketSnapshot, ProviderError};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{Instrument, debug, field, info, warn};

use crate::error::SchedulerError;
use crate::sink::PresentationSink;
use crate::state::{EngineState, EngineView};
use crate::types::{RefreshOutcome, SchedulerConfig, Trigger};

type SharedOutcome = Shared<BoxFuture<'static, RefreshOutcome>>;

struct Ticker {
    epoch: u64,
    handle: JoinHandle<()>,
}

/// Guarded by one lock so that "is a cycle running?" and "start one" are a
/// single step for every trigger source.
#[derive(Default)]
struct Control {
    in_flight: Option<SharedOutcome>,
    ticker: Option<Ticker>,
    epoch: u64,
}

pub struct RefreshScheduler<P> {
    cfg: SchedulerConfig,
    provider: Arc<P>,

    /// Latest published view. The only copy of the engine state.
    view_tx: watch::Sender<EngineView>,

    sinks: RwLock<Vec<Arc<dyn PresentationSink>>>,

    /// Serializes publication so sinks see transitions in state order.
    publish_lock: Mutex<()>,

    control: Mutex<Control>,
}

impl<P: DataProvider> RefreshScheduler<P> {
    /// Creates a stopped scheduler whose state starts from `initial`.
    pub fn new(
        provider: Arc<P>,
        cfg: SchedulerConfig,
        initial: MarketSnapshot,
    ) -> Result<Arc<Self>, SchedulerError> {
        if cfg.refresh_interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        initial.validate()?;

        let state = EngineState::new(Arc::new(initial), Utc::now());
        let (view_tx, _) = watch::channel(EngineView::from_state(state));

        Ok(Arc::new(Self {
            cfg,
            provider,
            view_tx,
            sinks: RwLock::new(Vec::new()),
            publish_lock: Mutex::new(()),
            control: Mutex::new(Control::default()),
        }))
    }

    /// Creates a stopped scheduler seeded with a first fetch from `provider`.
    pub async fn bootstrap(
        provider: Arc<P>,
        cfg: SchedulerConfig,
    ) -> Result<Arc<Self>, SchedulerError> {
        let first = provider.fetch(None).await?;
        first
            .validate()
            .map_err(|e| SchedulerError::Bootstrap(e.into()))?;

        info!(price = first.index.price, "bootstrapped from provider");

        Self::new(provider, cfg, first)
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    /// Copy of the current engine state.
    pub fn state(&self) -> EngineState {
        self.view_tx.borrow().state.clone()
    }

    /// Copy of the current view (state plus derived tally and labels).
    pub fn view(&self) -> EngineView {
        self.view_tx.borrow().clone()
    }

    /// Receiver that always holds the latest view. Intermediate views may
    /// be skipped by a slow reader; use a sink to see every transition.
    pub fn subscribe(&self) -> watch::Receiver<EngineView> {
        self.view_tx.subscribe()
    }

    pub fn add_sink(&self, sink: Arc<dyn PresentationSink>) {
        self.sinks.write().push(sink);
    }

    pub fn is_running(&self) -> bool {
        self.control.lock().ticker.is_some()
    }

    /// Starts the periodic ticker. The first tick refreshes immediately.
    ///
    /// Returns `false` (and does nothing) when already started. Must be
    /// called from within a Tokio runtime.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut control = self.control.lock();
        if control.ticker.is_some() {
            debug!("refresh ticker already running");
            return false;
        }

        control.epoch += 1;
        let epoch = control.epoch;
        let every = self.cfg.refresh_interval;

        let span = tracing::info_span!("refresh_ticker", epoch);
        let handle = tokio::spawn(Self::run_ticker(Arc::downgrade(self), epoch).instrument(span));

        control.ticker = Some(Ticker { epoch, handle });

        info!(epoch, every_ms = every.as_millis() as u64, "refresh ticker started");
        true
    }

    /// Stops the periodic ticker.
    ///
    /// Once this returns no timer-driven cycle will start. A cycle already
    /// in flight runs to completion and its result is applied.
    pub fn stop(&self) -> bool {
        let mut control = self.control.lock();
        match control.ticker.take() {
            Some(ticker) => {
                ticker.handle.abort();
                info!(epoch = ticker.epoch, "refresh ticker stopped");
                true
            }
            None => false,
        }
    }

    /// Refreshes now, or joins the refresh already in flight and returns
    /// its outcome. Never runs two fetches at once.
    pub async fn refresh_now(self: &Arc<Self>) -> RefreshOutcome {
        let outcome = {
            let mut control = self.control.lock();
            self.begin(&mut control, Trigger::Manual)
        };
        outcome.await
    }

    async fn run_ticker(weak: Weak<Self>, epoch: u64) {
        let Some(every) = weak.upgrade().map(|e| e.cfg.refresh_interval) else {
            return;
        };

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(engine) = weak.upgrade() else {
                break;
            };

            let fired = {
                let mut control = engine.control.lock();
                let current = control.ticker.as_ref().map(|t| t.epoch);
                if current == Some(epoch) {
                    // Fire and forget: the cycle runs in its own task and a
                    // tick landing on an in-flight cycle simply joins it.
                    drop(engine.begin(&mut control, Trigger::Timer { epoch }));
                    true
                } else {
                    false
                }
            };

            if !fired {
                debug!("ticker superseded; exiting");
                break;
            }
        }
    }

    /// Joins the in-flight cycle or spawns a new one. Caller holds the
    /// control lock, which makes check-then-start atomic.
    fn begin(self: &Arc<Self>, control: &mut Control, trigger: Trigger) -> SharedOutcome {
        if let Some(in_flight) = &control.in_flight {
            debug!(trigger = trigger.as_str(), "refresh already in flight; joining");
            return in_flight.clone();
        }

        let trace_id = TraceId::new();
        let span = cycle_span(trigger.as_str(), &trace_id);
        let task = tokio::spawn(Arc::clone(self).run_cycle().instrument(span));

        let outcome = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "refresh task did not complete");
                    RefreshOutcome::Failed(ErrorKind::Unavailable)
                }
            }
        }
        .boxed()
        .shared();

        control.in_flight = Some(outcome.clone());
        outcome
    }

    /// One refresh cycle. Publishes the refreshing transition, fetches,
    /// applies or records the failure, publishes the final state.
    async fn run_cycle(self: Arc<Self>) -> RefreshOutcome {
        let _release = InFlightRelease(&self.control);

        let refreshing = self.state().refreshing();
        let previous = Arc::clone(&refreshing.current);
        self.publish(refreshing);

        let result = self.fetch_validated(previous).await;

        // Only this task writes state while the guard is held, so reading
        // the latest published state here is race-free.
        let state = self.state();
        let (next, outcome) = match result {
            Ok(snapshot) => {
                info!(
                    price = snapshot.index.price,
                    captured_at = %snapshot.captured_at,
                    "market snapshot refreshed"
                );
                (
                    state.applied(Arc::new(snapshot), Utc::now()),
                    RefreshOutcome::Updated,
                )
            }
            Err(e) => {
                let kind = e.kind();
                warn!(error = %e, kind = %kind, "refresh failed; keeping previous snapshot");
                (state.failed(kind), RefreshOutcome::Failed(kind))
            }
        };

        tracing::Span::current().record("outcome", field::display(&outcome));
        self.publish(next);

        outcome
    }

    async fn fetch_validated(
        &self,
        previous: Arc<MarketSnapshot>,
    ) -> Result<MarketSnapshot, ProviderError> {
        let fetch = AssertUnwindSafe(self.provider.fetch(Some(previous))).catch_unwind();
        let fetch = warn_if_slow("provider_fetch", self.cfg.slow_fetch_warn, fetch);

        let result = match self.cfg.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch).await.map_err(|_| {
                ProviderError::Unavailable(format!("fetch timed out after {limit:?}"))
            })?,
            None => fetch.await,
        };

        let snapshot = result
            .map_err(|_| ProviderError::Unavailable("provider panicked".into()))??;

        snapshot.validate()?;
        Ok(snapshot)
    }

    fn publish(&self, state: EngineState) {
        let _order = self.publish_lock.lock();

        let view = EngineView::from_state(state);
        self.view_tx.send_replace(view.clone());

        let sinks = self.sinks.read().clone();
        for sink in sinks {
            let delivered =
                std::panic::catch_unwind(AssertUnwindSafe(|| sink.present(&view)));
            if delivered.is_err() {
                warn!("presentation sink panicked; transition dropped for that sink");
            }
        }
    }
}

impl<P> Drop for RefreshScheduler<P> {
    fn drop(&mut self) {
        if let Some(ticker) = self.control.get_mut().ticker.take() {
            ticker.handle.abort();
        }
    }
}

/// Clears the in-flight marker when a cycle ends, including by panic.
struct InFlightRelease<'a>(&'a Mutex<Control>);

impl Drop for InFlightRelease<'_> {
    fn drop(&mut self) {
        self.0.lock().in_flight = None;
    }
}
