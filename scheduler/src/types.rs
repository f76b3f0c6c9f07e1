//! Shared types used by the scheduler subsystem.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use market::ErrorKind;
use tracing::warn;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_SLOW_FETCH_WARN: Duration = Duration::from_secs(2);

pub const ENV_REFRESH_SECS: &str = "MARKET_REFRESH_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "MARKET_FETCH_TIMEOUT_SECS";
pub const ENV_SLOW_FETCH_MS: &str = "MARKET_SLOW_FETCH_MS";

/// Timing knobs for the refresh scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Fixed cadence of timer-driven refreshes. Failures neither speed it
    /// up nor slow it down.
    pub refresh_interval: Duration,

    /// Upper bound on a single provider call.
    ///
    /// `None` leaves latency entirely to the provider: a fetch that never
    /// returns keeps the engine refreshing forever. When set, an elapsed
    /// timeout is recorded as `Unavailable`.
    pub fetch_timeout: Option<Duration>,

    /// Fetches slower than this are logged under the `performance` target.
    pub slow_fetch_warn: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            fetch_timeout: None,
            slow_fetch_warn: DEFAULT_SLOW_FETCH_WARN,
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, falling back to defaults for unset
    /// or unparsable values.
    ///
    /// A refresh interval of 0 is ignored; a fetch timeout of 0 disables
    /// the timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_REFRESH_SECS) {
            if secs > 0 {
                cfg.refresh_interval = Duration::from_secs(secs);
            } else {
                warn!(key = ENV_REFRESH_SECS, "zero refresh interval ignored");
            }
        }

        if let Some(secs) = parse_var::<u64>(&lookup, ENV_FETCH_TIMEOUT_SECS) {
            cfg.fetch_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(ms) = parse_var::<u64>(&lookup, ENV_SLOW_FETCH_MS) {
            cfg.slow_fetch_warn = Duration::from_millis(ms);
        }

        cfg
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "invalid value; using default");
            None
        }
    }
}

/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Periodic tick from the ticker started with the given epoch.
    Timer { epoch: u64 },
    /// Out-of-band request (operator, UI button).
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Timer { .. } => "timer",
            Trigger::Manual => "manual",
        }
    }
}

/// Result of one refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    Failed(ErrorKind),
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated)
    }
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshOutcome::Updated => f.write_str("updated"),
            RefreshOutcome::Failed(kind) => write!(f, "failed ({kind})"),
        }
    }
}
