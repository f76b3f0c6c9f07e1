use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::DataProvider;
use crate::error::ProviderError;
use crate::types::{IndexQuote, MarketSnapshot};

pub const DEFAULT_LATENCY: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_MOVE: f64 = 50.0;

/// Demo feed: waits a fixed latency, then nudges the index price by a
/// uniform random amount in `[-max_move / 2, max_move / 2)`.
///
/// Everything except the index price, change and change percent carries
/// over from the previous snapshot (or the seed when there is none).
pub struct SimulatedProvider {
    latency: Duration,
    max_move: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedProvider {
    pub fn new(latency: Duration, max_move: f64) -> Self {
        Self {
            latency,
            max_move,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic move sequence for a given seed.
    pub fn with_seed(latency: Duration, max_move: f64, seed: u64) -> Self {
        Self {
            latency,
            max_move,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn next_move(&self) -> f64 {
        if self.max_move <= 0.0 || !self.max_move.is_finite() {
            return 0.0;
        }
        let half = self.max_move / 2.0;
        self.rng.lock().gen_range(-half..half)
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY, DEFAULT_MAX_MOVE)
    }
}

/// Moves the index price of `base` by `delta`, producing a new snapshot.
pub fn apply_move(base: &MarketSnapshot, delta: f64, at: DateTime<Utc>) -> MarketSnapshot {
    let previous_price = base.index.price;
    let change_percent = if previous_price != 0.0 {
        delta / previous_price * 100.0
    } else {
        0.0
    };

    MarketSnapshot {
        index: IndexQuote {
            price: previous_price + delta,
            change: delta,
            change_percent,
            ..base.index
        },
        captured_at: at,
        ..base.clone()
    }
}

#[async_trait]
impl DataProvider for SimulatedProvider {
    async fn fetch(
        &self,
        previous: Option<Arc<MarketSnapshot>>,
    ) -> Result<MarketSnapshot, ProviderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let delta = self.next_move();
        let next = match previous {
            Some(prev) => apply_move(&prev, delta, Utc::now()),
            None => apply_move(&MarketSnapshot::seed(), delta, Utc::now()),
        };

        debug!(delta, price = next.index.price, "simulated price move");

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_move_only_touches_index_price_fields() {
        let base = MarketSnapshot::seed();
        let at = Utc::now();
        let next = apply_move(&base, 10.0, at);

        assert!((next.index.price - (base.index.price + 10.0)).abs() < 1e-9);
        assert_eq!(next.index.change, 10.0);
        assert!((next.index.change_percent - 10.0 / base.index.price * 100.0).abs() < 1e-12);
        assert_eq!(next.index.rsi, base.index.rsi);
        assert_eq!(next.index.moving_average_200, base.index.moving_average_200);
        assert_eq!(next.volatility_index, base.volatility_index);
        assert_eq!(next.history, base.history);
        assert_eq!(next.captured_at, at);
    }

    #[test]
    fn zero_price_does_not_divide_by_zero() {
        let mut base = MarketSnapshot::seed();
        base.index.price = 0.0;
        let next = apply_move(&base, 5.0, Utc::now());
        assert_eq!(next.index.change_percent, 0.0);
        assert_eq!(next.index.price, 5.0);
    }

    #[test]
    fn non_positive_max_move_keeps_price_flat() {
        let p = SimulatedProvider::with_seed(Duration::ZERO, 0.0, 1);
        assert_eq!(p.next_move(), 0.0);
    }
}
