use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;

/// Headline equity index reading with its pre-computed technicals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub moving_average_50: f64,
    pub moving_average_200: f64,
    /// Relative strength index, 0..=100.
    pub rsi: f64,
    pub price_to_earnings: f64,
}

/// Volatility index (VIX-style "fear gauge").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolatilityQuote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// 10-year treasury yield.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryYield {
    pub yield_percent: f64,
    pub change: f64,
}

/// One point of the index price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPoint {
    /// Period label. Year-month labels (`2024-07`, `2024-7`) are ordered
    /// by date; any other label is ordered as plain text.
    pub period_label: String,
    pub price: f64,
}

impl HistoryPoint {
    pub fn new(period_label: impl Into<String>, price: f64) -> Self {
        Self {
            period_label: period_label.into(),
            price,
        }
    }
}

/// One point-in-time read of every tracked metric.
///
/// A snapshot is never edited once built. The engine keeps it behind an
/// `Arc` and swaps in a whole new value on every successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSnapshot {
    pub index: IndexQuote,
    pub volatility_index: VolatilityQuote,
    pub treasury_yield: TreasuryYield,
    pub gdp_growth_percent: f64,
    pub semiconductor_index: f64,
    #[serde(default)]
    pub cloud_growth_percent: f64,
    pub history: Vec<HistoryPoint>,
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
}

impl MarketSnapshot {
    /// The built-in demo snapshot the dashboard starts from.
    pub fn seed() -> Self {
        let history = [
            ("2024-01", 15_000.0),
            ("2024-02", 15_500.0),
            ("2024-03", 16_000.0),
            ("2024-04", 15_800.0),
            ("2024-05", 16_200.0),
            ("2024-06", 16_800.0),
            ("2024-07", 17_200.0),
            ("2024-08", 17_000.0),
            ("2024-09", 17_500.0),
            ("2024-10", 17_800.0),
            ("2024-11", 18_100.0),
            ("2024-12", 18_245.0),
        ]
        .into_iter()
        .map(|(label, price)| HistoryPoint::new(label, price))
        .collect();

        Self {
            index: IndexQuote {
                price: 18_245.67,
                change: 125.43,
                change_percent: 0.69,
                moving_average_50: 17_890.23,
                moving_average_200: 16_745.89,
                rsi: 65.4,
                price_to_earnings: 28.7,
            },
            volatility_index: VolatilityQuote {
                price: 18.45,
                change: -1.23,
                change_percent: -6.25,
            },
            treasury_yield: TreasuryYield {
                yield_percent: 4.25,
                change: 0.05,
            },
            gdp_growth_percent: 2.8,
            semiconductor_index: 145.67,
            cloud_growth_percent: 12.5,
            history,
            captured_at: Utc::now(),
        }
    }

    /// Checks the data-model invariants.
    ///
    /// Every numeric field must be finite, `rsi` must lie in `[0, 100]` and
    /// `history` must be non-empty with strictly increasing period labels.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (name, value) in self.numeric_fields() {
            if !value.is_finite() {
                return Err(SnapshotError::NonFinite(name));
            }
        }

        if !(0.0..=100.0).contains(&self.index.rsi) {
            return Err(SnapshotError::RsiOutOfRange(self.index.rsi));
        }

        if self.history.is_empty() {
            return Err(SnapshotError::EmptyHistory);
        }

        if self.history.iter().any(|p| !p.price.is_finite()) {
            return Err(SnapshotError::NonFinite("history.price"));
        }

        for (i, pair) in self.history.windows(2).enumerate() {
            if !period_precedes(&pair[0].period_label, &pair[1].period_label) {
                return Err(SnapshotError::HistoryOutOfOrder {
                    position: i + 1,
                    previous: pair[0].period_label.clone(),
                    label: pair[1].period_label.clone(),
                });
            }
        }

        Ok(())
    }

    fn numeric_fields(&self) -> [(&'static str, f64); 15] {
        [
            ("index.price", self.index.price),
            ("index.change", self.index.change),
            ("index.changePercent", self.index.change_percent),
            ("index.movingAverage50", self.index.moving_average_50),
            ("index.movingAverage200", self.index.moving_average_200),
            ("index.rsi", self.index.rsi),
            ("index.priceToEarnings", self.index.price_to_earnings),
            ("volatilityIndex.price", self.volatility_index.price),
            ("volatilityIndex.change", self.volatility_index.change),
            ("volatilityIndex.changePercent", self.volatility_index.change_percent),
            ("treasuryYield.yieldPercent", self.treasury_yield.yield_percent),
            ("treasuryYield.change", self.treasury_yield.change),
            ("gdpGrowthPercent", self.gdp_growth_percent),
            ("semiconductorIndex", self.semiconductor_index),
            ("cloudGrowthPercent", self.cloud_growth_percent),
        ]
    }
}

fn period_precedes(earlier: &str, later: &str) -> bool {
    match (year_month(earlier), year_month(later)) {
        (Some(a), Some(b)) => a < b,
        _ => earlier < later,
    }
}

fn year_month(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", label.trim()), "%Y-%m-%d").ok()
}
