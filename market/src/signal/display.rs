//! Per-metric labels for presentation.
//!
//! These bands are independent of the voting rules and do not affect the
//! tally. Several of them differ from the vote thresholds
//! (P/E has no vote at all, VIX above 30 reads as neutral here).

use serde::Serialize;

use crate::types::MarketSnapshot;

pub const PE_EXPENSIVE_ABOVE: f64 = 30.0;
pub const PE_CHEAP_BELOW: f64 = 20.0;
pub const VOLATILITY_CALM_BELOW: f64 = 20.0;
pub const VOLATILITY_FEAR_ABOVE: f64 = 30.0;
pub const YIELD_SUPPORTIVE_BELOW: f64 = 4.5;
pub const GDP_HEALTHY_ABOVE: f64 = 2.5;
pub const RSI_GAUGE_OVERBOUGHT: f64 = 70.0;
pub const RSI_GAUGE_OVERSOLD: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Bullish,
    Bearish,
    Neutral,
}

/// RSI gauge zone. Bounds are inclusive, unlike the momentum vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MetricStatuses {
    pub index_change: MetricStatus,
    pub long_term_trend: MetricStatus,
    pub valuation: MetricStatus,
    pub volatility: MetricStatus,
    pub treasury_yield: MetricStatus,
    pub gdp_growth: MetricStatus,
    pub semiconductors: MetricStatus,
    pub rsi_zone: RsiZone,
}

fn bullish_if(condition: bool) -> MetricStatus {
    if condition {
        MetricStatus::Bullish
    } else {
        MetricStatus::Bearish
    }
}

pub fn valuation_status(price_to_earnings: f64) -> MetricStatus {
    if price_to_earnings > PE_EXPENSIVE_ABOVE {
        MetricStatus::Bearish
    } else if price_to_earnings < PE_CHEAP_BELOW {
        MetricStatus::Bullish
    } else {
        MetricStatus::Neutral
    }
}

/// High readings are read as fear, which can mark a buying opportunity, so
/// the top band is neutral rather than bearish.
pub fn volatility_status(price: f64) -> MetricStatus {
    if price < VOLATILITY_CALM_BELOW {
        MetricStatus::Bullish
    } else if price > VOLATILITY_FEAR_ABOVE {
        MetricStatus::Neutral
    } else {
        MetricStatus::Bearish
    }
}

pub fn rsi_zone(rsi: f64) -> RsiZone {
    if rsi >= RSI_GAUGE_OVERBOUGHT {
        RsiZone::Overbought
    } else if rsi <= RSI_GAUGE_OVERSOLD {
        RsiZone::Oversold
    } else {
        RsiZone::Neutral
    }
}

pub fn classify_metrics(snapshot: &MarketSnapshot) -> MetricStatuses {
    let index = &snapshot.index;

    MetricStatuses {
        index_change: bullish_if(index.change >= 0.0),
        long_term_trend: bullish_if(index.price > index.moving_average_200),
        valuation: valuation_status(index.price_to_earnings),
        volatility: volatility_status(snapshot.volatility_index.price),
        treasury_yield: bullish_if(snapshot.treasury_yield.yield_percent < YIELD_SUPPORTIVE_BELOW),
        gdp_growth: bullish_if(snapshot.gdp_growth_percent > GDP_HEALTHY_ABOVE),
        semiconductors: MetricStatus::Neutral,
        rsi_zone: rsi_zone(index.rsi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_labels() {
        let m = classify_metrics(&MarketSnapshot::seed());

        assert_eq!(m.index_change, MetricStatus::Bullish);
        assert_eq!(m.long_term_trend, MetricStatus::Bullish);
        assert_eq!(m.valuation, MetricStatus::Neutral);
        assert_eq!(m.volatility, MetricStatus::Bullish);
        assert_eq!(m.treasury_yield, MetricStatus::Bullish);
        assert_eq!(m.gdp_growth, MetricStatus::Bullish);
        assert_eq!(m.semiconductors, MetricStatus::Neutral);
        assert_eq!(m.rsi_zone, RsiZone::Neutral);
    }

    #[test]
    fn valuation_bands() {
        assert_eq!(valuation_status(30.5), MetricStatus::Bearish);
        assert_eq!(valuation_status(30.0), MetricStatus::Neutral);
        assert_eq!(valuation_status(20.0), MetricStatus::Neutral);
        assert_eq!(valuation_status(19.9), MetricStatus::Bullish);
    }

    #[test]
    fn volatility_bands_differ_from_the_vote() {
        assert_eq!(volatility_status(15.0), MetricStatus::Bullish);
        assert_eq!(volatility_status(20.0), MetricStatus::Bearish);
        assert_eq!(volatility_status(30.0), MetricStatus::Bearish);
        assert_eq!(volatility_status(35.0), MetricStatus::Neutral);
    }

    #[test]
    fn rsi_gauge_bounds_are_inclusive() {
        assert_eq!(rsi_zone(70.0), RsiZone::Overbought);
        assert_eq!(rsi_zone(30.0), RsiZone::Oversold);
        assert_eq!(rsi_zone(50.0), RsiZone::Neutral);
    }

    #[test]
    fn flat_day_counts_as_bullish_change() {
        let mut s = MarketSnapshot::seed();
        s.index.change = 0.0;
        assert_eq!(classify_metrics(&s).index_change, MetricStatus::Bullish);

        s.index.change = -0.01;
        assert_eq!(classify_metrics(&s).index_change, MetricStatus::Bearish);
    }
}
