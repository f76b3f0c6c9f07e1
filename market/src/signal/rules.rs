//! The five voting rules.
//!
//! Every comparison is strict: a value sitting exactly on a threshold falls
//! into the rule's "else" branch.

use super::{Indicator, Vote};
use crate::types::MarketSnapshot;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const VOLATILITY_CALM_BELOW: f64 = 20.0;
pub const GDP_HEALTHY_ABOVE: f64 = 2.5;
pub const YIELD_SUPPORTIVE_BELOW: f64 = 4.5;

/// Number of rules, and therefore of votes in every tally.
pub const RULE_COUNT: usize = 5;

/// A stateless indicator rule that reads one snapshot and casts one vote.
pub trait IndicatorRule: Sync {
    fn indicator(&self) -> Indicator;

    fn vote(&self, snapshot: &MarketSnapshot) -> Vote;
}

/// All rules in tally order.
pub static RULES: [&dyn IndicatorRule; RULE_COUNT] =
    [&LongTermTrend, &Momentum, &Volatility, &Growth, &Rates];

fn bullish_if(condition: bool) -> Vote {
    if condition { Vote::Bullish } else { Vote::Bearish }
}

/// Price above the 200-day moving average.
pub struct LongTermTrend;

impl IndicatorRule for LongTermTrend {
    fn indicator(&self) -> Indicator {
        Indicator::LongTermTrend
    }

    fn vote(&self, snapshot: &MarketSnapshot) -> Vote {
        bullish_if(snapshot.index.price > snapshot.index.moving_average_200)
    }
}

/// RSI: oversold is a buying opportunity, overbought a selling signal.
pub struct Momentum;

impl IndicatorRule for Momentum {
    fn indicator(&self) -> Indicator {
        Indicator::Momentum
    }

    fn vote(&self, snapshot: &MarketSnapshot) -> Vote {
        let rsi = snapshot.index.rsi;
        if rsi < RSI_OVERSOLD {
            Vote::Bullish
        } else if rsi > RSI_OVERBOUGHT {
            Vote::Bearish
        } else {
            Vote::Neutral
        }
    }
}

/// Low volatility index reads as low fear.
pub struct Volatility;

impl IndicatorRule for Volatility {
    fn indicator(&self) -> Indicator {
        Indicator::Volatility
    }

    fn vote(&self, snapshot: &MarketSnapshot) -> Vote {
        bullish_if(snapshot.volatility_index.price < VOLATILITY_CALM_BELOW)
    }
}

pub struct Growth;

impl IndicatorRule for Growth {
    fn indicator(&self) -> Indicator {
        Indicator::Growth
    }

    fn vote(&self, snapshot: &MarketSnapshot) -> Vote {
        bullish_if(snapshot.gdp_growth_percent > GDP_HEALTHY_ABOVE)
    }
}

/// Low long-term rates favour equities.
pub struct Rates;

impl IndicatorRule for Rates {
    fn indicator(&self) -> Indicator {
        Indicator::Rates
    }

    fn vote(&self, snapshot: &MarketSnapshot) -> Vote {
        bullish_if(snapshot.treasury_yield.yield_percent < YIELD_SUPPORTIVE_BELOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_cover_each_indicator_once() {
        let seen: std::collections::HashSet<Indicator> =
            RULES.iter().map(|r| r.indicator()).collect();
        assert_eq!(seen.len(), RULE_COUNT);
    }

    #[test]
    fn yield_at_threshold_is_bearish() {
        let mut s = MarketSnapshot::seed();
        s.treasury_yield.yield_percent = YIELD_SUPPORTIVE_BELOW;
        assert_eq!(Rates.vote(&s), Vote::Bearish);

        s.treasury_yield.yield_percent = 4.49;
        assert_eq!(Rates.vote(&s), Vote::Bullish);
    }

    #[test]
    fn volatility_at_threshold_is_bearish() {
        let mut s = MarketSnapshot::seed();
        s.volatility_index.price = VOLATILITY_CALM_BELOW;
        assert_eq!(Volatility.vote(&s), Vote::Bearish);
    }

    #[test]
    fn gdp_at_threshold_is_bearish() {
        let mut s = MarketSnapshot::seed();
        s.gdp_growth_percent = GDP_HEALTHY_ABOVE;
        assert_eq!(Growth.vote(&s), Vote::Bearish);
    }

    #[test]
    fn price_equal_to_ma200_is_bearish() {
        let mut s = MarketSnapshot::seed();
        s.index.price = s.index.moving_average_200;
        assert_eq!(LongTermTrend.vote(&s), Vote::Bearish);
    }
}
