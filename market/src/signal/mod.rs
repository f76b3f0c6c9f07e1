//! Signal evaluation.
//!
//! Turns a [`MarketSnapshot`] into a [`SignalTally`]: five independent
//! indicator rules each cast exactly one vote (bullish, bearish or neutral)
//! and the overall recommendation is a plain majority of bullish against
//! bearish votes.
//!
//! ```text
//! BUY   if bullish > bearish
//! SELL  if bearish > bullish
//! HOLD  otherwise (ties, including all-neutral)
//! ```
//!
//! Evaluation is pure: the same snapshot always yields the same tally.
//! It assumes the snapshot already passed [`MarketSnapshot::validate`].
//!
//! The per-card labels in [`display`] are a separate concern and never feed
//! into the tally.

pub mod display;
pub mod rules;

use std::fmt;

use serde::Serialize;

use crate::types::MarketSnapshot;
use rules::{RULE_COUNT, RULES};

/// Direction a single indicator points in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Bullish,
    Bearish,
    Neutral,
}

/// The indicators that take part in the tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    LongTermTrend,
    Momentum,
    Volatility,
    Growth,
    Rates,
}

impl Indicator {
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::LongTermTrend => "price vs 200-day MA",
            Indicator::Momentum => "RSI",
            Indicator::Volatility => "volatility index",
            Indicator::Growth => "GDP growth",
            Indicator::Rates => "10Y treasury yield",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IndicatorVote {
    pub indicator: Indicator,
    pub vote: Vote,
}

/// Overall trading recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    /// Strict majority of bullish against bearish; neutral votes only
    /// matter in that they are not counted on either side.
    pub fn from_counts(bullish: u32, bearish: u32) -> Self {
        use std::cmp::Ordering;

        match bullish.cmp(&bearish) {
            Ordering::Greater => Recommendation::Buy,
            Ordering::Less => Recommendation::Sell,
            Ordering::Equal => Recommendation::Hold,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => f.write_str("BUY"),
            Recommendation::Sell => f.write_str("SELL"),
            Recommendation::Hold => f.write_str("HOLD"),
        }
    }
}

/// Vote counts derived from one snapshot.
///
/// `bullish + bearish + neutral` is always [`RULE_COUNT`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignalTally {
    pub bullish: u32,
    pub bearish: u32,
    pub neutral: u32,
    pub overall: Recommendation,
    /// Individual votes in rule order.
    pub votes: [IndicatorVote; RULE_COUNT],
}

impl SignalTally {
    pub fn from_votes(votes: [IndicatorVote; RULE_COUNT]) -> Self {
        let count = |v: Vote| votes.iter().filter(|iv| iv.vote == v).count() as u32;

        let bullish = count(Vote::Bullish);
        let bearish = count(Vote::Bearish);
        let neutral = count(Vote::Neutral);

        Self {
            bullish,
            bearish,
            neutral,
            overall: Recommendation::from_counts(bullish, bearish),
            votes,
        }
    }

    pub fn total(&self) -> u32 {
        self.bullish + self.bearish + self.neutral
    }

    pub fn vote_for(&self, indicator: Indicator) -> Option<Vote> {
        self.votes
            .iter()
            .find(|iv| iv.indicator == indicator)
            .map(|iv| iv.vote)
    }
}

/// Runs every rule against `snapshot` and tallies the votes.
pub fn evaluate(snapshot: &MarketSnapshot) -> SignalTally {
    let votes = RULES.map(|rule| IndicatorVote {
        indicator: rule.indicator(),
        vote: rule.vote(snapshot),
    });

    SignalTally::from_votes(votes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(price: f64, ma200: f64, rsi: f64, vix: f64, gdp: f64, yield_pct: f64) -> MarketSnapshot {
        let mut s = MarketSnapshot::seed();
        s.index.price = price;
        s.index.moving_average_200 = ma200;
        s.index.rsi = rsi;
        s.volatility_index.price = vix;
        s.gdp_growth_percent = gdp;
        s.treasury_yield.yield_percent = yield_pct;
        s
    }

    #[test]
    fn scenario_a_is_a_buy() {
        let t = evaluate(&snapshot(18_245.67, 16_745.89, 65.4, 18.45, 2.8, 4.25));

        assert_eq!((t.bullish, t.bearish, t.neutral), (4, 0, 1));
        assert_eq!(t.overall, Recommendation::Buy);
        assert_eq!(t.vote_for(Indicator::LongTermTrend), Some(Vote::Bullish));
        assert_eq!(t.vote_for(Indicator::Momentum), Some(Vote::Neutral));
        assert_eq!(t.vote_for(Indicator::Volatility), Some(Vote::Bullish));
        assert_eq!(t.vote_for(Indicator::Growth), Some(Vote::Bullish));
        assert_eq!(t.vote_for(Indicator::Rates), Some(Vote::Bullish));
    }

    #[test]
    fn scenario_b_is_a_sell() {
        let t = evaluate(&snapshot(15_000.0, 16_745.89, 75.0, 25.0, 1.0, 5.0));

        assert_eq!((t.bullish, t.bearish, t.neutral), (0, 5, 0));
        assert_eq!(t.overall, Recommendation::Sell);
    }

    #[test]
    fn two_against_two_is_a_hold() {
        // trend bullish, rsi neutral, vix bearish, gdp bullish, rates bearish
        let t = evaluate(&snapshot(18_000.0, 16_000.0, 50.0, 22.0, 3.0, 4.6));

        assert_eq!((t.bullish, t.bearish, t.neutral), (2, 2, 1));
        assert_eq!(t.overall, Recommendation::Hold);
    }

    #[test]
    fn seed_snapshot_recommends_buy() {
        let t = evaluate(&MarketSnapshot::seed());
        assert_eq!(t.overall, Recommendation::Buy);
        assert_eq!(t.total(), RULE_COUNT as u32);
    }

    #[test]
    fn rsi_boundaries_are_neutral() {
        for rsi in [30.0, 70.0] {
            let t = evaluate(&snapshot(18_000.0, 16_000.0, rsi, 18.0, 3.0, 4.0));
            assert_eq!(t.vote_for(Indicator::Momentum), Some(Vote::Neutral), "rsi={rsi}");
        }

        let oversold = evaluate(&snapshot(18_000.0, 16_000.0, 29.99, 18.0, 3.0, 4.0));
        assert_eq!(oversold.vote_for(Indicator::Momentum), Some(Vote::Bullish));

        let overbought = evaluate(&snapshot(18_000.0, 16_000.0, 70.01, 18.0, 3.0, 4.0));
        assert_eq!(overbought.vote_for(Indicator::Momentum), Some(Vote::Bearish));
    }

    #[test]
    fn threshold_values_fall_into_the_else_branch() {
        // price == ma200, vix == 20, gdp == 2.5, yield == 4.5
        let t = evaluate(&snapshot(16_000.0, 16_000.0, 50.0, 20.0, 2.5, 4.5));

        assert_eq!(t.vote_for(Indicator::LongTermTrend), Some(Vote::Bearish));
        assert_eq!(t.vote_for(Indicator::Volatility), Some(Vote::Bearish));
        assert_eq!(t.vote_for(Indicator::Growth), Some(Vote::Bearish));
        assert_eq!(t.vote_for(Indicator::Rates), Some(Vote::Bearish));
        assert_eq!(t.overall, Recommendation::Sell);
    }

    #[test]
    fn recommendation_serializes_uppercase() {
        let json = serde_json::to_string(&Recommendation::Hold).unwrap();
        assert_eq!(json, "\"HOLD\"");
        assert_eq!(Recommendation::Buy.to_string(), "BUY");
    }
}
