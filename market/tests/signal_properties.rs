use market::signal::rules::RULE_COUNT;
use market::signal::{Recommendation, evaluate};
use market::types::MarketSnapshot;
use proptest::prelude::*;

/// Snapshots that satisfy the data-model invariants, with the voted-on
/// fields drawn across (and exactly on) their thresholds.
fn valid_snapshot() -> impl Strategy<Value = MarketSnapshot> {
    (
        1_000.0f64..30_000.0,
        1_000.0f64..30_000.0,
        prop_oneof![Just(30.0), Just(70.0), 0.0f64..=100.0],
        prop_oneof![Just(20.0), 5.0f64..80.0],
        prop_oneof![Just(2.5), -5.0f64..8.0],
        prop_oneof![Just(4.5), 0.0f64..10.0],
    )
        .prop_map(|(price, ma200, rsi, vix, gdp, yield_pct)| {
            let mut s = MarketSnapshot::seed();
            s.index.price = price;
            s.index.moving_average_200 = ma200;
            s.index.rsi = rsi;
            s.volatility_index.price = vix;
            s.gdp_growth_percent = gdp;
            s.treasury_yield.yield_percent = yield_pct;
            s
        })
}

proptest! {
    #[test]
    fn votes_always_sum_to_rule_count(s in valid_snapshot()) {
        prop_assert!(s.validate().is_ok());
        let t = evaluate(&s);
        prop_assert_eq!(t.bullish + t.bearish + t.neutral, RULE_COUNT as u32);
    }

    #[test]
    fn overall_follows_the_majority(s in valid_snapshot()) {
        let t = evaluate(&s);
        let expected = if t.bullish > t.bearish {
            Recommendation::Buy
        } else if t.bearish > t.bullish {
            Recommendation::Sell
        } else {
            Recommendation::Hold
        };
        prop_assert_eq!(t.overall, expected);
    }

    #[test]
    fn evaluation_is_deterministic(s in valid_snapshot()) {
        let first = evaluate(&s);
        let copy = s.clone();
        for _ in 0..3 {
            prop_assert_eq!(&evaluate(&s), &first);
            prop_assert_eq!(&evaluate(&copy), &first);
        }
    }

    #[test]
    fn only_momentum_can_vote_neutral(s in valid_snapshot()) {
        let t = evaluate(&s);
        prop_assert!(t.neutral <= 1);
        let rsi_neutral = (30.0..=70.0).contains(&s.index.rsi);
        prop_assert_eq!(t.neutral == 1, rsi_neutral);
    }
}
