use std::io::Write;

use market::signal::Vote;
use market::signal::display::{MetricStatus, RsiZone};
use scheduler::{EngineView, PresentationSink};

/// Prints one status line per engine transition.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl PresentationSink for TerminalSink {
    fn present(&self, view: &EngineView) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", render(view));
    }
}

pub(crate) fn render(view: &EngineView) -> String {
    let s = &view.state;
    let snap = &s.current;
    let tally = &view.tally;

    if s.is_refreshing {
        return format!("refreshing... (last price {:.2})", snap.index.price);
    }

    let votes: Vec<String> = tally
        .votes
        .iter()
        .map(|v| format!("{} {}", v.indicator.label(), vote_mark(v.vote)))
        .collect();

    let mut line = format!(
        "{:.2} ({:+.2}, {:+.2}%) | rsi {:.1} {} | p/e {:.1} {} | vix {:.2} {} | 10y {:.2}% | {} [{} bull / {} bear / {} neutral] {}",
        snap.index.price,
        snap.index.change,
        snap.index.change_percent,
        snap.index.rsi,
        zone_label(view.metrics.rsi_zone),
        snap.index.price_to_earnings,
        status_label(view.metrics.valuation),
        snap.volatility_index.price,
        status_label(view.metrics.volatility),
        snap.treasury_yield.yield_percent,
        tally.overall,
        tally.bullish,
        tally.bearish,
        tally.neutral,
        votes.join(", "),
    );

    line.push_str(&format!(" | updated {}", s.last_updated.format("%H:%M:%S")));
    if let Some(kind) = s.last_error {
        line.push_str(&format!(" | last refresh failed: {kind}"));
    }
    line
}

fn vote_mark(vote: Vote) -> &'static str {
    match vote {
        Vote::Bullish => "+",
        Vote::Bearish => "-",
        Vote::Neutral => "=",
    }
}

fn zone_label(zone: RsiZone) -> &'static str {
    match zone {
        RsiZone::Oversold => "oversold",
        RsiZone::Neutral => "neutral",
        RsiZone::Overbought => "overbought",
    }
}

fn status_label(status: MetricStatus) -> &'static str {
    match status {
        MetricStatus::Bullish => "bullish",
        MetricStatus::Bearish => "bearish",
        MetricStatus::Neutral => "neutral",
    }
}
