use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use scheduler::SchedulerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceCli {
    /// Random bounded moves around the previous snapshot
    Simulated,
    /// Re-read a JSON snapshot from disk on every refresh
    File,
    /// The built-in demo snapshot, never changing
    Static,
}

#[derive(Debug, Parser)]
#[clap(name = "market-signal", version)]
pub struct Cli {
    /// Where snapshots come from
    #[clap(long, value_enum, default_value_t = SourceCli::Simulated)]
    pub source: SourceCli,

    /// Snapshot file for `--source file`
    #[clap(long, required_if_eq("source", "file"))]
    pub file: Option<PathBuf>,

    /// Seconds between timer-driven refreshes (overrides MARKET_REFRESH_SECS)
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: Option<u64>,

    /// Give up on a fetch after this many seconds; 0 disables the limit
    #[clap(long)]
    pub fetch_timeout_secs: Option<u64>,

    /// Seed for the simulated source, for reproducible runs
    #[clap(long)]
    pub rng_seed: Option<u64>,

    /// Simulated fetch latency in milliseconds
    #[clap(long, default_value = "1000")]
    pub latency_ms: u64,

    /// Largest simulated price move per refresh
    #[clap(long, default_value = "50.0")]
    pub max_move: f64,

    /// Emit logs as JSON lines
    #[clap(long)]
    pub json_logs: bool,
}

impl Cli {
    /// Applies command-line overrides on top of `base`.
    pub(crate) fn scheduler_config(&self, base: SchedulerConfig) -> SchedulerConfig {
        let mut cfg = base;
        if let Some(secs) = self.interval_secs {
            cfg.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.fetch_timeout_secs {
            cfg.fetch_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        cfg
    }

    pub(crate) fn json_logs(&self, app_env: Option<&str>) -> bool {
        self.json_logs || app_env == Some("production")
    }

    pub(crate) fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("market-signal").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults_to_the_simulated_source() {
        let cli = parse(&[]);
        assert_eq!(cli.source, SourceCli::Simulated);
        assert_eq!(cli.latency(), Duration::from_secs(1));
        assert_eq!(cli.max_move, 50.0);
        assert_eq!(cli.scheduler_config(SchedulerConfig::default()), SchedulerConfig::default());
    }

    #[test]
    fn flags_override_the_environment_config() {
        let cli = parse(&["--interval-secs", "5", "--fetch-timeout-secs", "3"]);
        let base = SchedulerConfig {
            refresh_interval: Duration::from_secs(60),
            ..SchedulerConfig::default()
        };

        let cfg = cli.scheduler_config(base);

        assert_eq!(cfg.refresh_interval, Duration::from_secs(5));
        assert_eq!(cfg.fetch_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn zero_fetch_timeout_clears_it() {
        let cli = parse(&["--fetch-timeout-secs", "0"]);
        let base = SchedulerConfig {
            fetch_timeout: Some(Duration::from_secs(9)),
            ..SchedulerConfig::default()
        };
        assert_eq!(cli.scheduler_config(base).fetch_timeout, None);
    }

    #[test]
    fn file_source_needs_a_path() {
        let args = ["market-signal", "--source", "file"];
        assert!(Cli::try_parse_from(args).is_err());

        let cli = parse(&["--source", "file", "--file", "snapshot.json"]);
        assert_eq!(cli.file, Some(PathBuf::from("snapshot.json")));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Cli::try_parse_from(["market-signal", "--interval-secs", "0"]).is_err());
    }

    #[test]
    fn production_env_selects_json_logs() {
        let cli = parse(&[]);
        assert!(!cli.json_logs(None));
        assert!(!cli.json_logs(Some("dev")));
        assert!(cli.json_logs(Some("production")));
        assert!(parse(&["--json-logs"]).json_logs(None));
    }
}
