pub mod cli;
mod terminal;

use std::ops::ControlFlow;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use common::logger::init_logger;
use market::provider::{JsonFileProvider, SimulatedProvider, StaticProvider};
use market::{DataProvider, MarketSnapshot};
use scheduler::{RefreshScheduler, SchedulerConfig, TracingSink};

use cli::{Cli, SourceCli};
use terminal::TerminalSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_env = std::env::var("APP_ENV").ok();
    init_logger("market-signal", cli.json_logs(app_env.as_deref()));

    let cfg = cli.scheduler_config(SchedulerConfig::from_env());
    tracing::info!(source = ?cli.source, ?cfg, "starting market signal engine");

    match cli.source {
        SourceCli::Simulated => {
            let provider = match cli.rng_seed {
                Some(seed) => SimulatedProvider::with_seed(cli.latency(), cli.max_move, seed),
                None => SimulatedProvider::new(cli.latency(), cli.max_move),
            };
            let engine = RefreshScheduler::new(Arc::new(provider), cfg, MarketSnapshot::seed())
                .context("failed to build scheduler")?;
            run(engine).await
        }
        SourceCli::File => {
            let path = cli.file.clone().context("--file is required for the file source")?;
            let provider = Arc::new(JsonFileProvider::new(&path));
            let engine = RefreshScheduler::bootstrap(provider, cfg)
                .await
                .with_context(|| format!("failed to load initial snapshot from {}", path.display()))?;
            run(engine).await
        }
        SourceCli::Static => {
            let engine = RefreshScheduler::new(
                Arc::new(StaticProvider::default()),
                cfg,
                MarketSnapshot::seed(),
            )
            .context("failed to build scheduler")?;
            run(engine).await
        }
    }
}

/// Drives the engine until stdin closes, `quit` is typed or Ctrl-C.
async fn run<P: DataProvider>(engine: Arc<RefreshScheduler<P>>) -> anyhow::Result<()> {
    engine.add_sink(Arc::new(TracingSink));
    engine.add_sink(Arc::new(TerminalSink));

    engine.start();
    println!("commands: r | refresh, q | quit");

    // One listener for the whole session, so a signal is never missed
    // between loop iterations.
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if handle_line(&engine, &line).is_break() {
                    break;
                }
            }
            res = &mut shutdown => {
                res.context("failed to listen for Ctrl-C")?;
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    engine.stop();
    Ok(())
}

/// Acts on one stdin command without waiting for any refresh it starts.
fn handle_line<P: DataProvider>(engine: &Arc<RefreshScheduler<P>>, line: &str) -> ControlFlow<()> {
    match line.trim() {
        "r" | "refresh" => {
            let engine = Arc::clone(engine);
            tokio::spawn(async move {
                let outcome = engine.refresh_now().await;
                tracing::debug!(%outcome, "manual refresh finished");
            });
        }
        "q" | "quit" => return ControlFlow::Break(()),
        "" => {}
        other => println!("unknown command: {other}"),
    }
    ControlFlow::Continue(())
}
