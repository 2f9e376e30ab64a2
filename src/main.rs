use std::io::Read;

use anyhow::Context;
use quadstoch::config::Config;
use quadstoch::services::parse_bars;
use quadstoch::SignalEngine;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading bars from {}", p)),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading bars from stdin")?;
            Ok(buf)
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quadstoch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.bars_path = Some(path);
    }
    info!("Evaluating {} on {}", config.symbol, config.timeframe);

    let input = read_input(config.bars_path.as_deref())?;
    let bars = parse_bars(&input).context("parsing bar JSON")?;
    debug!("Loaded {} bars", bars.len());

    let engine = SignalEngine::new(config.engine.clone())?;
    let report = engine.evaluate(&config.symbol, config.timeframe, &bars)?;

    if let Some(message) = report.notification() {
        info!("Signal fired:\n{}", message);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
