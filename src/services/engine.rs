//! Signal engine.
//!
//! One evaluation runs the whole pipeline over an immutable bar snapshot:
//! sanitize, build the indicator table, classify the latest bar, then collect
//! pivots and supporting divergences for the report. Nothing is carried over
//! between calls.

use tracing::{info, warn};

use super::series::sanitize;
use super::signals::{classify, DivergenceAnalyzer, IndicatorTable, PivotDetector, SignalReport};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::types::{Bar, Signal, Timeframe};

/// Stateless signal engine bound to one configuration.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
}

impl SignalEngine {
    /// Create an engine, rejecting unusable configurations.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the indicator table for a raw bar sequence.
    pub fn table(&self, bars: &[Bar]) -> Result<IndicatorTable> {
        let required = self.config.min_bars();
        let series = sanitize(bars, required)?;
        let table = IndicatorTable::build(&series, &self.config);

        if table.is_empty() {
            return Err(EngineError::insufficient(required, series.len()));
        }
        if table.degenerate_windows() > 0 {
            warn!(
                "{} stochastic windows had zero price range; oscillator values are unreliable",
                table.degenerate_windows()
            );
        }

        Ok(table)
    }

    /// Classify the latest bar only.
    pub fn signal(&self, bars: &[Bar]) -> Result<Signal> {
        let table = self.table(bars)?;
        Ok(classify(&table, &self.config))
    }

    /// Full evaluation with annotations for the presentation layer.
    pub fn evaluate(&self, symbol: &str, timeframe: Timeframe, bars: &[Bar]) -> Result<SignalReport> {
        let table = self.table(bars)?;
        let signal = classify(&table, &self.config);

        let pivots = PivotDetector::from_config(&self.config.pivot).detect_table(&table);
        let divergences = DivergenceAnalyzer::new(&self.config).pivot_divergences(&table, &pivots);

        if signal.is_active() {
            info!(
                "{} {}: {} {} @ {:.4}",
                symbol,
                timeframe,
                signal.strategy_label(),
                signal.signal_type.label(),
                signal.entry
            );
        } else {
            info!("{} {}: no signal", symbol, timeframe);
        }

        // `table()` rejects empty tables, so assembly only fails for an empty table
        // built outside the engine.
        SignalReport::assemble(symbol, timeframe, &table, signal, pivots, divergences)
            .ok_or_else(|| EngineError::insufficient(self.config.min_bars(), 0))
    }
}
