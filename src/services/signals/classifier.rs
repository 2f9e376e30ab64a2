//! Signal classifier.
//!
//! Evaluated fresh against the latest row of the table, in priority order:
//! 1. reversal-divergence: every oscillator stretched plus a regular
//!    divergence at the latest bar
//! 2. trend-continuation: price on one side of the slow EMA, slow %K on the
//!    same side of its midline, fast %K pulled back to the opposite extreme
//! 3. no signal

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::divergence::DivergenceAnalyzer;
use super::table::{IndicatorRow, IndicatorTable};
use crate::config::{EngineConfig, RiskConfig, TrendConfig};
use crate::types::{DivergenceDirection, Signal, SignalType, Strategy};

/// Stop-loss and take-profit for an emitted signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskLevels {
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Classify the latest row of `table`.
pub fn classify(table: &IndicatorTable, config: &EngineConfig) -> Signal {
    let Some(last) = table.last() else {
        return Signal::none(0.0);
    };
    let entry = last.bar.close;
    let analyzer = DivergenceAnalyzer::new(config);

    let mut signal = if let Some(event) = analyzer.reversal(table) {
        let reason = match event.direction {
            DivergenceDirection::Bullish => "price broke the prior low while the fast oscillator held higher",
            DivergenceDirection::Bearish => "price broke the prior high while the fast oscillator turned lower",
        };
        Signal {
            signal_type: event.direction.into(),
            strategy: Some(Strategy::ReversalDivergence),
            reason: reason.to_string(),
            entry,
            stop_loss: None,
            take_profit: None,
            annotation: Some(event.line()),
        }
    } else if let Some(side) = trend_continuation(last, &config.trend) {
        let reason = match side {
            SignalType::Long => "pullback buy in an uptrend",
            _ => "rally short in a downtrend",
        };
        Signal {
            signal_type: side,
            strategy: Some(Strategy::TrendContinuation),
            reason: reason.to_string(),
            entry,
            stop_loss: None,
            take_profit: None,
            annotation: None,
        }
    } else {
        return Signal::none(entry);
    };

    if let Some(levels) = risk_levels(table, signal.signal_type, entry, &config.risk) {
        signal.stop_loss = Some(levels.stop_loss);
        signal.take_profit = Some(levels.take_profit);
    }

    debug!(
        "Classified {} ({}) entry={:.4} sl={:?} tp={:?}",
        signal.signal_type.label(),
        signal.strategy_label(),
        signal.entry,
        signal.stop_loss,
        signal.take_profit
    );

    signal
}

fn trend_continuation(row: &IndicatorRow, trend: &TrendConfig) -> Option<SignalType> {
    let close = row.bar.close;
    let set = &row.indicators;
    let fast = set.fast_k()?;
    let slow = set.slow_k()?;

    if close > set.ema_slow && slow > trend.slow_midline {
        (fast < trend.oversold).then_some(SignalType::Long)
    } else if close < set.ema_slow && slow < trend.slow_midline {
        (fast > trend.overbought).then_some(SignalType::Short)
    } else {
        None
    }
}

/// Stop beyond the recent extreme, target at a fixed reward multiple.
///
/// LONG: stop = lowest low of the last `stop_lookback` rows * (1 - buffer).
/// SHORT: stop = highest high * (1 + buffer). None for `SignalType::None`.
pub fn risk_levels(
    table: &IndicatorTable,
    side: SignalType,
    entry: f64,
    risk: &RiskConfig,
) -> Option<RiskLevels> {
    let rows = table.rows();
    if rows.is_empty() {
        return None;
    }
    let recent = &rows[rows.len().saturating_sub(risk.stop_lookback)..];

    match side {
        SignalType::Long => {
            let lowest = recent.iter().map(|r| r.bar.low).fold(f64::INFINITY, f64::min);
            let stop_loss = lowest * (1.0 - risk.stop_buffer);
            Some(RiskLevels {
                stop_loss,
                take_profit: entry + (entry - stop_loss) * risk.reward_multiple,
            })
        }
        SignalType::Short => {
            let highest = recent
                .iter()
                .map(|r| r.bar.high)
                .fold(f64::NEG_INFINITY, f64::max);
            let stop_loss = highest * (1.0 + risk.stop_buffer);
            Some(RiskLevels {
                stop_loss,
                take_profit: entry - (stop_loss - entry) * risk.reward_multiple,
            })
        }
        SignalType::None => None,
    }
}
