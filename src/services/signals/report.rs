//! Output assembly for the presentation and notification layers.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::table::{IndicatorRow, IndicatorTable};
use crate::config::StochasticParams;
use crate::types::{DivergenceEvent, Pivot, Signal, Timeframe};

/// Share of the visible price span added above and below the chart range.
const CHART_PADDING: f64 = 0.05;

/// One labelled oscillator reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StochasticReading {
    /// e.g. "Stoch 9 3 1".
    pub label: String,
    pub k: f64,
    pub d: f64,
}

/// Indicator values at the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub time: i64,
    pub close: f64,
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    pub stochastics: Vec<StochasticReading>,
}

impl IndicatorSnapshot {
    pub fn from_row(row: &IndicatorRow, params: &[StochasticParams]) -> Self {
        let stochastics = row
            .indicators
            .stochastics
            .iter()
            .zip(params)
            .map(|(value, p)| StochasticReading {
                label: p.label(),
                k: value.k,
                d: value.d,
            })
            .collect();

        Self {
            time: row.bar.time,
            close: row.bar.close,
            ema_fast: row.indicators.ema_fast,
            ema_mid: row.indicators.ema_mid,
            ema_slow: row.indicators.ema_slow,
            stochastics,
        }
    }
}

/// One candle plus overlays on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    /// %K per stochastic, fastest first.
    pub k: Vec<f64>,
    /// %D per stochastic, fastest first.
    pub d: Vec<f64>,
}

impl From<&IndicatorRow> for ChartRow {
    fn from(row: &IndicatorRow) -> Self {
        Self {
            time: row.bar.time,
            open: row.bar.open,
            high: row.bar.high,
            low: row.bar.low,
            close: row.bar.close,
            ema_fast: row.indicators.ema_fast,
            ema_mid: row.indicators.ema_mid,
            ema_slow: row.indicators.ema_slow,
            k: row.indicators.stochastics.iter().map(|s| s.k).collect(),
            d: row.indicators.stochastics.iter().map(|s| s.d).collect(),
        }
    }
}

/// Trailing rows shown on a chart with a padded price axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartWindow {
    pub timeframe: Timeframe,
    pub rows: Vec<ChartRow>,
    pub price_low: f64,
    pub price_high: f64,
}

impl ChartWindow {
    /// Last `timeframe.display_bars()` rows of the table.
    pub fn from_table(table: &IndicatorTable, timeframe: Timeframe) -> Self {
        let all = table.rows();
        let visible = &all[all.len().saturating_sub(timeframe.display_bars())..];

        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for row in visible {
            let set = &row.indicators;
            low = low.min(row.bar.low).min(set.ema_fast).min(set.ema_mid).min(set.ema_slow);
            high = high
                .max(row.bar.high)
                .max(set.ema_fast)
                .max(set.ema_mid)
                .max(set.ema_slow);
        }

        let (price_low, price_high) = if visible.is_empty() {
            (0.0, 0.0)
        } else {
            let padding = (high - low) * CHART_PADDING;
            (low - padding, high + padding)
        };

        Self {
            timeframe,
            rows: visible.iter().map(ChartRow::from).collect(),
            price_low,
            price_high,
        }
    }
}

/// Everything one evaluation hands to its consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    /// Timestamp of the latest bar.
    pub as_of: i64,
    pub signal: Signal,
    pub snapshot: IndicatorSnapshot,
    /// Confirmed price pivots over the table.
    pub pivots: Vec<Pivot>,
    /// Pivot-pair divergences; annotations only.
    pub divergences: Vec<DivergenceEvent>,
    pub chart: ChartWindow,
    /// Stochastic windows with zero price range.
    pub degenerate_windows: usize,
    /// False when any stochastic hit a zero-range window.
    pub oscillators_reliable: bool,
}

impl SignalReport {
    /// Package one evaluation. `None` for an empty table.
    pub fn assemble(
        symbol: &str,
        timeframe: Timeframe,
        table: &IndicatorTable,
        signal: Signal,
        pivots: Vec<Pivot>,
        divergences: Vec<DivergenceEvent>,
    ) -> Option<Self> {
        let last = table.last()?;
        let degenerate_windows = table.degenerate_windows();

        Some(Self {
            symbol: symbol.to_string(),
            timeframe,
            as_of: last.bar.time,
            signal,
            snapshot: IndicatorSnapshot::from_row(last, table.params()),
            pivots,
            divergences,
            chart: ChartWindow::from_table(table, timeframe),
            degenerate_windows,
            oscillators_reliable: degenerate_windows == 0,
        })
    }

    /// Message for the notification channel, only when a signal fired.
    pub fn notification(&self) -> Option<String> {
        if !self.signal.is_active() {
            return None;
        }

        let when = DateTime::from_timestamp_millis(self.as_of)
            .map(|t| t.format("%m/%d %H:%M UTC").to_string())
            .unwrap_or_default();

        let mut msg = format!(
            "[{}] {} ({})\nDirection: {}\nPrice: {:.2}",
            self.signal.strategy_label(),
            self.symbol,
            self.timeframe,
            self.signal.signal_type.label(),
            self.signal.entry,
        );
        if let (Some(sl), Some(tp)) = (self.signal.stop_loss, self.signal.take_profit) {
            msg.push_str(&format!("\nTP: {:.2}\nSL: {:.2}", tp, sl));
        }
        if !self.signal.reason.is_empty() {
            msg.push_str(&format!("\nReason: {}", self.signal.reason));
        }
        if !when.is_empty() {
            msg.push_str(&format!("\nAt: {}", when));
        }

        Some(msg)
    }
}
