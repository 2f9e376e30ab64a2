//! Augmented bar table.
//!
//! Each sanitized bar paired with its indicator values. Rows where any
//! indicator is still warming up are left out, so every row is fully defined.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::indicators::{Ema, Stochastic, StochasticSeries};
use crate::config::{EngineConfig, StochasticParams};
use crate::types::Bar;

/// %K and %D of one stochastic at one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

/// Indicator values at one bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSet {
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    /// Same order as `EngineConfig::stochastics`, fastest first.
    pub stochastics: Vec<StochasticValue>,
}

impl IndicatorSet {
    /// %K of the shortest-period stochastic.
    pub fn fast_k(&self) -> Option<f64> {
        self.stochastics.first().map(|s| s.k)
    }

    /// %K of the longest-period stochastic.
    pub fn slow_k(&self) -> Option<f64> {
        self.stochastics.last().map(|s| s.k)
    }

    /// Every %K strictly below `threshold`.
    pub fn all_k_below(&self, threshold: f64) -> bool {
        !self.stochastics.is_empty() && self.stochastics.iter().all(|s| s.k < threshold)
    }

    /// Every %K strictly above `threshold`.
    pub fn all_k_above(&self, threshold: f64) -> bool {
        !self.stochastics.is_empty() && self.stochastics.iter().all(|s| s.k > threshold)
    }
}

/// A bar with its indicator values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub bar: Bar,
    pub indicators: IndicatorSet,
}

/// Bars augmented with EMA and stochastic columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    rows: Vec<IndicatorRow>,
    params: Vec<StochasticParams>,
    degenerate_windows: usize,
}

impl IndicatorTable {
    /// Compute every indicator over a sanitized series.
    pub fn build(series: &[Bar], config: &EngineConfig) -> Self {
        let ema_fast = Ema::new(config.ema.fast).calculate_closes(series);
        let ema_mid = Ema::new(config.ema.mid).calculate_closes(series);
        let ema_slow = Ema::new(config.ema.slow).calculate_closes(series);

        let stochs: Vec<StochasticSeries> = config
            .stochastics
            .iter()
            .map(|p| Stochastic::new(*p).calculate(series))
            .collect();
        let degenerate_windows = stochs.iter().map(|s| s.degenerate_windows).sum();

        let rows: Vec<IndicatorRow> = series
            .iter()
            .enumerate()
            .filter_map(|(i, bar)| {
                let stochastics = stochs
                    .iter()
                    .map(|s| match (s.k[i], s.d[i]) {
                        (Some(k), Some(d)) => Some(StochasticValue { k, d }),
                        _ => None,
                    })
                    .collect::<Option<Vec<_>>>()?;

                Some(IndicatorRow {
                    bar: *bar,
                    indicators: IndicatorSet {
                        ema_fast: ema_fast[i],
                        ema_mid: ema_mid[i],
                        ema_slow: ema_slow[i],
                        stochastics,
                    },
                })
            })
            .collect();

        debug!(
            "Indicator table: {} of {} bars defined, {} flat stochastic windows",
            rows.len(),
            series.len(),
            degenerate_windows
        );

        Self {
            rows,
            params: config.stochastics.clone(),
            degenerate_windows,
        }
    }

    /// Wrap precomputed rows.
    pub fn from_rows(rows: Vec<IndicatorRow>, params: Vec<StochasticParams>) -> Self {
        Self {
            rows,
            params,
            degenerate_windows: 0,
        }
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    pub fn params(&self) -> &[StochasticParams] {
        &self.params
    }

    /// Flat-range stochastic windows met while building.
    pub fn degenerate_windows(&self) -> usize {
        self.degenerate_windows
    }

    pub fn highs(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.bar.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.bar.low).collect()
    }

    pub fn times(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.bar.time).collect()
    }

    /// Fast %K at `index`.
    pub fn fast_k_at(&self, index: usize) -> Option<f64> {
        self.rows.get(index)?.indicators.fast_k()
    }
}
