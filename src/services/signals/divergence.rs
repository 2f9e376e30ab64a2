//! Divergence analysis between price pivots and the fast oscillator.
//!
//! Regular divergence: price makes a new extreme that the oscillator does not
//! confirm, inside the overbought/oversold band. Reversal signal.
//!
//! Hidden divergence: price holds a higher low (lower high) while the
//! oscillator makes a lower low (higher high). Trend confirmation only, never
//! a trigger.

use super::pivots::{extremum_index, latest_pair, PivotDetector};
use super::table::{IndicatorSet, IndicatorTable};
use crate::config::{DivergenceConfig, EngineConfig, PivotConfig};
use crate::types::{DivergenceClass, DivergenceDirection, DivergenceEvent, Pivot, PivotKind};

/// Pairs price pivots with fast %K values and classifies the mismatch.
#[derive(Debug, Clone, Copy)]
pub struct DivergenceAnalyzer {
    divergence: DivergenceConfig,
    pivot: PivotConfig,
}

impl DivergenceAnalyzer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            divergence: config.divergence,
            pivot: config.pivot,
        }
    }

    /// Classify two same-kind pivots given the oscillator at each.
    pub fn classify(
        &self,
        older: Pivot,
        newer: Pivot,
        osc_older: f64,
        osc_newer: f64,
    ) -> Option<DivergenceEvent> {
        if older.kind != newer.kind {
            return None;
        }

        let (direction, class) = match newer.kind {
            PivotKind::Low => {
                if newer.value < older.value
                    && osc_newer > osc_older
                    && osc_newer < self.divergence.oversold
                {
                    (DivergenceDirection::Bullish, DivergenceClass::Regular)
                } else if newer.value > older.value && osc_newer < osc_older {
                    (DivergenceDirection::Bullish, DivergenceClass::Hidden)
                } else {
                    return None;
                }
            }
            PivotKind::High => {
                if newer.value > older.value
                    && osc_newer < osc_older
                    && osc_newer > self.divergence.overbought
                {
                    (DivergenceDirection::Bearish, DivergenceClass::Regular)
                } else if newer.value < older.value && osc_newer > osc_older {
                    (DivergenceDirection::Bearish, DivergenceClass::Hidden)
                } else {
                    return None;
                }
            }
        };

        Some(DivergenceEvent {
            direction,
            class,
            price_leg: (older, newer),
            oscillator_leg: (osc_older, osc_newer),
        })
    }

    /// Direction in which every oscillator is stretched, if any.
    pub fn confluence(&self, set: &IndicatorSet) -> Option<DivergenceDirection> {
        if set.all_k_below(self.divergence.confluence_oversold) {
            Some(DivergenceDirection::Bullish)
        } else if set.all_k_above(self.divergence.confluence_overbought) {
            Some(DivergenceDirection::Bearish)
        } else {
            None
        }
    }

    /// Regular divergence at the latest bar.
    ///
    /// The latest bar must break the extreme of the `lookback - 1` bars before
    /// it. The older leg is the earliest bar holding that extreme.
    pub fn live(&self, table: &IndicatorTable, kind: PivotKind) -> Option<DivergenceEvent> {
        let rows = table.rows();
        let len = rows.len();
        if len < 2 {
            return None;
        }

        let last = len - 1;
        let start = len.saturating_sub(self.divergence.lookback);
        if start >= last {
            return None;
        }

        let values = match kind {
            PivotKind::High => table.highs(),
            PivotKind::Low => table.lows(),
        };

        let window = &values[start..=last];
        let detector = PivotDetector::causal(last - start);
        if !detector.is_pivot(window, last - start, kind) {
            return None;
        }

        let older_index = start + extremum_index(&values[start..last], kind)?;
        let older = Pivot {
            index: older_index,
            time: rows[older_index].bar.time,
            value: values[older_index],
            kind,
        };
        let newer = Pivot {
            index: last,
            time: rows[last].bar.time,
            value: values[last],
            kind,
        };

        let event = self.classify(
            older,
            newer,
            table.fast_k_at(older_index)?,
            table.fast_k_at(last)?,
        )?;
        (event.class == DivergenceClass::Regular).then_some(event)
    }

    /// Reversal trigger: all oscillators stretched and a regular divergence
    /// in the same direction at the latest bar.
    pub fn reversal(&self, table: &IndicatorTable) -> Option<DivergenceEvent> {
        let last = table.last()?;
        let kind = match self.confluence(&last.indicators)? {
            DivergenceDirection::Bullish => PivotKind::Low,
            DivergenceDirection::Bearish => PivotKind::High,
        };
        self.live(table, kind)
    }

    /// Regular and hidden divergences between the latest eligible pivot pairs.
    pub fn pivot_divergences(&self, table: &IndicatorTable, pivots: &[Pivot]) -> Vec<DivergenceEvent> {
        [PivotKind::Low, PivotKind::High]
            .iter()
            .filter_map(|&kind| {
                let (older, newer) = latest_pair(pivots, kind, &self.pivot)?;
                self.classify(
                    older,
                    newer,
                    table.fast_k_at(older.index)?,
                    table.fast_k_at(newer.index)?,
                )
            })
            .collect()
    }
}
