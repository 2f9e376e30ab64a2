//! Pivot (fractal high/low) detection and pairing.

use super::table::IndicatorTable;
use crate::config::{PivotConfig, PivotMode};
use crate::types::{Pivot, PivotKind};

/// Finds local extrema confirmed by `window` neighbours.
///
/// A bar is a HIGH pivot when its value is strictly above every value on its
/// left and not below any value on its right within the window; LOW mirrors
/// this. Equal extremes therefore resolve to the earliest bar. In causal mode
/// only the left side is checked, so a pivot never depends on later bars.
#[derive(Debug, Clone, Copy)]
pub struct PivotDetector {
    window: usize,
    mode: PivotMode,
}

impl PivotDetector {
    pub fn new(window: usize, mode: PivotMode) -> Self {
        Self { window, mode }
    }

    pub fn offline(window: usize) -> Self {
        Self::new(window, PivotMode::Offline)
    }

    pub fn causal(window: usize) -> Self {
        Self::new(window, PivotMode::Causal)
    }

    pub fn from_config(config: &PivotConfig) -> Self {
        Self::new(config.window, config.mode)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Whether `values[i]` is a pivot of `kind`.
    pub fn is_pivot(&self, values: &[f64], i: usize, kind: PivotKind) -> bool {
        if i < self.window || i >= values.len() {
            return false;
        }
        if self.mode == PivotMode::Offline && i + self.window >= values.len() {
            return false;
        }

        let current = values[i];
        let left_ok = values[(i - self.window)..i]
            .iter()
            .all(|&v| beats(kind, current, v));
        if !left_ok {
            return false;
        }

        match self.mode {
            PivotMode::Causal => true,
            PivotMode::Offline => values[(i + 1)..=(i + self.window)]
                .iter()
                .all(|&v| !beats(kind, v, current)),
        }
    }

    /// Pivot indices of one numeric series.
    pub fn detect_values(&self, values: &[f64], kind: PivotKind) -> Vec<usize> {
        (0..values.len())
            .filter(|&i| self.is_pivot(values, i, kind))
            .collect()
    }

    /// HIGH pivots from `highs` and LOW pivots from `lows`, ordered by index.
    pub fn detect(&self, highs: &[f64], lows: &[f64], times: &[i64]) -> Vec<Pivot> {
        let len = highs.len().min(lows.len()).min(times.len());
        let mut pivots = Vec::new();

        for i in 0..len {
            if self.is_pivot(&highs[..len], i, PivotKind::High) {
                pivots.push(Pivot {
                    index: i,
                    time: times[i],
                    value: highs[i],
                    kind: PivotKind::High,
                });
            }
            if self.is_pivot(&lows[..len], i, PivotKind::Low) {
                pivots.push(Pivot {
                    index: i,
                    time: times[i],
                    value: lows[i],
                    kind: PivotKind::Low,
                });
            }
        }

        pivots
    }

    /// Price pivots of an indicator table.
    pub fn detect_table(&self, table: &IndicatorTable) -> Vec<Pivot> {
        self.detect(&table.highs(), &table.lows(), &table.times())
    }
}

fn beats(kind: PivotKind, a: f64, b: f64) -> bool {
    match kind {
        PivotKind::High => a > b,
        PivotKind::Low => a < b,
    }
}

/// Earliest index holding the maximum (HIGH) or minimum (LOW) value.
pub fn extremum_index(values: &[f64], kind: PivotKind) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some(b) if !beats(kind, v, values[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Whether two same-kind pivots are far enough apart, but not too far, to pair.
pub fn is_eligible_pair(older: &Pivot, newer: &Pivot, config: &PivotConfig) -> bool {
    if older.kind != newer.kind || newer.index <= older.index {
        return false;
    }
    let gap = newer.index - older.index;
    gap > config.min_spacing && gap < config.max_spacing
}

/// The latest pivot of `kind` and its closest eligible predecessor.
///
/// Predecessors too close to the latest pivot are skipped; the search stops
/// once the spacing reaches `max_spacing`.
pub fn latest_pair(pivots: &[Pivot], kind: PivotKind, config: &PivotConfig) -> Option<(Pivot, Pivot)> {
    let mut same_kind = pivots.iter().rev().filter(|p| p.kind == kind);
    let newer = *same_kind.next()?;

    for older in same_kind {
        if newer.index - older.index >= config.max_spacing {
            break;
        }
        if is_eligible_pair(older, &newer, config) {
            return Some((*older, newer));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZIGZAG: [f64; 9] = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 5.0, 2.0, 1.0];

    fn pivot(index: usize, kind: PivotKind) -> Pivot {
        Pivot {
            index,
            time: index as i64,
            value: 0.0,
            kind,
        }
    }

    fn wave(count: usize) -> (Vec<f64>, Vec<f64>, Vec<i64>) {
        let mid: Vec<f64> = (0..count)
            .map(|i| 100.0 + (i as f64 * 0.45).sin() * 8.0 + (i as f64 * 0.13).cos() * 3.0)
            .collect();
        let highs = mid.iter().map(|m| m + 1.0).collect();
        let lows = mid.iter().map(|m| m - 1.0).collect();
        let times = (0..count as i64).collect();
        (highs, lows, times)
    }

    #[test]
    fn test_offline_pivots() {
        let detector = PivotDetector::offline(2);
        assert_eq!(detector.detect_values(&ZIGZAG, PivotKind::High), vec![2, 6]);
        assert_eq!(detector.detect_values(&ZIGZAG, PivotKind::Low), vec![4]);
    }

    #[test]
    fn test_causal_pivots() {
        let detector = PivotDetector::causal(2);
        assert_eq!(detector.detect_values(&ZIGZAG, PivotKind::High), vec![2, 6]);
        // index 8 needs no right side in causal mode
        assert_eq!(detector.detect_values(&ZIGZAG, PivotKind::Low), vec![4, 8]);
    }

    #[test]
    fn test_causal_ignores_future_bars() {
        let detector = PivotDetector::causal(2);
        let mut extended = ZIGZAG.to_vec();
        let before = detector.detect_values(&extended, PivotKind::High);
        extended.extend_from_slice(&[9.0, 0.5, 7.0]);
        let after = detector.detect_values(&extended, PivotKind::High);
        assert_eq!(&after[..before.len()], &before[..]);
    }

    #[test]
    fn test_ties_resolve_to_earliest() {
        let values = [1.0, 3.0, 3.0, 1.0, 0.5];
        let detector = PivotDetector::offline(1);
        assert_eq!(detector.detect_values(&values, PivotKind::High), vec![1]);
        assert_eq!(extremum_index(&values, PivotKind::High), Some(1));
        assert_eq!(extremum_index(&[2.0, 1.0, 1.0], PivotKind::Low), Some(1));
        assert_eq!(extremum_index(&[], PivotKind::Low), None);
    }

    #[test]
    fn test_window_edges_excluded() {
        let detector = PivotDetector::offline(3);
        let values = [9.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.0];
        assert!(detector.detect_values(&values, PivotKind::High).is_empty());
        assert!(!detector.is_pivot(&values, 100, PivotKind::High));
    }

    #[test]
    fn test_detect_orders_by_index() {
        let (highs, lows, times) = wave(120);
        let pivots = PivotDetector::offline(5).detect(&highs, &lows, &times);
        assert!(!pivots.is_empty());
        assert!(pivots.windows(2).all(|w| w[0].index <= w[1].index));
        for p in &pivots {
            assert_eq!(p.time, times[p.index]);
            let expected = match p.kind {
                PivotKind::High => highs[p.index],
                PivotKind::Low => lows[p.index],
            };
            assert_eq!(p.value, expected);
        }
    }

    #[test]
    fn test_pivot_symmetry_under_negation() {
        let (highs, lows, times) = wave(200);
        let neg_highs: Vec<f64> = lows.iter().map(|v| -v).collect();
        let neg_lows: Vec<f64> = highs.iter().map(|v| -v).collect();

        for detector in [PivotDetector::offline(5), PivotDetector::causal(5)] {
            let original = detector.detect(&highs, &lows, &times);
            let mirrored = detector.detect(&neg_highs, &neg_lows, &times);

            let indices = |pivots: &[Pivot], kind: PivotKind| -> Vec<usize> {
                pivots.iter().filter(|p| p.kind == kind).map(|p| p.index).collect()
            };
            assert_eq!(indices(&original, PivotKind::High), indices(&mirrored, PivotKind::Low));
            assert_eq!(indices(&original, PivotKind::Low), indices(&mirrored, PivotKind::High));
        }
    }

    #[test]
    fn test_eligible_pair_spacing() {
        let config = PivotConfig::default();
        let newer = pivot(100, PivotKind::Low);
        assert!(!is_eligible_pair(&pivot(95, PivotKind::Low), &newer, &config));
        assert!(is_eligible_pair(&pivot(94, PivotKind::Low), &newer, &config));
        assert!(is_eligible_pair(&pivot(41, PivotKind::Low), &newer, &config));
        assert!(!is_eligible_pair(&pivot(40, PivotKind::Low), &newer, &config));
        assert!(!is_eligible_pair(&pivot(90, PivotKind::High), &newer, &config));
    }

    #[test]
    fn test_latest_pair_skips_close_pivots() {
        let config = PivotConfig::default();
        let pivots = vec![
            pivot(50, PivotKind::Low),
            pivot(70, PivotKind::Low),
            pivot(80, PivotKind::High),
            pivot(97, PivotKind::Low),
            pivot(100, PivotKind::Low),
        ];
        let (older, newer) = latest_pair(&pivots, PivotKind::Low, &config).unwrap();
        assert_eq!(newer.index, 100);
        assert_eq!(older.index, 70);
        assert!(latest_pair(&pivots, PivotKind::High, &config).is_none());
    }

    #[test]
    fn test_latest_pair_respects_max_spacing() {
        let config = PivotConfig::default();
        let pivots = vec![pivot(10, PivotKind::High), pivot(100, PivotKind::High)];
        assert!(latest_pair(&pivots, PivotKind::High, &config).is_none());
    }
}
