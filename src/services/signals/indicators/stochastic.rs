//! Stochastic Oscillator indicator.

use super::Sma;
use crate::config::StochasticParams;
use crate::types::Bar;

/// Stand-in for a zero high-low range.
pub const RANGE_EPSILON: f64 = 1e-6;

/// Slow stochastic oscillator.
///
/// Compares the close to the high-low range of the last `k_period` bars:
/// raw %K = (Close - Lowest Low) / (Highest High - Lowest Low) * 100,
/// %K = SMA(raw %K, smooth_k), %D = SMA(%K, smooth_d).
///
/// A flat window divides by `RANGE_EPSILON` instead of zero. Such windows are
/// counted in `StochasticSeries::degenerate_windows`; their values are not
/// clamped.
pub struct Stochastic {
    params: StochasticParams,
}

/// Per-bar %K and %D, `None` during warm-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
    /// Raw %K windows with zero price range.
    pub degenerate_windows: usize,
}

impl Stochastic {
    pub fn new(params: StochasticParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StochasticParams {
        &self.params
    }

    pub fn calculate(&self, bars: &[Bar]) -> StochasticSeries {
        let period = self.params.k_period;
        let mut raw_k = vec![None; bars.len()];
        let mut degenerate_windows = 0;

        if period > 0 {
            for i in (period - 1)..bars.len() {
                let window = &bars[(i + 1 - period)..=i];

                let lowest_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
                let highest_high = window
                    .iter()
                    .map(|c| c.high)
                    .fold(f64::NEG_INFINITY, f64::max);

                let mut range = highest_high - lowest_low;
                if range == 0.0 {
                    degenerate_windows += 1;
                    range = RANGE_EPSILON;
                }

                raw_k[i] = Some(100.0 * (bars[i].close - lowest_low) / range);
            }
        }

        let k = Sma::new(self.params.smooth_k).calculate(&raw_k);
        let d = Sma::new(self.params.smooth_d).calculate(&k);

        StochasticSeries {
            k,
            d,
            degenerate_windows,
        }
    }
}
