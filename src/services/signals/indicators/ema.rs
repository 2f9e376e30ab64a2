//! Exponential Moving Average (EMA) indicator.

use crate::types::Bar;

/// EMA (Exponential Moving Average) indicator.
///
/// Seeded with the first value instead of an SMA, so every bar has a value:
/// `ema[0] = x[0]`, `ema[i] = a * x[i] + (1 - a) * ema[i - 1]`, `a = 2 / (span + 1)`.
/// Early values lean toward the seed.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    pub fn span(&self) -> usize {
        self.span
    }

    /// Smoothing factor.
    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }

    /// EMA over a raw value series.
    pub fn calculate(&self, values: &[f64]) -> Vec<f64> {
        let alpha = self.alpha();
        let mut out = Vec::with_capacity(values.len());
        let mut prev: Option<f64> = None;

        for &value in values {
            let ema = match prev {
                Some(p) => alpha * value + (1.0 - alpha) * p,
                None => value,
            };
            out.push(ema);
            prev = Some(ema);
        }

        out
    }

    /// EMA of closing prices.
    pub fn calculate_closes(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.calculate(&closes)
    }
}
