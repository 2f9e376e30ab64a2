//! Simple Moving Average (SMA) indicator.

/// SMA (Simple Moving Average) over a possibly-undefined series.
///
/// A value is defined only when all `period` inputs of its window are defined.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn calculate(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut out = vec![None; values.len()];
        if self.period == 0 {
            return out;
        }

        for i in (self.period - 1)..values.len() {
            let window = &values[(i + 1 - self.period)..=i];
            let sum: Option<f64> = window.iter().copied().sum();
            out[i] = sum.map(|s| s / self.period as f64);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_values() {
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0].iter().map(|v| Some(*v)).collect();
        let sma = Sma::new(2).calculate(&values);
        assert_eq!(sma, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_sma_period_one_is_identity() {
        let values = vec![None, Some(3.0), Some(7.0)];
        assert_eq!(Sma::new(1).calculate(&values), values);
    }

    #[test]
    fn test_sma_propagates_undefined() {
        let values = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let sma = Sma::new(3).calculate(&values);
        assert_eq!(sma, vec![None, None, None, Some(4.0)]);
    }

    #[test]
    fn test_sma_short_input() {
        let sma = Sma::new(5).calculate(&[Some(1.0), Some(2.0)]);
        assert_eq!(sma, vec![None, None]);
    }
}
