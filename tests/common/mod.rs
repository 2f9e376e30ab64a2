//! Bar fixtures shared by the integration tests.

#![allow(dead_code)]

use quadstoch::Bar;

/// 15 minute spacing in milliseconds.
pub const STEP_MS: i64 = 900_000;

/// Bar with a fixed half-point spread around `close`.
pub fn bar(i: usize, close: f64) -> Bar {
    Bar::new(i as i64 * STEP_MS, close, close + 0.5, close - 0.5, close, 1.0)
}

pub fn flat(count: usize, price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| Bar::new(i as i64 * STEP_MS, price, price, price, price, 0.0))
        .collect()
}

/// Reflect a series around `axis` so highs become lows.
pub fn mirror(bars: &[Bar], axis: f64) -> Vec<Bar> {
    bars.iter()
        .map(|b| Bar::new(b.time, axis - b.open, axis - b.low, axis - b.high, axis - b.close, b.volume))
        .collect()
}

/// Steady rally followed by a sharp four-bar pullback.
///
/// The fast oscillator drops near 5 while the slowest stays above 50 and
/// price is far above the 200 EMA.
pub fn pullback_in_uptrend() -> Vec<Bar> {
    let mut closes: Vec<f64> = (0..290).map(|i| 100.0 + i as f64).collect();
    closes.extend([386.0, 383.0, 380.0, 377.0]);
    closes.iter().enumerate().map(|(i, &c)| bar(i, c)).collect()
}

/// Slow decline, a capitulation bar at 270, a quiet base, then a marginal
/// new low on the last bar.
///
/// Every %K sits below 35 at the end and the fast %K is higher than it was at
/// the capitulation low.
pub fn bullish_divergence() -> Vec<Bar> {
    let mut bars: Vec<Bar> = (0..270).map(|i| bar(i, 400.0 - 0.5 * i as f64)).collect();
    bars.push(Bar::new(270 * STEP_MS, 265.0, 265.5, 255.0, 255.0, 1.0));
    for i in 271..299 {
        bars.push(Bar::new(i as i64 * STEP_MS, 257.6, 258.5, 257.5, 257.6, 1.0));
    }
    bars.push(Bar::new(299 * STEP_MS, 257.0, 258.0, 254.5, 255.0, 1.0));
    bars
}
