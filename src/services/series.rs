//! Series sanitizer.
//!
//! Turns a raw bar sequence from the data source into a clean, strictly
//! time-ordered series before any indicator math runs. Also parses the JSON
//! bar arrays the data source delivers.

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::types::{Bar, RawBar};

/// Parse a JSON array of bars.
///
/// Rows that do not parse or lack a price are dropped, like any other bad
/// bar. Only input that is not a JSON array is an error.
pub fn parse_bars(json: &str) -> Result<Vec<Bar>> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| EngineError::InvalidInput(e.to_string()))?;
    let total = rows.len();

    let bars: Vec<Bar> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value::<RawBar>(row).ok())
        .filter_map(|raw| raw.to_bar())
        .collect();

    if bars.len() < total {
        debug!(
            "Parser dropped {} incomplete bars of {}",
            total - bars.len(),
            total
        );
    }

    Ok(bars)
}

/// Clean a raw bar sequence.
///
/// Bars with a non-positive close, non-finite OHLC values or negative volume
/// are dropped. The rest are ordered by timestamp and duplicate timestamps
/// collapse to the last occurrence. Fails with `InsufficientData` when fewer
/// than `min_len` bars survive (or none at all).
pub fn sanitize(raw: &[Bar], min_len: usize) -> Result<Vec<Bar>> {
    let mut bars: Vec<Bar> = raw.iter().filter(|b| b.is_valid()).copied().collect();
    let invalid = raw.len() - bars.len();

    // Stable sort keeps arrival order among equal timestamps.
    bars.sort_by_key(|b| b.time);

    let mut series: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match series.last_mut() {
            Some(last) if last.time == bar.time => *last = bar,
            _ => series.push(bar),
        }
    }

    let duplicates = raw.len() - invalid - series.len();
    if invalid > 0 || duplicates > 0 {
        debug!(
            "Sanitizer dropped {} invalid and {} duplicate bars of {}",
            invalid,
            duplicates,
            raw.len()
        );
    }

    let required = min_len.max(1);
    if series.len() < required {
        return Err(EngineError::insufficient(required, series.len()));
    }

    Ok(series)
}
