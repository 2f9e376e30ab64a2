use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bar timeframe the caller fetched the series at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
}

impl Timeframe {
    /// Get the timeframe from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "15m" => Some(Timeframe::FifteenMinutes),
            "1h" => Some(Timeframe::OneHour),
            "4h" => Some(Timeframe::FourHours),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
        }
    }

    /// Get the bar size in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Timeframe::FifteenMinutes => 900,
            Timeframe::OneHour => 3600,
            Timeframe::FourHours => 14400,
        }
    }

    /// Number of trailing bars shown on a chart for this timeframe.
    pub fn display_bars(&self) -> usize {
        match self {
            Timeframe::FifteenMinutes => 96, // 24 hours
            Timeframe::OneHour => 144,       // 6 days
            Timeframe::FourHours => 180,     // 1 month
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLCV bar. `time` is a unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Bar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether every field is usable for indicator math.
    pub fn is_valid(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| v.is_finite())
            && self.close > 0.0
            && self.volume >= 0.0
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time)
    }
}

/// Bar as delivered by a data source: an object or an exchange-style
/// `[time, open, high, low, close, volume]` row. Prices may be null or absent.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawBar {
    Object {
        time: i64,
        #[serde(default)]
        open: Option<f64>,
        #[serde(default)]
        high: Option<f64>,
        #[serde(default)]
        low: Option<f64>,
        #[serde(default)]
        close: Option<f64>,
        #[serde(default)]
        volume: Option<f64>,
    },
    Row(i64, Option<f64>, Option<f64>, Option<f64>, Option<f64>, Option<f64>),
}

impl RawBar {
    /// Complete bar, or `None` when a price is missing. Missing volume is 0.
    pub fn to_bar(&self) -> Option<Bar> {
        let (time, open, high, low, close, volume) = match *self {
            RawBar::Object {
                time,
                open,
                high,
                low,
                close,
                volume,
            } => (time, open, high, low, close, volume),
            RawBar::Row(time, open, high, low, close, volume) => (time, open, high, low, close, volume),
        };
        Some(Bar::new(time, open?, high?, low?, close?, volume.unwrap_or(0.0)))
    }
}

/// A (timestamp, price) coordinate on the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub time: i64,
    pub price: f64,
}
