use serde::{Deserialize, Serialize};

use super::ChartPoint;

/// Kind of local extremum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotKind {
    High,
    Low,
}

impl PivotKind {
    pub fn opposite(&self) -> Self {
        match self {
            PivotKind::High => PivotKind::Low,
            PivotKind::Low => PivotKind::High,
        }
    }
}

/// A confirmed local extremum of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pivot {
    /// Index into the series the pivot was detected on.
    pub index: usize,
    /// Bar timestamp (milliseconds).
    pub time: i64,
    /// Price (or indicator value) at the pivot.
    pub value: f64,
    pub kind: PivotKind,
}

impl Pivot {
    pub fn point(&self) -> ChartPoint {
        ChartPoint {
            time: self.time,
            price: self.value,
        }
    }
}

/// Direction implied by a divergence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceDirection {
    Bullish,
    Bearish,
}

/// Regular divergence signals reversal, hidden divergence confirms the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivergenceClass {
    Regular,
    Hidden,
}

/// Mismatch between two price pivots and the oscillator at those bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergenceEvent {
    pub direction: DivergenceDirection,
    pub class: DivergenceClass,
    /// (older, newer) price pivots.
    pub price_leg: (Pivot, Pivot),
    /// Oscillator values at (older, newer).
    pub oscillator_leg: (f64, f64),
}

impl DivergenceEvent {
    /// Line coordinates from the older to the newer price pivot.
    pub fn line(&self) -> DivergenceLine {
        DivergenceLine {
            from: self.price_leg.0.point(),
            to: self.price_leg.1.point(),
        }
    }
}

/// Two chart coordinates for drawing a divergence line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivergenceLine {
    pub from: ChartPoint,
    pub to: ChartPoint,
}

/// Directional bias of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Long,
    Short,
    #[default]
    None,
}

impl SignalType {
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::Long => "LONG",
            SignalType::Short => "SHORT",
            SignalType::None => "NONE",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, SignalType::None)
    }
}

impl From<DivergenceDirection> for SignalType {
    fn from(direction: DivergenceDirection) -> Self {
        match direction {
            DivergenceDirection::Bullish => SignalType::Long,
            DivergenceDirection::Bearish => SignalType::Short,
        }
    }
}

/// Strategy that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// All oscillators stretched plus a regular divergence.
    ReversalDivergence,
    /// Pullback against the slow EMA trend.
    TrendContinuation,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::ReversalDivergence => "reversal-divergence",
            Strategy::TrendContinuation => "trend-continuation",
        }
    }
}

/// Output of one classifier evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    /// Human-readable reason; empty when no signal fired.
    pub reason: String,
    /// Latest close.
    pub entry: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<DivergenceLine>,
}

impl Signal {
    pub fn none(entry: f64) -> Self {
        Self {
            signal_type: SignalType::None,
            strategy: None,
            reason: String::new(),
            entry,
            stop_loss: None,
            take_profit: None,
            annotation: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.signal_type.is_active()
    }

    /// Strategy label, empty when no signal fired.
    pub fn strategy_label(&self) -> &'static str {
        self.strategy.map(|s| s.label()).unwrap_or("")
    }

    /// Take-profit distance divided by stop distance.
    pub fn reward_risk(&self) -> Option<f64> {
        let sl = self.stop_loss?;
        let tp = self.take_profit?;
        let risk = (self.entry - sl).abs();
        if risk == 0.0 {
            return None;
        }
        Some((tp - self.entry).abs() / risk)
    }
}
