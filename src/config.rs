use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::types::Timeframe;

/// EMA spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaConfig {
    pub fast: usize,
    pub mid: usize,
    /// Trend filter for the continuation strategy.
    pub slow: usize,
}

impl Default for EmaConfig {
    fn default() -> Self {
        Self {
            fast: 20,
            mid: 50,
            slow: 200,
        }
    }
}

/// Stochastic oscillator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StochasticParams {
    pub k_period: usize,
    pub smooth_k: usize,
    pub smooth_d: usize,
}

impl StochasticParams {
    pub const fn new(k_period: usize, smooth_k: usize, smooth_d: usize) -> Self {
        Self {
            k_period,
            smooth_k,
            smooth_d,
        }
    }

    /// Parse "k,smooth_k,smooth_d".
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<usize> = s
            .split(',')
            .map(|p| p.trim().parse().ok())
            .collect::<Option<Vec<_>>>()?;
        match parts.as_slice() {
            [k, sk, sd] => Some(Self::new(*k, *sk, *sd)),
            _ => None,
        }
    }

    /// Index of the first bar with a defined %D (0-based).
    pub fn warm_up(&self) -> usize {
        self.k_period + self.smooth_k + self.smooth_d - 3
    }

    /// Display label, e.g. "Stoch 9 3 1".
    pub fn label(&self) -> String {
        format!("Stoch {} {} {}", self.k_period, self.smooth_k, self.smooth_d)
    }
}

/// Default oscillator set, fastest first.
pub const DEFAULT_STOCHASTICS: [StochasticParams; 4] = [
    StochasticParams::new(9, 3, 1),
    StochasticParams::new(14, 3, 1),
    StochasticParams::new(44, 4, 1),
    StochasticParams::new(60, 10, 1),
];

/// Thresholds for the trend-continuation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Fast %K below this is a pullback in an uptrend.
    pub oversold: f64,
    /// Fast %K above this is a rally in a downtrend.
    pub overbought: f64,
    /// Slow %K must sit on the trend side of this line.
    pub slow_midline: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            oversold: 20.0,
            overbought: 80.0,
            slow_midline: 50.0,
        }
    }
}

/// Thresholds for divergence detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivergenceConfig {
    /// Fast %K band for a regular bullish divergence.
    pub oversold: f64,
    /// Fast %K band for a regular bearish divergence.
    pub overbought: f64,
    /// Every %K must be below this for the reversal trigger.
    pub confluence_oversold: f64,
    /// Every %K must be above this for the reversal trigger.
    pub confluence_overbought: f64,
    /// Bars scanned for the prior extremum, including the current bar.
    pub lookback: usize,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            oversold: 35.0,
            overbought: 65.0,
            confluence_oversold: 35.0,
            confluence_overbought: 65.0,
            lookback: 40,
        }
    }
}

/// Pivot confirmation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PivotMode {
    /// Symmetric window, needs `window` bars on the right.
    #[default]
    Offline,
    /// Left window only, no look-ahead.
    Causal,
}

/// Pivot detection and pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    pub window: usize,
    /// Pairs must be more than this many bars apart.
    pub min_spacing: usize,
    /// Pairs must be less than this many bars apart.
    pub max_spacing: usize,
    pub mode: PivotMode,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            window: 5,
            min_spacing: 5,
            max_spacing: 60,
            mode: PivotMode::Offline,
        }
    }
}

/// Stop/target placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Target distance as a multiple of stop distance.
    pub reward_multiple: f64,
    /// Fraction added beyond the recent extreme (0.002 = 0.2%).
    pub stop_buffer: f64,
    /// Bars scanned for the recent extreme.
    pub stop_lookback: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            reward_multiple: 3.0,
            stop_buffer: 0.002,
            stop_lookback: 10,
        }
    }
}

/// Every tunable of one engine evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub ema: EmaConfig,
    /// Ordered fastest (shortest period) to slowest.
    pub stochastics: Vec<StochasticParams>,
    pub trend: TrendConfig,
    pub divergence: DivergenceConfig,
    pub pivot: PivotConfig,
    pub risk: RiskConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ema: EmaConfig::default(),
            stochastics: DEFAULT_STOCHASTICS.to_vec(),
            trend: TrendConfig::default(),
            divergence: DivergenceConfig::default(),
            pivot: PivotConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load overrides from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Format: "9,3,1;14,3,1;44,4,1;60,10,1"
        let stochastics = env::var("STOCH_PARAMS")
            .ok()
            .and_then(|s| {
                s.split(';')
                    .filter(|p| !p.trim().is_empty())
                    .map(StochasticParams::parse)
                    .collect::<Option<Vec<_>>>()
            })
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.stochastics);

        let pivot_mode = match env::var("PIVOT_MODE").ok().as_deref() {
            Some("causal") => PivotMode::Causal,
            Some("offline") => PivotMode::Offline,
            _ => defaults.pivot.mode,
        };

        Self {
            ema: EmaConfig {
                fast: env_parse("EMA_FAST_SPAN", defaults.ema.fast),
                mid: env_parse("EMA_MID_SPAN", defaults.ema.mid),
                slow: env_parse("EMA_SLOW_SPAN", defaults.ema.slow),
            },
            stochastics,
            trend: TrendConfig {
                oversold: env_parse("TREND_OVERSOLD", defaults.trend.oversold),
                overbought: env_parse("TREND_OVERBOUGHT", defaults.trend.overbought),
                slow_midline: env_parse("TREND_SLOW_MIDLINE", defaults.trend.slow_midline),
            },
            divergence: DivergenceConfig {
                oversold: env_parse("DIVERGENCE_OVERSOLD", defaults.divergence.oversold),
                overbought: env_parse("DIVERGENCE_OVERBOUGHT", defaults.divergence.overbought),
                confluence_oversold: env_parse(
                    "CONFLUENCE_OVERSOLD",
                    defaults.divergence.confluence_oversold,
                ),
                confluence_overbought: env_parse(
                    "CONFLUENCE_OVERBOUGHT",
                    defaults.divergence.confluence_overbought,
                ),
                lookback: env_parse("DIVERGENCE_LOOKBACK", defaults.divergence.lookback),
            },
            pivot: PivotConfig {
                window: env_parse("PIVOT_WINDOW", defaults.pivot.window),
                min_spacing: env_parse("PIVOT_MIN_SPACING", defaults.pivot.min_spacing),
                max_spacing: env_parse("PIVOT_MAX_SPACING", defaults.pivot.max_spacing),
                mode: pivot_mode,
            },
            risk: RiskConfig {
                reward_multiple: env_parse("RISK_REWARD_MULTIPLE", defaults.risk.reward_multiple),
                stop_buffer: env_parse("STOP_BUFFER", defaults.risk.stop_buffer),
                stop_lookback: env_parse("STOP_LOOKBACK", defaults.risk.stop_lookback),
            },
        }
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.ema.fast == 0 || self.ema.mid == 0 || self.ema.slow == 0 {
            return Err(EngineError::invalid("EMA spans must be positive"));
        }
        if self.stochastics.is_empty() {
            return Err(EngineError::invalid("at least one stochastic is required"));
        }
        if self
            .stochastics
            .iter()
            .any(|p| p.k_period == 0 || p.smooth_k == 0 || p.smooth_d == 0)
        {
            return Err(EngineError::invalid("stochastic periods must be positive"));
        }
        if self
            .stochastics
            .windows(2)
            .any(|w| w[0].k_period > w[1].k_period)
        {
            return Err(EngineError::invalid(
                "stochastics must be ordered fastest to slowest",
            ));
        }
        if self.trend.oversold >= self.trend.overbought {
            return Err(EngineError::invalid("trend oversold must be below overbought"));
        }
        if self.divergence.oversold >= self.divergence.overbought
            || self.divergence.confluence_oversold >= self.divergence.confluence_overbought
        {
            return Err(EngineError::invalid(
                "divergence oversold must be below overbought",
            ));
        }
        if self.divergence.lookback < 2 {
            return Err(EngineError::invalid("divergence lookback must be at least 2"));
        }
        if self.pivot.window == 0 {
            return Err(EngineError::invalid("pivot window must be positive"));
        }
        if self.pivot.min_spacing >= self.pivot.max_spacing {
            return Err(EngineError::invalid(
                "pivot min spacing must be below max spacing",
            ));
        }
        if self.risk.reward_multiple <= 0.0 || self.risk.stop_buffer < 0.0 {
            return Err(EngineError::invalid(
                "reward multiple must be positive and stop buffer non-negative",
            ));
        }
        if self.risk.stop_lookback == 0 {
            return Err(EngineError::invalid("stop lookback must be positive"));
        }
        Ok(())
    }

    /// Bars before the slowest stochastic's %D is defined.
    pub fn stochastic_warm_up(&self) -> usize {
        self.stochastics
            .iter()
            .map(StochasticParams::warm_up)
            .max()
            .unwrap_or(0)
    }

    /// Shortest sanitized series an evaluation accepts.
    pub fn min_bars(&self) -> usize {
        (self.ema.slow + 1)
            .max(self.stochastic_warm_up() + self.divergence.lookback)
            .max(self.stochastic_warm_up() + self.risk.stop_lookback)
    }

    pub fn fastest(&self) -> Option<&StochasticParams> {
        self.stochastics.first()
    }

    pub fn slowest(&self) -> Option<&StochasticParams> {
        self.stochastics.last()
    }
}

/// Binary configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbol shown in reports and notifications.
    pub symbol: String,
    pub timeframe: Timeframe,
    /// JSON file with the bar array; stdin when absent.
    pub bars_path: Option<String>,
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            symbol: env::var("SYMBOL").unwrap_or_else(|_| "BTC/USDT".to_string()),
            timeframe: timeframe_from_env(),
            bars_path: env::var("BARS_PATH").ok(),
            engine: EngineConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn timeframe_from_env() -> Timeframe {
    match env::var("TIMEFRAME") {
        Ok(value) => Timeframe::from_str(&value).unwrap_or_else(|| {
            let fallback = Timeframe::default();
            warn!(
                "Unknown TIMEFRAME '{}' (expected 15m, 1h or 4h), using {}",
                value, fallback
            );
            fallback
        }),
        Err(_) => Timeframe::default(),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
