//! Trading signals service module.
//!
//! Indicator calculations, pivot and divergence analysis, and the rule-based
//! classifier that turns them into one signal with risk levels.

pub mod classifier;
pub mod divergence;
pub mod indicators;
pub mod pivots;
pub mod report;
pub mod table;

pub use classifier::{classify, risk_levels, RiskLevels};
pub use divergence::DivergenceAnalyzer;
pub use pivots::PivotDetector;
pub use report::{ChartRow, ChartWindow, IndicatorSnapshot, SignalReport, StochasticReading};
pub use table::{IndicatorRow, IndicatorSet, IndicatorTable, StochasticValue};
