//! Quadstoch - multi-period stochastic signal engine
//!
//! Derives a LONG/SHORT/NONE signal with entry, stop-loss and take-profit from
//! an OHLC bar series, using three EMAs, four stochastic oscillators, pivot
//! detection and price/oscillator divergence.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{EngineConfig, StochasticParams};
pub use error::{EngineError, Result};
pub use services::signals::SignalReport;
pub use services::SignalEngine;
pub use types::*;
