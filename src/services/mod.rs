//! Core services: series sanitizing, indicator analysis and the engine.

pub mod engine;
pub mod series;
pub mod signals;

pub use engine::SignalEngine;
pub use series::{parse_bars, sanitize};
