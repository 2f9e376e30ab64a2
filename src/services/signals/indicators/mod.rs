//! Technical indicator implementations.

pub mod ema;
pub mod sma;
pub mod stochastic;

pub use ema::Ema;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticSeries, RANGE_EPSILON};
