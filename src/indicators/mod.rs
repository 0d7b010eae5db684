// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the engine
// publishes.  Every public function returns `Option<T>` (or an empty series)
// so callers are forced to handle insufficient-data and numerical-edge-case
// scenarios; nothing here panics or yields NaN/Infinity.

pub mod adx;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod macd;
pub mod psar;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use bollinger::BollingerResult;
pub use macd::MacdResult;
pub use stochastic::StochasticResult;

/// Round to two decimal places (ratio oscillators are published this way).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
