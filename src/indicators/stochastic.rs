// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
//   %K = (close - lowest low) / (highest high - lowest low) * 100
//   %D = SMA(signal) of %K
//
// The range is taken over the trailing `period` bars.  A zero range (every
// high and low identical) reports the midpoint, %K = 50.
// =============================================================================

use serde::Serialize;

/// Latest stochastic values.  `d` is `None` until `signal` %K values exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StochasticResult {
    pub k: f64,
    pub d: Option<f64>,
}

/// %K for the window ending at bar `end` (inclusive).
fn percent_k(highs: &[f64], lows: &[f64], closes: &[f64], end: usize, period: usize) -> Option<f64> {
    let start = end + 1 - period;
    let highest = highs[start..=end].iter().copied().fold(f64::MIN, f64::max);
    let lowest = lows[start..=end].iter().copied().fold(f64::MAX, f64::min);
    let range = highest - lowest;

    let k = if range == 0.0 {
        50.0
    } else {
        (closes[end] - lowest) / range * 100.0
    };
    k.is_finite().then_some(k)
}

/// Compute the latest %K / %D pair.
///
/// Returns `None` when `period == 0`, the inputs differ in length, or there
/// are fewer than `period` bars.
pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    signal: usize,
) -> Option<StochasticResult> {
    let n = closes.len();
    if period == 0 || n < period || highs.len() != n || lows.len() != n {
        return None;
    }

    let k = percent_k(highs, lows, closes, n - 1, period)?;

    let available = n + 1 - period;
    let d = if signal > 0 && available >= signal {
        let mut sum = 0.0;
        for end in n - signal..n {
            sum += percent_k(highs, lows, closes, end, period)?;
        }
        Some(sum / signal as f64)
    } else {
        None
    };

    Some(StochasticResult { k, d })
}
