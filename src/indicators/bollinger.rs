// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the population standard deviation
// of the trailing window.

use serde::Serialize;

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Returns `None` when there are fewer than `period` data points or the
/// bands are non-finite.  A window whose prices are all identical has σ = 0
/// exactly, so upper = middle = lower.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerResult> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;

    let flat = window.iter().all(|&x| x == window[0]);
    let std_dev = if flat {
        0.0
    } else {
        let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period as f64;
        variance.sqrt()
    };

    // A flat window is pinned to its own price so rounding in the mean cannot
    // split the bands.
    let middle = if flat { window[0] } else { middle };
    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;

    if upper.is_finite() && lower.is_finite() {
        Some(BollingerResult {
            upper,
            middle,
            lower,
        })
    } else {
        None
    }
}
