// =============================================================================
// Relative Strength Index (RSI): trailing-window average
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes.
//
// Step 1: Take the trailing `period` closes.
// Step 2: Sum the gains and losses of the consecutive deltas inside that
//         window and average them.
// Step 3: RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS)
//
// A window with no down moves (including a perfectly flat one) has an average
// loss of exactly zero and reports RSI = 100.
// =============================================================================

use super::round2;

/// Compute the latest RSI over the trailing `period` closes, rounded to two
/// decimal places.
///
/// Returns `None` when:
/// - `period < 2` (no deltas inside the window).
/// - Fewer than `period` closes.
/// - The result is non-finite.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period < 2 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];

    let (gains, losses) = window.windows(2).fold((0.0_f64, 0.0_f64), |(g, l), w| {
        let delta = w[1] - w[0];
        if delta > 0.0 {
            (g + delta, l)
        } else {
            (g, l + delta.abs())
        }
    });

    let deltas = (period - 1) as f64;
    rsi_from_averages(gains / deltas, losses / deltas).map(round2)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi.clamp(0.0, 100.0))
    } else {
        None
    }
}
