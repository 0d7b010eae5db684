// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   MACD line = EMA(fast) - EMA(slow)      (per bar, both seeded at bar 0)
//   Signal    = EMA(signal) of the MACD line
//   Histogram = MACD line - Signal
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;

/// Latest MACD values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the latest MACD triple.
///
/// Returns `None` when any period is zero, when there are fewer closes than
/// `max(fast, slow)`, or when an intermediate EMA breaks on a non-finite
/// value.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Option<MacdResult> {
    if fast == 0 || slow == 0 || signal == 0 {
        return None;
    }
    let required = fast.max(slow);
    if closes.len() < required {
        return None;
    }

    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    if fast_ema.len() != closes.len() || slow_ema.len() != closes.len() {
        return None;
    }

    // The MACD line is meaningful once the longer EMA has seen a full period.
    let macd_line: Vec<f64> = fast_ema[required - 1..]
        .iter()
        .zip(&slow_ema[required - 1..])
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = calculate_ema(&macd_line, signal);
    if signal_line.len() != macd_line.len() {
        return None;
    }

    let macd = *macd_line.last()?;
    let signal = *signal_line.last()?;

    Some(MacdResult {
        macd,
        signal,
        histogram: macd - signal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_insufficient_data() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        assert!(calculate_macd(&closes, 12, 26, 9).is_none());
    }

    #[test]
    fn macd_zero_period() {
        let closes = vec![1.0; 40];
        assert!(calculate_macd(&closes, 0, 26, 9).is_none());
        assert!(calculate_macd(&closes, 12, 26, 0).is_none());
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let m = calculate_macd(&[100.0; 40], 12, 26, 9).unwrap();
        assert!(m.macd.abs() < 1e-9);
        assert!(m.signal.abs() < 1e-9);
        assert!(m.histogram.abs() < 1e-9);
    }

    #[test]
    fn macd_uptrend_is_positive() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let m = calculate_macd(&closes, 12, 26, 9).unwrap();
        assert!(m.macd > 0.0, "fast EMA should lead in an uptrend");
    }

    #[test]
    fn macd_histogram_identity() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.1)
            .collect();
        for n in 26..=closes.len() {
            let m = calculate_macd(&closes[..n], 12, 26, 9).unwrap();
            assert_eq!(m.histogram, m.macd - m.signal);
        }
    }

    #[test]
    fn macd_at_exact_required_length() {
        let closes: Vec<f64> = (1..=26).map(|x| x as f64).collect();
        let m = calculate_macd(&closes, 12, 26, 9).unwrap();
        // A single MACD point seeds its own signal.
        assert_eq!(m.signal, m.macd);
        assert_eq!(m.histogram, 0.0);
    }
}
