// =============================================================================
// Commodity Channel Index (CCI)
// =============================================================================
//
//   TP   = (high + low + close) / 3              per bar in the trailing window
//   CCI  = (TP_last - mean(TP)) / (0.015 * mean |TP - mean(TP)|)
//
// A window with zero mean deviation has no defined CCI.
// =============================================================================

use super::round2;

const LAMBERT: f64 = 0.015;

/// Compute the latest CCI over the trailing `period` bars, rounded to two
/// decimal places.
///
/// Returns `None` when:
/// - `period == 0` or any input is shorter than `period`.
/// - Every typical price in the window is identical, or the mean deviation
///   is indistinguishable from zero.
/// - The result is non-finite.
pub fn calculate_cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    let n = closes.len();
    if period == 0 || n < period || highs.len() != n || lows.len() != n {
        return None;
    }

    let start = n - period;
    let typical: Vec<f64> = (start..n)
        .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
        .collect();

    if typical.iter().all(|&tp| tp == typical[0]) {
        return None;
    }

    let period_f = period as f64;
    let mean_tp = typical.iter().sum::<f64>() / period_f;
    let mean_dev = typical.iter().map(|tp| (tp - mean_tp).abs()).sum::<f64>() / period_f;

    if mean_dev <= f64::EPSILON * mean_tp.abs().max(1.0) {
        return None;
    }

    let last = *typical.last()?;
    let cci = (last - mean_tp) / (LAMBERT * mean_dev);
    cci.is_finite().then(|| round2(cci))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cci_flat_window_unavailable() {
        let v = vec![50.0; 10];
        assert!(calculate_cci(&v, &v, &v, 4).is_none());
    }

    #[test]
    fn cci_flat_typical_price_unavailable() {
        // Different H/L/C but identical typical price on every bar.
        let highs = vec![12.0; 6];
        let lows = vec![8.0; 6];
        let closes = vec![10.0; 6];
        assert!(calculate_cci(&highs, &lows, &closes, 4).is_none());
    }

    #[test]
    fn cci_insufficient_data() {
        let v = vec![1.0, 2.0, 3.0];
        assert!(calculate_cci(&v, &v, &v, 4).is_none());
        assert!(calculate_cci(&v, &v, &v, 0).is_none());
    }

    #[test]
    fn cci_known_value() {
        // TP window [1, 2, 3, 4]: mean 2.5, mean dev 1.0
        // CCI = (4 - 2.5) / (0.015 * 1.0) = 100.
        let v = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(calculate_cci(&v, &v, &v, 4), Some(100.0));
    }

    #[test]
    fn cci_uses_trailing_highs_and_lows() {
        // Early bars have wild ranges that must not leak into the window.
        let highs = vec![1000.0, 1000.0, 1.0, 2.0, 3.0, 4.0];
        let lows = vec![-1000.0, 0.0, 1.0, 2.0, 3.0, 4.0];
        let closes = vec![5.0, 5.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(calculate_cci(&highs, &lows, &closes, 4), Some(100.0));
    }

    #[test]
    fn cci_falling_is_negative() {
        let v: Vec<f64> = (1..=20).rev().map(|x| x as f64).collect();
        assert!(calculate_cci(&v, &v, &v, 20).unwrap() < 0.0);
    }
}
