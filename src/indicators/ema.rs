// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The series is seeded with the very first data point, so the output has one
// value per input value.
// =============================================================================

/// Compute the EMA series for `values` with look-back `period`.
///
/// Returns an empty `Vec` when the input is empty or the period is zero.
/// Production stops at the first non-finite value.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.is_empty() {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let mut result = Vec::with_capacity(values.len());
    let mut prev_ema = values[0];
    if !prev_ema.is_finite() {
        return result;
    }
    result.push(prev_ema);

    for &value in &values[1..] {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}
