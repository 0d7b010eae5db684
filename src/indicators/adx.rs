// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// Trend strength, regardless of direction:
//
//   +DM / -DM  directional movement between consecutive bars
//   TR         true range
//   +DI, -DI   Wilder-smoothed DM over Wilder-smoothed TR, times 100
//   DX         |+DI - -DI| / (+DI + -DI) * 100
//   ADX        Wilder average of DX, seeded with the mean of the first
//              `period` DX values
// =============================================================================

/// Raw directional movement and true range for one bar-to-bar transition.
struct Movement {
    plus_dm: f64,
    minus_dm: f64,
    tr: f64,
}

fn movement(high: f64, low: f64, prev_high: f64, prev_low: f64, prev_close: f64) -> Movement {
    let up = high - prev_high;
    let down = prev_low - low;
    Movement {
        plus_dm: if up > down && up > 0.0 { up } else { 0.0 },
        minus_dm: if down > up && down > 0.0 { down } else { 0.0 },
        tr: (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs()),
    }
}

/// Latest ADX from parallel high/low/close slices.
///
/// Needs `2 * period + 1` bars: one bar without a predecessor, `period`
/// transitions to seed the smoothed sums and `period` DX values to seed the
/// average.  Returns `None` when there are fewer, when `period` is zero or
/// the slices differ in length, when the latest smoothed true range is zero,
/// or on a non-finite result.  Transitions with zero smoothed range earlier
/// in the window count as DX 0.
pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    let n = closes.len();
    if period == 0 || highs.len() != n || lows.len() != n || n < 2 * period + 1 {
        return None;
    }

    let moves: Vec<Movement> = (1..n)
        .map(|i| movement(highs[i], lows[i], highs[i - 1], lows[i - 1], closes[i - 1]))
        .collect();

    let p = period as f64;
    let (seed, rest) = moves.split_at(period);

    let mut plus = seed.iter().map(|m| m.plus_dm).sum::<f64>();
    let mut minus = seed.iter().map(|m| m.minus_dm).sum::<f64>();
    let mut tr = seed.iter().map(|m| m.tr).sum::<f64>();

    let mut dx_values = Vec::with_capacity(rest.len() + 1);
    dx_values.push(compute_dx(plus, minus, tr));

    for m in rest {
        plus = plus - plus / p + m.plus_dm;
        minus = minus - minus / p + m.minus_dm;
        tr = tr - tr / p + m.tr;
        dx_values.push(compute_dx(plus, minus, tr));
    }

    if tr == 0.0 {
        return None;
    }

    let (dx_seed, dx_rest) = dx_values.split_at(period);
    let mut adx = dx_seed.iter().sum::<f64>() / p;
    for &dx in dx_rest {
        adx = (adx * (p - 1.0) + dx) / p;
    }

    adx.is_finite().then_some(adx)
}

/// DX from smoothed +DM, -DM and TR.  Zero when there is no range or no
/// directional movement.
fn compute_dx(plus_dm: f64, minus_dm: f64, tr: f64) -> f64 {
    if tr == 0.0 {
        return 0.0;
    }

    let plus_di = plus_dm / tr * 100.0;
    let minus_di = minus_dm / tr * 100.0;
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return 0.0;
    }

    (plus_di - minus_di).abs() / di_sum * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Split (high, low, close) triples into the parallel slices ADX takes.
    fn split(bars: &[(f64, f64, f64)]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            bars.iter().map(|b| b.0).collect(),
            bars.iter().map(|b| b.1).collect(),
            bars.iter().map(|b| b.2).collect(),
        )
    }

    #[test]
    fn adx_period_zero() {
        let (h, l, c) = split(&vec![(2.0, 0.5, 1.5); 50]);
        assert!(calculate_adx(&h, &l, &c, 0).is_none());
    }

    #[test]
    fn adx_mismatched_lengths() {
        let (h, l, c) = split(&vec![(2.0, 0.5, 1.5); 50]);
        assert!(calculate_adx(&h[..49], &l, &c, 14).is_none());
    }

    #[test]
    fn adx_insufficient_data() {
        let (h, l, c) = split(&vec![(2.0, 0.5, 1.5); 10]);
        assert!(calculate_adx(&h, &l, &c, 14).is_none());
    }

    #[test]
    fn adx_strong_uptrend() {
        let bars: Vec<_> = (0..60)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                (base + 1.5, base - 0.5, base + 1.0)
            })
            .collect();
        let (h, l, c) = split(&bars);

        let value = calculate_adx(&h, &l, &c, 14).unwrap();
        assert!(value > 25.0, "expected ADX > 25 for strong trend, got {value}");
    }

    #[test]
    fn adx_flat_market() {
        let (h, l, c) = split(&vec![(101.0, 99.0, 100.0); 60]);
        let value = calculate_adx(&h, &l, &c, 14).unwrap();
        assert!(value < 1.0, "expected ADX near 0 for flat market, got {value}");
    }

    #[test]
    fn adx_zero_range_unavailable() {
        let v = vec![100.0; 60];
        assert!(calculate_adx(&v, &v, &v, 14).is_none());
    }

    #[test]
    fn adx_recovers_after_flat_prefix() {
        let mut bars = vec![(100.0, 100.0, 100.0); 15];
        bars.extend((1..=85).map(|i| {
            let base = 100.0 + i as f64 * 2.0;
            (base + 1.0, base - 1.0, base)
        }));
        let (h, l, c) = split(&bars);

        let value = calculate_adx(&h, &l, &c, 14).expect("trend after a flat stretch");
        assert!(value > 25.0, "expected ADX > 25 once trending, got {value}");
        assert!(value <= 100.0);
    }

    #[test]
    fn adx_result_range() {
        let bars: Vec<_> = (0..100)
            .map(|i| {
                let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
                (base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        let (h, l, c) = split(&bars);
        let value = calculate_adx(&h, &l, &c, 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "ADX {value} out of [0,100] range");
    }

    #[test]
    fn adx_minimum_bars_exact() {
        let period = 5;
        let min = 2 * period + 1;
        let bars: Vec<_> = (0..min)
            .map(|i| {
                let base = 100.0 + i as f64;
                (base + 1.0, base - 0.5, base + 0.5)
            })
            .collect();
        let (h, l, c) = split(&bars);
        assert!(calculate_adx(&h, &l, &c, period).is_some());
        assert!(calculate_adx(&h[..min - 1], &l[..min - 1], &c[..min - 1], period).is_none());
    }
}
