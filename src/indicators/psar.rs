// =============================================================================
// Parabolic Stop-and-Reverse (PSAR)
// =============================================================================
//
// Wilder's trailing stop.  For each bar after the first:
//
//   SAR_t = SAR_{t-1} + AF * (EP - SAR_{t-1})
//
// where EP is the extreme point of the current trend (highest high in an
// uptrend, lowest low in a downtrend) and AF starts at `step`, grows by
// `step` on every new extreme and is capped at `max`.
//
// In an uptrend the SAR may not rise above the previous two lows; in a
// downtrend it may not fall below the previous two highs.  When price
// penetrates the SAR the trend reverses: SAR jumps to the old EP, EP resets
// to the current bar's extreme and AF resets to `step`.
//
// The initial trend is taken from the midpoint move of the first two bars.
// =============================================================================

/// Compute the PSAR series for the given highs/lows.
///
/// Output element `i` is the stop level for bar `i + 1`, so the series has
/// `len - 1` values.  Returns an empty vec when there are fewer than two bars,
/// the slices differ in length, or the acceleration parameters are not
/// positive.
pub fn calculate_psar(highs: &[f64], lows: &[f64], step: f64, max: f64) -> Vec<f64> {
    let n = highs.len();
    if n < 2 || lows.len() != n || step.is_nan() || step <= 0.0 || max.is_nan() || max <= 0.0 {
        return Vec::new();
    }
    let max = max.max(step);

    let mut long = (highs[1] + lows[1]) >= (highs[0] + lows[0]);
    let mut sar = if long { lows[0] } else { highs[0] };
    let mut ep = if long {
        highs[0].max(highs[1])
    } else {
        lows[0].min(lows[1])
    };
    let mut af = step;

    let mut result = Vec::with_capacity(n - 1);

    // Bar 1 may already penetrate the seed stop.
    if long && lows[1] < sar {
        long = false;
        sar = ep;
        ep = lows[1];
    } else if !long && highs[1] > sar {
        long = true;
        sar = ep;
        ep = highs[1];
    }
    result.push(sar);

    for i in 2..n {
        sar += af * (ep - sar);

        if long {
            sar = sar.min(lows[i - 1]).min(lows[i - 2]);
            if lows[i] < sar {
                long = false;
                sar = ep;
                ep = lows[i];
                af = step;
            } else if highs[i] > ep {
                ep = highs[i];
                af = (af + step).min(max);
            }
        } else {
            sar = sar.max(highs[i - 1]).max(highs[i - 2]);
            if highs[i] > sar {
                long = true;
                sar = ep;
                ep = highs[i];
                af = step;
            } else if lows[i] < ep {
                ep = lows[i];
                af = (af + step).min(max);
            }
        }

        if !sar.is_finite() {
            break;
        }
        result.push(sar);
    }

    result
}

/// Latest PSAR value, if one can be produced.
pub fn current_psar(highs: &[f64], lows: &[f64], step: f64, max: f64) -> Option<f64> {
    calculate_psar(highs, lows, step, max).last().copied()
}
