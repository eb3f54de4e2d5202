use micromath::F32Ext;

/// Curvatures smaller than this are treated as flat.
const MIN_CURVATURE: f32 = 1e-10;
/// The number of periods correlated by [low_frequency_refine].
const LOW_FREQUENCY_PERIOD_COUNT: usize = 3;
/// Lags within `period / LOW_FREQUENCY_SEARCH_DIVISOR` of the estimate are searched.
const LOW_FREQUENCY_SEARCH_DIVISOR: usize = 20;
/// The normalized correlation a refined lag must exceed to be used.
pub const MIN_REFINE_CORRELATION: f32 = 0.7;

/// Fits a parabola through the curve values at `tau - 1`, `tau` and `tau + 1`
/// and returns the location of its vertex. `tau` is returned unchanged at the
/// ends of the curve and where the curve is locally flat.
pub fn parabolic_interpolation(curve: &[f32], tau: usize) -> f32 {
    if tau < 1 || tau + 1 >= curve.len() {
        return tau as f32;
    }

    let s0 = curve[tau - 1];
    let s1 = curve[tau];
    let s2 = curve[tau + 1];

    let a = (s0 - 2.0 * s1 + s2) / 2.0;
    if F32Ext::abs(a) < MIN_CURVATURE {
        return tau as f32;
    }
    let b = (s2 - s0) / 2.0;

    tau as f32 - b / (2.0 * a)
}

/// Refines a long period by searching lags within 5% of `period` for the one
/// whose normalized correlation over three periods of `samples` is highest.
/// Returns the frequency of that lag if the correlation exceeds
/// [MIN_REFINE_CORRELATION], otherwise the frequency of `period`. Returns 0 for
/// a zero period.
pub fn low_frequency_refine(
    samples: &[u16],
    dc_offset: f32,
    period: usize,
    sample_rate: f32,
) -> f32 {
    if period == 0 {
        return 0.0;
    }

    let search_range = period / LOW_FREQUENCY_SEARCH_DIVISOR;
    let max_lag = samples.len() / 2;
    // Every tested lag reads `window_length` samples past itself.
    let window_length = (period * LOW_FREQUENCY_PERIOD_COUNT)
        .min(samples.len().saturating_sub(period + search_range));

    let head = &samples[..window_length];
    let head_energy: f32 = head
        .iter()
        .map(|s| {
            let a = *s as f32 - dc_offset;
            a * a
        })
        .sum();

    // The correlation c / sqrt(e_head * e_lag) is compared through the
    // squared, sign preserving score c * |c| / e_lag, as e_head does not
    // depend on the lag.
    let mut best_score: f32 = 0.0;
    let mut best_lag = period;

    for lag in (period - search_range)..=(period + search_range) {
        if lag >= max_lag {
            continue;
        }

        let mut correlation: f32 = 0.0;
        let mut lag_energy: f32 = 0.0;
        for (a, b) in head.iter().zip(samples[lag..lag + window_length].iter()) {
            let a = *a as f32 - dc_offset;
            let b = *b as f32 - dc_offset;
            correlation += a * b;
            lag_energy += b * b;
        }

        if head_energy > 0.0 && lag_energy > 0.0 {
            let score = correlation * F32Ext::abs(correlation) / lag_energy;
            if score > best_score {
                best_score = score;
                best_lag = lag;
            }
        }
    }

    let min_score = MIN_REFINE_CORRELATION * MIN_REFINE_CORRELATION * head_energy;
    if best_score > min_score {
        sample_rate / best_lag as f32
    } else {
        sample_rate / period as f32
    }
}
