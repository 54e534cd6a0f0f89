//! Windowed primitives over daily series.
//!
//! Two building blocks carry every temporal computation in the pipeline:
//! - a trailing fixed-size window producing one aggregate per row
//! - a fixed-offset lookup (`shift`) backward or forward in row positions
//!
//! Missing values are `f64::NAN`. A window containing any NaN, or not yet
//! full, yields NaN. Offsets and windows count rows, never calendar days.

/// Aggregate each trailing window of `window` rows.
///
/// `out[i] = f(&values[i + 1 - window..=i])` once `i + 1 >= window` and the
/// slice has no NaN; NaN otherwise.
pub fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    assert!(window >= 1, "rolling window must be >= 1");
    let mut out = vec![f64::NAN; values.len()];
    for end in window..=values.len() {
        let slice = &values[end - window..end];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[end - 1] = f(slice);
    }
    out
}

/// Aggregate each trailing window of two equal-length series in lockstep.
pub fn rolling_pair<F>(a: &[f64], b: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    assert!(window >= 1, "rolling window must be >= 1");
    assert_eq!(a.len(), b.len(), "rolling_pair series must have equal length");
    let mut out = vec![f64::NAN; a.len()];
    for end in window..=a.len() {
        let (wa, wb) = (&a[end - window..end], &b[end - window..end]);
        if wa.iter().chain(wb).any(|v| v.is_nan()) {
            continue;
        }
        out[end - 1] = f(wa, wb);
    }
    out
}

/// Trailing simple moving average.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, mean)
}

/// Trailing Pearson correlation. NaN where either window has no variance.
pub fn rolling_corr(a: &[f64], b: &[f64], window: usize) -> Vec<f64> {
    rolling_pair(a, b, window, pearson)
}

/// Value `offset` rows away: positive offsets look back, negative look ahead.
///
/// `shift(v, 1)[i] == v[i - 1]`, `shift(v, -h)[i] == v[i + h]`; NaN outside
/// the series.
pub fn shift(values: &[f64], offset: isize) -> Vec<f64> {
    let n = values.len() as isize;
    (0..n)
        .map(|i| {
            let src = i - offset;
            if (0..n).contains(&src) {
                values[src as usize]
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Fractional change over `lag` rows: `(v[i] - v[i-lag]) / v[i-lag]`.
///
/// NaN for the first `lag` rows and wherever the base is NaN or zero.
pub fn pct_change(values: &[f64], lag: usize) -> Vec<f64> {
    let prev = shift(values, lag as isize);
    values
        .iter()
        .zip(&prev)
        .map(|(&cur, &base)| {
            if base == 0.0 || base.is_nan() || cur.is_nan() {
                f64::NAN
            } else {
                (cur - base) / base
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

const MIN_VARIANCE: f64 = 1e-30;

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b) {
        let (dx, dy) = (x - ma, y - mb);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }
    if var_a <= MIN_VARIANCE || var_b <= MIN_VARIANCE {
        return f64::NAN;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "actual={actual}, expected={expected}"
        );
    }

    #[test]
    fn rolling_mean_warms_up() {
        let out = rolling_mean(&[10.0, 11.0, 12.0, 13.0, 14.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_approx(out[2], 11.0);
        assert_approx(out[3], 12.0);
        assert_approx(out[4], 13.0);
    }

    #[test]
    fn rolling_propagates_nan_for_whole_window() {
        let out = rolling_mean(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert_approx(out[3], 3.5);
    }

    #[test]
    fn rolling_window_longer_than_series() {
        assert!(rolling_mean(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn window_of_one_is_identity() {
        assert_eq!(rolling_mean(&[3.0, 4.0], 1), vec![3.0, 4.0]);
    }

    #[test]
    fn shift_back_and_forward() {
        let v = [1.0, 2.0, 3.0, 4.0];
        let back = shift(&v, 1);
        assert!(back[0].is_nan());
        assert_eq!(&back[1..], &[1.0, 2.0, 3.0]);

        let ahead = shift(&v, -2);
        assert_eq!(&ahead[..2], &[3.0, 4.0]);
        assert!(ahead[2].is_nan() && ahead[3].is_nan());

        assert_eq!(shift(&v, 0), v.to_vec());
        assert!(shift(&v, 10).iter().all(|x| x.is_nan()));
    }

    #[test]
    fn pct_change_matches_definition() {
        let out = pct_change(&[100.0, 110.0, 121.0], 1);
        assert!(out[0].is_nan());
        assert_approx(out[1], 0.1);
        assert_approx(out[2], 0.1);

        let out = pct_change(&[100.0, 110.0, 121.0], 2);
        assert_approx(out[2], 0.21);
    }

    #[test]
    fn pct_change_zero_base_is_missing() {
        let out = pct_change(&[0.0, 1.0], 1);
        assert!(out[1].is_nan());
    }

    #[test]
    fn correlation_of_linear_series() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up: Vec<f64> = a.iter().map(|x| 2.0 * x + 1.0).collect();
        let down: Vec<f64> = a.iter().map(|x| -x).collect();
        assert_approx(rolling_corr(&a, &up, 5)[4], 1.0);
        assert_approx(rolling_corr(&a, &down, 5)[4], -1.0);
    }

    #[test]
    fn correlation_undefined_for_flat_window() {
        let a = [1.0, 2.0, 3.0];
        let flat = [5.0, 5.0, 5.0];
        assert!(rolling_corr(&a, &flat, 3)[2].is_nan());
    }

    #[test]
    fn rolling_never_reads_ahead() {
        let full: Vec<f64> = (0..50).map(|i| ((i * 7) % 13) as f64).collect();
        let truncated = &full[..30];
        let a = rolling_mean(&full, 10);
        let b = rolling_mean(truncated, 10);
        for i in 0..30 {
            assert!(a[i] == b[i] || (a[i].is_nan() && b[i].is_nan()));
        }
    }
}
