//! Deterministic pre-fit smoothing

/// Trailing rolling mean; the window is clamped at the series head so the
/// output has the same length as the input. Same input always yields the
/// same output.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.is_empty() {
        return values.to_vec();
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        let n = (i + 1).min(window);
        out.push(sum / n as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_mean_clamps_head() {
        let values = [2.0, 4.0, 6.0, 8.0];
        let smoothed = rolling_mean(&values, 2);
        assert_eq!(smoothed, vec![2.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [1.0, 5.0, 2.0];
        assert_eq!(rolling_mean(&values, 1), values.to_vec());
    }

    #[test]
    fn test_deterministic() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.7).sin()).collect();
        assert_eq!(rolling_mean(&values, 7), rolling_mean(&values, 7));
    }
}
