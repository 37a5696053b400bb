//! Bollinger lower band: SMA(n) - multiplier × population stddev(n).
//!
//! Population standard deviation (divides by N, not N-1), matching the
//! usual charting convention. Warmup: first (window - 1) positions are
//! `None`.

pub fn bollinger_lower(values: &[f64], window: usize, multiplier: f64) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance = slice
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / window as f64;
        out.push(Some(mean - multiplier * variance.sqrt()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn warmup() {
        let out = bollinger_lower(&[10.0, 20.0, 30.0, 40.0], 3, 2.0);
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!(out[2].is_some());
    }

    #[test]
    fn constant_input_band_equals_mean() {
        let out = bollinger_lower(&[100.0; 5], 3, 2.0);
        assert_relative_eq!(out[4].unwrap(), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn known_values() {
        let out = bollinger_lower(&[10.0, 20.0, 30.0], 3, 2.0);
        let mean = 20.0;
        let variance = (100.0 + 0.0 + 100.0) / 3.0;
        let expected = mean - 2.0 * f64::sqrt(variance);
        assert_relative_eq!(out[2].unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn multiplier_scales_distance() {
        let values = [10.0, 20.0, 30.0];
        let one = bollinger_lower(&values, 3, 1.0)[2].unwrap();
        let two = bollinger_lower(&values, 3, 2.0)[2].unwrap();
        assert_relative_eq!(20.0 - two, 2.0 * (20.0 - one), epsilon = 1e-10);
    }
}
