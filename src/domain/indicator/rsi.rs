//! RSI (Relative Strength Index) with Wilder smoothing.
//!
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)); avg_loss == 0 ⇒ 100.
//! Warmup: first n positions are `None` (n changes need n+1 closes).

pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.len() < period + 1 {
        return vec![None; closes.len()];
    }

    let mut out = vec![None; closes.len()];

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let mut avg_gain = changes[..period]
        .iter()
        .map(|&c| if c > 0.0 { c } else { 0.0 })
        .sum::<f64>()
        / period as f64;
    let mut avg_loss = changes[..period]
        .iter()
        .map(|&c| if c < 0.0 { -c } else { 0.0 })
        .sum::<f64>()
        / period as f64;

    out[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for (i, &change) in changes.iter().enumerate().skip(period) {
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };
        avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        out[i + 1] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
