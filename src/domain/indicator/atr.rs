//! ATR (Average True Range): rolling mean of True Range over n periods.
//!
//! TR = max(high - low, |high - prev_close|, |low - prev_close|); the
//! first bar has no previous close so its TR is high - low.
//! Warmup: first (period - 1) positions are `None`.

use crate::domain::bar::Bar;

pub fn atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    if period == 0 || bars.len() < period {
        return vec![None; bars.len()];
    }

    let tr: Vec<f64> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect();

    let mut out = Vec::with_capacity(bars.len());
    let mut running = 0.0;
    for (i, &t) in tr.iter().enumerate() {
        running += t;
        if i >= period {
            running -= tr[i - period];
        }
        if i + 1 >= period {
            out.push(Some(running / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn bar(day: u32, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn warmup_then_valid() {
        let bars: Vec<Bar> = (1..=5).map(|d| bar(d, 110.0, 90.0, 100.0)).collect();
        let out = atr(&bars, 3);
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!(out[2].is_some());
        assert!(out[4].is_some());
    }

    #[test]
    fn constant_range() {
        let bars: Vec<Bar> = (1..=5).map(|d| bar(d, 110.0, 90.0, 100.0)).collect();
        let out = atr(&bars, 3);
        assert_relative_eq!(out[4].unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn gap_inflates_true_range() {
        let bars = vec![
            bar(1, 110.0, 100.0, 105.0),
            // Gap up: |130 - 105| = 25 > high-low = 10.
            bar(2, 130.0, 120.0, 125.0),
        ];
        let out = atr(&bars, 2);
        assert_relative_eq!(out[1].unwrap(), (10.0 + 25.0) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn insufficient_bars() {
        let bars: Vec<Bar> = (1..=2).map(|d| bar(d, 110.0, 90.0, 100.0)).collect();
        assert!(atr(&bars, 5).iter().all(Option::is_none));
    }
}
