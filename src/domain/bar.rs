//! Daily OHLC bar and validated bar series.

use crate::domain::error::TiercastError;
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// How a daily series is folded into coarser periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResamplePeriod {
    /// Calendar weeks ending Friday.
    Weekly,
    /// Fixed n-calendar-day blocks anchored to the CE epoch.
    CalendarDays(u32),
}

/// Chronological bar sequence for one instrument.
///
/// Construction rejects out-of-order or duplicate dates so downstream
/// indicator math can assume a clean timeline.
#[derive(Debug, Clone)]
pub struct BarSeries {
    pub symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, TiercastError> {
        let symbol = symbol.into();
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(TiercastError::MalformedSeries {
                    symbol,
                    reason: format!(
                        "dates not strictly increasing: {} then {}",
                        pair[0].date, pair[1].date
                    ),
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Close-to-close change of the most recent bar, as a percentage.
    pub fn last_change_pct(&self) -> Option<f64> {
        let n = self.bars.len();
        if n < 2 {
            return None;
        }
        let prev = self.bars[n - 2].close;
        if prev <= 0.0 {
            return None;
        }
        Some((self.bars[n - 1].close - prev) / prev * 100.0)
    }

    /// Folds the daily series into coarser bars and keeps only the fully
    /// closed periods.
    ///
    /// Periods are keyed by a fixed calendar anchor, not by the run date,
    /// so recomputing on any day inside the same completed period yields
    /// identical aggregated bars. The in-progress period (end date after
    /// the last daily bar) is dropped.
    pub fn resample(&self, period: ResamplePeriod) -> BarSeries {
        let Some(as_of) = self.bars.last().map(|b| b.date) else {
            return BarSeries {
                symbol: self.symbol.clone(),
                bars: vec![],
            };
        };

        let mut groups: Vec<(NaiveDate, Bar)> = Vec::new();
        for bar in &self.bars {
            let key = period_end(bar.date, period);
            match groups.last_mut() {
                Some((end, agg)) if *end == key => {
                    agg.high = agg.high.max(bar.high);
                    agg.low = agg.low.min(bar.low);
                    agg.close = bar.close;
                    agg.volume += bar.volume;
                }
                _ => {
                    let mut agg = bar.clone();
                    agg.date = key;
                    groups.push((key, agg));
                }
            }
        }

        let bars = groups
            .into_iter()
            .filter(|(end, _)| *end <= as_of)
            .map(|(_, bar)| bar)
            .collect();

        BarSeries {
            symbol: self.symbol.clone(),
            bars,
        }
    }
}

/// Calendar end date of the period containing `date`.
fn period_end(date: NaiveDate, period: ResamplePeriod) -> NaiveDate {
    match period {
        ResamplePeriod::Weekly => {
            // Weeks run Saturday through Friday.
            let dow = date.weekday().num_days_from_monday(); // Mon=0 .. Sun=6
            let to_friday = (4 + 7 - dow) % 7;
            date + chrono::Duration::days(to_friday as i64)
        }
        ResamplePeriod::CalendarDays(n) => {
            let n = n.max(1) as i32;
            let days = date.num_days_from_ce();
            let block = days.div_euclid(n);
            NaiveDate::from_num_days_from_ce_opt((block + 1) * n - 1)
                .unwrap_or(date)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn true_range_gap_up() {
        let b = bar("2024-01-15", 100.0, 110.0, 90.0, 105.0);
        // high-low=20, |110-70|=40, |90-70|=20
        assert!((b.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let bars = vec![
            bar("2024-01-02", 1.0, 1.0, 1.0, 1.0),
            bar("2024-01-02", 1.0, 1.0, 1.0, 1.0),
        ];
        let err = BarSeries::new("X", bars).unwrap_err();
        assert!(matches!(err, TiercastError::MalformedSeries { .. }));
    }

    #[test]
    fn series_rejects_out_of_order() {
        let bars = vec![
            bar("2024-01-03", 1.0, 1.0, 1.0, 1.0),
            bar("2024-01-02", 1.0, 1.0, 1.0, 1.0),
        ];
        assert!(BarSeries::new("X", bars).is_err());
    }

    #[test]
    fn last_change_pct() {
        let series = BarSeries::new(
            "X",
            vec![
                bar("2024-01-02", 100.0, 100.0, 100.0, 100.0),
                bar("2024-01-03", 100.0, 100.0, 100.0, 92.0),
            ],
        )
        .unwrap();
        assert!((series.last_change_pct().unwrap() + 8.0).abs() < 1e-10);
    }

    #[test]
    fn weekly_resample_aggregates_one_week() {
        // 2024-01-08 is a Monday; week ends Friday 2024-01-12.
        let series = BarSeries::new(
            "X",
            vec![
                bar("2024-01-08", 10.0, 12.0, 9.0, 11.0),
                bar("2024-01-09", 11.0, 15.0, 10.0, 14.0),
                bar("2024-01-10", 14.0, 14.5, 8.0, 9.0),
                bar("2024-01-11", 9.0, 10.0, 8.5, 9.5),
                bar("2024-01-12", 9.5, 11.0, 9.0, 10.5),
            ],
        )
        .unwrap();

        let weekly = series.resample(ResamplePeriod::Weekly);
        assert_eq!(weekly.len(), 1);
        let w = &weekly.bars()[0];
        assert_eq!(w.date, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
        assert_eq!(w.open, 10.0);
        assert_eq!(w.high, 15.0);
        assert_eq!(w.low, 8.0);
        assert_eq!(w.close, 10.5);
        assert_eq!(w.volume, 5000.0);
    }

    #[test]
    fn weekly_resample_drops_in_progress_week() {
        // Full week Jan 8-12, then Monday Jan 15 of the next week.
        let series = BarSeries::new(
            "X",
            vec![
                bar("2024-01-08", 10.0, 12.0, 9.0, 11.0),
                bar("2024-01-12", 9.5, 11.0, 9.0, 10.5),
                bar("2024-01-15", 10.5, 12.0, 10.0, 11.5),
            ],
        )
        .unwrap();

        let weekly = series.resample(ResamplePeriod::Weekly);
        assert_eq!(weekly.len(), 1);
        assert_eq!(
            weekly.bars()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 12).unwrap()
        );
    }

    #[test]
    fn weekly_resample_deterministic_across_run_days() {
        // Same completed week, runs on Wednesday vs Friday of the next
        // week must agree on the closed bars.
        let closed_week = vec![
            bar("2024-01-08", 10.0, 12.0, 9.0, 11.0),
            bar("2024-01-10", 11.0, 13.0, 10.0, 12.0),
            bar("2024-01-12", 12.0, 12.5, 11.0, 12.2),
        ];

        let mut run_wed = closed_week.clone();
        run_wed.push(bar("2024-01-15", 12.0, 12.6, 11.8, 12.4));
        run_wed.push(bar("2024-01-17", 12.4, 12.8, 12.0, 12.6));

        let mut run_fri = closed_week.clone();
        run_fri.push(bar("2024-01-15", 12.0, 12.6, 11.8, 12.4));
        run_fri.push(bar("2024-01-17", 12.4, 12.8, 12.0, 12.6));
        run_fri.push(bar("2024-01-19", 12.6, 13.0, 12.3, 12.9));

        let closed_wed = BarSeries::new("X", run_wed)
            .unwrap()
            .resample(ResamplePeriod::Weekly);
        let closed_fri = BarSeries::new("X", run_fri)
            .unwrap()
            .resample(ResamplePeriod::Weekly);

        // Wednesday run sees only the closed first week; Friday run also
        // closes the second week, but the first week's bar is identical.
        assert_eq!(closed_wed.bars()[0], closed_fri.bars()[0]);
    }

    #[test]
    fn calendar_day_resample_blocks_of_three() {
        let series = BarSeries::new(
            "X",
            vec![
                bar("2024-01-01", 1.0, 2.0, 0.5, 1.5),
                bar("2024-01-02", 1.5, 3.0, 1.0, 2.5),
                bar("2024-01-03", 2.5, 2.6, 2.0, 2.2),
                bar("2024-01-04", 2.2, 2.4, 2.1, 2.3),
            ],
        )
        .unwrap();

        let blocks = series.resample(ResamplePeriod::CalendarDays(3));
        // Jan 1-2 fall in one epoch-anchored block, Jan 3-5 in the next;
        // the Jan 3-5 block is still open on Jan 4.
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks.bars()[0].high, 3.0);
        assert_eq!(blocks.bars()[0].close, 2.5);
    }

    #[test]
    fn empty_series_resamples_empty() {
        let series = BarSeries::new("X", vec![]).unwrap();
        assert!(series.resample(ResamplePeriod::Weekly).is_empty());
    }
}
