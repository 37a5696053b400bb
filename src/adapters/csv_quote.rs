//! CSV-backed quote adapter for offline runs and fixtures.
//!
//! Expects one `<SYMBOL>.csv` per instrument in the data directory with
//! a `date,open,high,low,close,volume` header, dates as `YYYY-MM-DD`.

use crate::domain::bar::Bar;
use crate::domain::error::TiercastError;
use crate::ports::quote_port::QuotePort;
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub struct CsvQuoteAdapter {
    data_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvBar {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl CsvQuoteAdapter {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }
}

impl QuotePort for CsvQuoteAdapter {
    fn fetch_daily(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>, TiercastError> {
        let path = self.data_dir.join(format!("{symbol}.csv"));
        if !path.exists() {
            return Err(TiercastError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| TiercastError::Provider {
            provider: "csv".into(),
            reason: e.to_string(),
        })?;

        let mut bars = Vec::new();
        for record in reader.deserialize::<CsvBar>() {
            let record = record.map_err(|e| TiercastError::Provider {
                provider: "csv".into(),
                reason: e.to_string(),
            })?;
            let date = NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").map_err(|e| {
                TiercastError::Provider {
                    provider: "csv".into(),
                    reason: format!("bad date {:?}: {e}", record.date),
                }
            })?;
            bars.push(Bar {
                date,
                open: record.open,
                high: record.high,
                low: record.low,
                close: record.close,
                volume: record.volume,
            });
        }

        if let Some(last) = bars.last().map(|b| b.date) {
            let cutoff = last - Duration::days(lookback_days as i64);
            bars.retain(|b| b.date >= cutoff);
        }
        Ok(bars)
    }
}
