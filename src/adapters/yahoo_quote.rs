//! Yahoo Finance chart API quote adapter.
//!
//! One GET per instrument against the v8 chart endpoint, daily interval.
//! Rows with null fields (halted sessions, partial data) are skipped.

use crate::adapters::{http_error, HTTP_TIMEOUT};
use crate::domain::bar::Bar;
use crate::domain::error::TiercastError;
use crate::ports::quote_port::QuotePort;
use chrono::DateTime;
use serde::Deserialize;

const PROVIDER: &str = "yahoo";

pub struct YahooQuoteAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooQuoteAdapter {
    pub fn new() -> Result<Self, TiercastError> {
        Self::with_base_url("https://query1.finance.yahoo.com")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, TiercastError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            // The chart endpoint rejects the default client UA.
            .user_agent("Mozilla/5.0 (compatible; tiercast/0.1)")
            .build()
            .map_err(|e| http_error(PROVIDER, e))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn range_for(lookback_days: u32) -> &'static str {
        match lookback_days {
            0..=35 => "1mo",
            36..=100 => "3mo",
            101..=190 => "6mo",
            191..=370 => "1y",
            _ => "2y",
        }
    }
}

impl QuotePort for YahooQuoteAdapter {
    fn fetch_daily(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>, TiercastError> {
        let url = format!(
            "{}/v8/finance/chart/{symbol}?range={}&interval=1d",
            self.base_url,
            Self::range_for(lookback_days),
        );

        let response: ChartResponse = self
            .client
            .get(&url)
            .send()
            .map_err(|e| http_error(PROVIDER, e))?
            .error_for_status()
            .map_err(|e| http_error(PROVIDER, e))?
            .json()
            .map_err(|e| http_error(PROVIDER, e))?;

        let Some(result) = response.chart.result.into_iter().flatten().next() else {
            return Ok(vec![]);
        };
        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Ok(vec![]);
        };

        let mut bars = Vec::with_capacity(result.timestamp.len());
        for (i, &ts) in result.timestamp.iter().enumerate() {
            let row = (
                quote.open.get(i).copied().flatten(),
                quote.high.get(i).copied().flatten(),
                quote.low.get(i).copied().flatten(),
                quote.close.get(i).copied().flatten(),
            );
            let (Some(open), Some(high), Some(low), Some(close)) = row else {
                continue;
            };
            let Some(date) = DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()) else {
                continue;
            };
            bars.push(Bar {
                date,
                open,
                high,
                low,
                close,
                volume: quote
                    .volume
                    .get(i)
                    .copied()
                    .flatten()
                    .unwrap_or(0.0),
            });
        }
        Ok(bars)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}
