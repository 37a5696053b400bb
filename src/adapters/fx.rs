//! FX rate adapter: primary provider with one named fallback.
//!
//! open.er-api.com is tried first; on any failure Frankfurter gets one
//! attempt. Both failing surfaces an error so the pipeline can fall
//! back to the configured default constant.

use crate::adapters::{http_error, HTTP_TIMEOUT};
use crate::domain::analysis::{FxRate, FxSource};
use crate::domain::error::TiercastError;
use crate::ports::fx_port::FxRatePort;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

pub struct FxAdapter {
    client: reqwest::blocking::Client,
    primary_base: String,
    fallback_base: String,
}

impl FxAdapter {
    pub fn new() -> Result<Self, TiercastError> {
        Self::with_base_urls("https://open.er-api.com", "https://api.frankfurter.app")
    }

    pub fn with_base_urls(
        primary_base: impl Into<String>,
        fallback_base: impl Into<String>,
    ) -> Result<Self, TiercastError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| http_error("fx", e))?;
        Ok(Self {
            client,
            primary_base: primary_base.into(),
            fallback_base: fallback_base.into(),
        })
    }

    fn fetch_primary(&self, base: &str, quote: &str) -> Result<f64, TiercastError> {
        let url = format!("{}/v6/latest/{base}", self.primary_base);
        let response: ErApiResponse = self
            .client
            .get(&url)
            .send()
            .map_err(|e| http_error("fx-primary", e))?
            .error_for_status()
            .map_err(|e| http_error("fx-primary", e))?
            .json()
            .map_err(|e| http_error("fx-primary", e))?;
        rate_from_table(&response.rates, quote, "fx-primary")
    }

    fn fetch_fallback(&self, base: &str, quote: &str) -> Result<f64, TiercastError> {
        let url = format!("{}/latest?from={base}&to={quote}", self.fallback_base);
        let response: FrankfurterResponse = self
            .client
            .get(&url)
            .send()
            .map_err(|e| http_error("fx-fallback", e))?
            .error_for_status()
            .map_err(|e| http_error("fx-fallback", e))?
            .json()
            .map_err(|e| http_error("fx-fallback", e))?;
        rate_from_table(&response.rates, quote, "fx-fallback")
    }
}

fn rate_from_table(
    rates: &HashMap<String, f64>,
    quote: &str,
    provider: &str,
) -> Result<f64, TiercastError> {
    rates
        .get(quote)
        .copied()
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| TiercastError::Provider {
            provider: provider.to_string(),
            reason: format!("no usable rate for {quote}"),
        })
}

impl FxRatePort for FxAdapter {
    fn fetch_rate(&self, base: &str, quote: &str) -> Result<FxRate, TiercastError> {
        let pair = format!("{base}/{quote}");
        match self.fetch_primary(base, quote) {
            Ok(value) => Ok(FxRate {
                pair,
                value,
                source: FxSource::Primary,
            }),
            Err(primary_err) => {
                warn!("primary FX provider failed: {primary_err}");
                let value = self.fetch_fallback(base, quote)?;
                Ok(FxRate {
                    pair,
                    value,
                    source: FxSource::Fallback,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErApiResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_payload_shapes() {
        let primary: ErApiResponse = serde_json::from_str(
            r#"{"result":"success","base_code":"USD","rates":{"TWD":32.41,"JPY":157.2}}"#,
        )
        .unwrap();
        assert_eq!(rate_from_table(&primary.rates, "TWD", "fx-primary").unwrap(), 32.41);

        let fallback: FrankfurterResponse =
            serde_json::from_str(r#"{"base":"USD","rates":{"TWD":32.38}}"#).unwrap();
        assert_eq!(
            rate_from_table(&fallback.rates, "TWD", "fx-fallback").unwrap(),
            32.38
        );
    }

    #[test]
    fn missing_or_degenerate_rate_is_an_error() {
        let mut rates = HashMap::new();
        rates.insert("TWD".to_string(), 0.0);
        assert!(rate_from_table(&rates, "TWD", "fx-primary").is_err());
        assert!(rate_from_table(&rates, "EUR", "fx-primary").is_err());
    }
}
