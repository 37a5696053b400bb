//! Crypto fear/greed index adapter (alternative.me).

use crate::adapters::{http_error, HTTP_TIMEOUT};
use crate::domain::error::TiercastError;
use crate::ports::sentiment_port::SentimentIndexPort;
use serde::Deserialize;

const PROVIDER: &str = "fear-greed";

pub struct FearGreedAdapter {
    client: reqwest::blocking::Client,
    url: String,
}

impl FearGreedAdapter {
    pub fn new() -> Result<Self, TiercastError> {
        Self::with_url("https://api.alternative.me/fng/")
    }

    pub fn with_url(url: impl Into<String>) -> Result<Self, TiercastError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| http_error(PROVIDER, e))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FngResponse {
    #[serde(default)]
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    // The API serves the value as a string.
    value: String,
}

impl SentimentIndexPort for FearGreedAdapter {
    fn fetch_index(&self) -> Result<u8, TiercastError> {
        let response: FngResponse = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| http_error(PROVIDER, e))?
            .error_for_status()
            .map_err(|e| http_error(PROVIDER, e))?
            .json()
            .map_err(|e| http_error(PROVIDER, e))?;

        let entry = response.data.first().ok_or_else(|| TiercastError::Provider {
            provider: PROVIDER.into(),
            reason: "empty data array".into(),
        })?;

        entry
            .value
            .parse::<u8>()
            .ok()
            .filter(|v| *v <= 100)
            .ok_or_else(|| TiercastError::Provider {
                provider: PROVIDER.into(),
                reason: format!("value {:?} not in 0-100", entry.value),
            })
    }
}
