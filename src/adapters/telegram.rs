//! Telegram Bot API chat adapter.
//!
//! Credentials come from `TELEGRAM_TOKEN` and `TELEGRAM_CHAT_ID`.
//! Delivery is a single attempt; there is no confirmation or retry.

use crate::adapters::{http_error, HTTP_TIMEOUT};
use crate::domain::error::TiercastError;
use crate::ports::chat_port::ChatPort;
use serde::Serialize;

const PROVIDER: &str = "telegram";

pub struct TelegramAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, TiercastError> {
        Self::with_base_url("https://api.telegram.org", token, chat_id)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Result<Self, TiercastError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| http_error(PROVIDER, e))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    /// Builds the adapter from the environment, or `None` when the
    /// credentials are absent (delivery silently disabled).
    pub fn from_env() -> Result<Option<Self>, TiercastError> {
        let token = std::env::var("TELEGRAM_TOKEN").ok().filter(|v| !v.is_empty());
        let chat_id = std::env::var("TELEGRAM_CHAT_ID").ok().filter(|v| !v.is_empty());
        match (token, chat_id) {
            (Some(token), Some(chat_id)) => Ok(Some(Self::new(token, chat_id)?)),
            _ => Ok(None),
        }
    }
}

impl ChatPort for TelegramAdapter {
    fn send_text(&self, text: &str) -> Result<(), TiercastError> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };

        self.client
            .post(&url)
            .json(&payload)
            .send()
            .map_err(|e| http_error(PROVIDER, e))?
            .error_for_status()
            .map_err(|e| http_error(PROVIDER, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_html_parse_mode() {
        let payload = SendMessage {
            chat_id: "42",
            text: "<b>hello</b>",
            parse_mode: "HTML",
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"parse_mode\":\"HTML\""));
        assert!(json.contains("\"chat_id\":\"42\""));
    }
}
