//! Concrete port implementations.

pub mod ini_config;
pub mod yahoo_quote;
pub mod csv_quote;
pub mod fear_greed;
pub mod fx;
pub mod telegram;
pub mod json_snapshot;

use crate::domain::error::TiercastError;

/// Default deadline for every external call; none of the providers get
/// retries, so a hung call only costs this much.
pub(crate) const HTTP_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub(crate) fn http_error(provider: &str, err: reqwest::Error) -> TiercastError {
    if err.is_timeout() {
        TiercastError::ProviderTimeout {
            provider: provider.to_string(),
        }
    } else {
        TiercastError::Provider {
            provider: provider.to_string(),
            reason: err.to_string(),
        }
    }
}
