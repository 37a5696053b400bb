//! Engine error taxonomy.
//!
//! Every variant is recovered at the instrument boundary during a batch
//! run; nothing here aborts the process. The `ExitCode` mapping is only
//! used by the CLI for failures before the batch starts (bad config,
//! unreadable snapshot path).

/// Top-level error type for tiercast.
#[derive(Debug, thiserror::Error)]
pub enum TiercastError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    /// The provider returned an empty bar series.
    #[error("no data for {symbol}")]
    NoData { symbol: String },

    /// The series exists but is too short for the minimum indicator window.
    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    /// Malformed series from a provider (out-of-order or duplicate dates).
    #[error("malformed series for {symbol}: {reason}")]
    MalformedSeries { symbol: String, reason: String },

    /// An external call exceeded its deadline.
    #[error("{provider} timed out")]
    ProviderTimeout { provider: String },

    /// Any other external call failure (HTTP status, decode, transport).
    #[error("{provider} request failed: {reason}")]
    Provider { provider: String, reason: String },

    /// A computation produced a non-finite value that has no documented
    /// fallback at the point it was detected.
    #[error("non-finite value in {context}")]
    Arithmetic { context: String },

    #[error("snapshot error: {reason}")]
    Snapshot { reason: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TiercastError {
    /// True for the variants a batch run absorbs per instrument rather
    /// than propagating.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TiercastError::NoData { .. }
                | TiercastError::InsufficientData { .. }
                | TiercastError::MalformedSeries { .. }
                | TiercastError::ProviderTimeout { .. }
                | TiercastError::Provider { .. }
                | TiercastError::Arithmetic { .. }
        )
    }
}

impl From<&TiercastError> for std::process::ExitCode {
    fn from(err: &TiercastError) -> Self {
        let code: u8 = match err {
            TiercastError::Io(_) | TiercastError::Json(_) => 1,
            TiercastError::ConfigParse { .. }
            | TiercastError::ConfigMissing { .. }
            | TiercastError::ConfigInvalid { .. } => 2,
            TiercastError::Snapshot { .. } => 3,
            TiercastError::ProviderTimeout { .. } | TiercastError::Provider { .. } => 4,
            TiercastError::NoData { .. }
            | TiercastError::InsufficientData { .. }
            | TiercastError::MalformedSeries { .. }
            | TiercastError::Arithmetic { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
