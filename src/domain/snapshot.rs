//! Persisted batch snapshot.
//!
//! Written with stable field names so an external dashboard or widget
//! can consume the file without coordinating releases with this crate.
//! Read once at batch start (change detection + oversold latches),
//! fully rewritten at batch end whether or not a message was sent.

use crate::domain::analysis::Batch;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// UTC, `YYYY-MM-DD HH:MM`.
    pub updated_at: String,
    /// Date after which the figures should be considered stale.
    pub valid_until: String,
    pub fx_pair: String,
    pub fx_rate: f64,
    pub fx_source: String,
    pub global_anomaly: bool,
    /// Keyed by instrument display name.
    pub instruments: BTreeMap<String, InstrumentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstrumentEntry {
    pub price: String,
    pub pick_label: String,
    pub pick_price: String,
    pub sentiment_icon: String,
    pub sentiment_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<String>,
    #[serde(default)]
    pub oversold: bool,
}

impl Snapshot {
    pub fn from_batch(batch: &Batch) -> Self {
        let instruments = batch
            .results
            .iter()
            .map(|r| {
                let entry = InstrumentEntry {
                    price: r.current_str(),
                    pick_label: r.best_tier().label.to_string(),
                    pick_price: r.best_price_str(),
                    sentiment_icon: r.sentiment.band.icon().to_string(),
                    sentiment_text: format!("{} ({})", r.sentiment.band, r.sentiment.raw),
                    anomaly: r.anomaly.map(|a| a.to_string()),
                    oversold: r.oversold,
                };
                (r.spec.name.clone(), entry)
            })
            .collect();

        Snapshot {
            updated_at: batch.generated_at.format("%Y-%m-%d %H:%M").to_string(),
            valid_until: (batch.generated_at + Duration::days(1))
                .format("%Y-%m-%d")
                .to_string(),
            fx_pair: batch.fx.pair.clone(),
            fx_rate: batch.fx.value,
            fx_source: batch.fx.source.to_string(),
            global_anomaly: batch.has_anomaly(),
            instruments,
        }
    }

    /// Previous oversold latch for an instrument; absent entries were
    /// never oversold.
    pub fn was_oversold(&self, name: &str) -> bool {
        self.instruments.get(name).is_some_and(|e| e.oversold)
    }
}
