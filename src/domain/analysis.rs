//! Per-instrument analysis pipeline and the batch aggregate.

use crate::domain::anomaly::{self, AnomalyFlag, AnomalyThresholds};
use crate::domain::bar::BarSeries;
use crate::domain::error::TiercastError;
use crate::domain::indicator::{IndicatorParams, IndicatorSet};
use crate::domain::ladder::{self, Ladder, LadderInputs, PriceTier};
use crate::domain::regime::{self, Regime};
use crate::domain::sentiment::{SentimentScore, SentimentSource};
use crate::domain::tick::TickRule;
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentClass {
    Equity,
    Crypto,
}

impl InstrumentClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "equity" | "stock" => Some(InstrumentClass::Equity),
            "crypto" => Some(InstrumentClass::Crypto),
            _ => None,
        }
    }
}

impl fmt::Display for InstrumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentClass::Equity => write!(f, "equity"),
            InstrumentClass::Crypto => write!(f, "crypto"),
        }
    }
}

/// Static description of one configured instrument.
#[derive(Debug, Clone)]
pub struct InstrumentSpec {
    /// Display name, also the snapshot key.
    pub name: String,
    /// Provider ticker symbol.
    pub symbol: String,
    pub class: InstrumentClass,
    pub tick: TickRule,
    /// Exchange daily move limit in percent, where one applies.
    pub daily_limit_pct: Option<f64>,
}

/// Everything computed for one instrument in one run.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub spec: InstrumentSpec,
    pub as_of: NaiveDate,
    pub current: f64,
    pub regime: Regime,
    pub ladder: Ladder,
    pub sentiment: SentimentScore,
    pub anomaly: Option<AnomalyFlag>,
    /// Oversold hysteresis latch to carry into the next run.
    pub oversold: bool,
}

impl AnalysisResult {
    pub fn best_tier(&self) -> &PriceTier {
        &self.ladder.tiers[self.ladder.best_pick]
    }

    pub fn current_str(&self) -> String {
        self.spec.tick.format(self.current)
    }

    pub fn best_price_str(&self) -> String {
        self.spec.tick.format(self.best_tier().price)
    }
}

/// One run's worth of results plus batch-level context.
#[derive(Debug, Clone)]
pub struct Batch {
    pub results: Vec<AnalysisResult>,
    pub fx: FxRate,
    pub generated_at: DateTime<Utc>,
}

impl Batch {
    pub fn has_anomaly(&self) -> bool {
        self.results.iter().any(|r| r.anomaly.is_some())
    }
}

/// Spot FX rate with provenance, so the report can say when the
/// hardcoded default had to stand in.
#[derive(Debug, Clone)]
pub struct FxRate {
    pub pair: String,
    pub value: f64,
    pub source: FxSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FxSource {
    Primary,
    Fallback,
    Default,
}

impl fmt::Display for FxSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FxSource::Primary => write!(f, "live"),
            FxSource::Fallback => write!(f, "fallback"),
            FxSource::Default => write!(f, "default"),
        }
    }
}

/// Runs the full per-instrument pipeline: indicators, regime, anomaly,
/// ladder, sentiment.
///
/// `external_sentiment` is the batch-level fear/greed reading (crypto
/// instruments only); `was_oversold` is the hysteresis latch persisted
/// from the previous run.
pub fn analyze_instrument(
    spec: &InstrumentSpec,
    series: &BarSeries,
    params: &IndicatorParams,
    external_sentiment: Option<u8>,
    was_oversold: bool,
) -> Result<AnalysisResult, TiercastError> {
    if series.is_empty() {
        return Err(TiercastError::NoData {
            symbol: spec.symbol.clone(),
        });
    }

    let indicators = IndicatorSet::compute(series, params)?;
    let current = indicators.close;
    if !current.is_finite() || current <= 0.0 {
        return Err(TiercastError::Arithmetic {
            context: format!("current price for {}", spec.symbol),
        });
    }

    let reference = indicators
        .regime_reference()
        .ok_or_else(|| TiercastError::Arithmetic {
            context: format!("regime reference for {}", spec.symbol),
        })?;
    let regime = regime::classify(current, reference);

    let thresholds = match spec.class {
        InstrumentClass::Equity => AnomalyThresholds::equity(),
        InstrumentClass::Crypto => AnomalyThresholds::crypto(),
    };
    let (anomaly, oversold) = anomaly::detect(
        series.last_change_pct(),
        indicators.rsi,
        was_oversold,
        &thresholds,
    );

    let ladder = ladder::build(&LadderInputs {
        current,
        regime,
        indicators: &indicators,
        class: spec.class,
        tick: spec.tick,
        daily_limit_pct: spec.daily_limit_pct,
        as_of: indicators.as_of,
    });
    if ladder.tiers.is_empty() {
        return Err(TiercastError::Arithmetic {
            context: format!("ladder for {}", spec.symbol),
        });
    }

    let sentiment = match (spec.class, external_sentiment) {
        (InstrumentClass::Crypto, Some(raw)) => {
            SentimentScore::from_raw(raw, SentimentSource::ExternalIndex)
        }
        _ => rsi_sentiment(&indicators, spec)?,
    };

    Ok(AnalysisResult {
        spec: spec.clone(),
        as_of: indicators.as_of,
        current,
        regime,
        ladder,
        sentiment,
        anomaly,
        oversold,
    })
}

fn rsi_sentiment(
    indicators: &IndicatorSet,
    spec: &InstrumentSpec,
) -> Result<SentimentScore, TiercastError> {
    let rsi = indicators.rsi.ok_or_else(|| TiercastError::Arithmetic {
        context: format!("rsi sentiment for {}", spec.symbol),
    })?;
    Ok(SentimentScore::from_raw(
        rsi.round() as u8,
        SentimentSource::Rsi,
    ))
}
