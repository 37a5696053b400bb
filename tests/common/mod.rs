#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use std::cell::RefCell;
use std::collections::HashMap;
use tiercast::domain::analysis::{FxRate, FxSource, InstrumentClass, InstrumentSpec};
use tiercast::domain::bar::Bar;
use tiercast::domain::config_validation::{AppConfig, EngineConfig, FxConfig};
use tiercast::domain::error::TiercastError;
use tiercast::domain::indicator::IndicatorParams;
use tiercast::domain::snapshot::Snapshot;
use tiercast::domain::tick::TickRule;
use tiercast::ports::chat_port::ChatPort;
use tiercast::ports::fx_port::FxRatePort;
use tiercast::ports::quote_port::QuotePort;
use tiercast::ports::sentiment_port::SentimentIndexPort;
use tiercast::ports::snapshot_port::SnapshotPort;

pub struct MockQuotePort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockQuotePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl QuotePort for MockQuotePort {
    fn fetch_daily(&self, symbol: &str, _lookback_days: u32) -> Result<Vec<Bar>, TiercastError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TiercastError::Provider {
                provider: "mock".into(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub struct MockSentimentPort {
    pub value: Option<u8>,
}

impl SentimentIndexPort for MockSentimentPort {
    fn fetch_index(&self) -> Result<u8, TiercastError> {
        self.value.ok_or_else(|| TiercastError::Provider {
            provider: "mock-sentiment".into(),
            reason: "down".into(),
        })
    }
}

pub struct MockFxPort {
    pub rate: Option<f64>,
}

impl FxRatePort for MockFxPort {
    fn fetch_rate(&self, base: &str, quote: &str) -> Result<FxRate, TiercastError> {
        match self.rate {
            Some(value) => Ok(FxRate {
                pair: format!("{base}/{quote}"),
                value,
                source: FxSource::Primary,
            }),
            None => Err(TiercastError::Provider {
                provider: "mock-fx".into(),
                reason: "down".into(),
            }),
        }
    }
}

pub struct MockChatPort {
    pub sent: RefCell<Vec<String>>,
    pub fail: bool,
}

impl MockChatPort {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl ChatPort for MockChatPort {
    fn send_text(&self, text: &str) -> Result<(), TiercastError> {
        if self.fail {
            return Err(TiercastError::Provider {
                provider: "mock-chat".into(),
                reason: "down".into(),
            });
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

pub struct MemorySnapshotPort {
    pub stored: RefCell<Option<Snapshot>>,
    pub corrupt: bool,
}

impl MemorySnapshotPort {
    pub fn new() -> Self {
        Self {
            stored: RefCell::new(None),
            corrupt: false,
        }
    }

    pub fn corrupt() -> Self {
        Self {
            stored: RefCell::new(None),
            corrupt: true,
        }
    }

    pub fn with_prior(snapshot: Snapshot) -> Self {
        Self {
            stored: RefCell::new(Some(snapshot)),
            corrupt: false,
        }
    }
}

impl SnapshotPort for MemorySnapshotPort {
    fn load(&self) -> Result<Option<Snapshot>, TiercastError> {
        if self.corrupt {
            return Err(TiercastError::Snapshot {
                reason: "unparseable".into(),
            });
        }
        Ok(self.stored.borrow().clone())
    }

    fn store(&self, snapshot: &Snapshot) -> Result<(), TiercastError> {
        *self.stored.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(day: NaiveDate, close: f64) -> Bar {
    Bar {
        date: day,
        open: close,
        high: close + 2.0,
        low: close - 2.0,
        close,
        volume: 1000.0,
    }
}

/// `n` daily bars starting 2024-01-01, close = start + step * i.
pub fn trending_bars(n: usize, start: f64, step: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            make_bar(
                date(2024, 1, 1) + Duration::days(i as i64),
                start + step * i as f64,
            )
        })
        .collect()
}

pub fn equity_spec(name: &str, symbol: &str) -> InstrumentSpec {
    InstrumentSpec {
        name: name.to_string(),
        symbol: symbol.to_string(),
        class: InstrumentClass::Equity,
        tick: TickRule::StepTable,
        daily_limit_pct: Some(10.0),
    }
}

pub fn crypto_spec(name: &str, symbol: &str) -> InstrumentSpec {
    InstrumentSpec {
        name: name.to_string(),
        symbol: symbol.to_string(),
        class: InstrumentClass::Crypto,
        tick: TickRule::None,
        daily_limit_pct: None,
    }
}

pub fn app_config(instruments: Vec<InstrumentSpec>) -> AppConfig {
    AppConfig {
        engine: EngineConfig {
            lookback_days: 365,
            params: IndicatorParams::default(),
            period: None,
        },
        instruments,
        fx: FxConfig {
            base: "USD".into(),
            quote: "TWD".into(),
            default_rate: 32.0,
        },
        snapshot_path: "unused.json".into(),
        telegram_enabled: true,
    }
}
