//! Building and validating the immutable run configuration.
//!
//! The engine never reads ambient process state; everything it needs is
//! assembled here into [`AppConfig`] before the batch starts. Secrets
//! (chat credentials) are the one exception, injected by the adapter
//! layer from the environment.

use crate::domain::analysis::{InstrumentClass, InstrumentSpec};
use crate::domain::bar::ResamplePeriod;
use crate::domain::error::TiercastError;
use crate::domain::indicator::{IndicatorParams, IndicatorSet};
use crate::domain::tick::TickRule;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub lookback_days: u32,
    pub params: IndicatorParams,
    /// `None` analyzes the daily series as-is; `Some` resamples to the
    /// coarser period (closed periods only) before indicator computation.
    pub period: Option<ResamplePeriod>,
}

#[derive(Debug, Clone)]
pub struct FxConfig {
    pub base: String,
    pub quote: String,
    /// Used when both FX providers fail, so formatting never divides by
    /// an absent rate.
    pub default_rate: f64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub instruments: Vec<InstrumentSpec>,
    pub fx: FxConfig,
    pub snapshot_path: String,
    pub telegram_enabled: bool,
}

pub fn build_app_config(config: &dyn ConfigPort) -> Result<AppConfig, TiercastError> {
    let lookback_days = config.get_int("engine", "lookback_days", 365);
    if lookback_days < IndicatorSet::MIN_BARS as i64 {
        return Err(TiercastError::ConfigInvalid {
            section: "engine".into(),
            key: "lookback_days".into(),
            reason: format!("must cover at least {} bars", IndicatorSet::MIN_BARS),
        });
    }

    let defaults = IndicatorParams::default();
    let params = IndicatorParams {
        medium_window: window(config, "medium_window", defaults.medium_window)?,
        long_window: window(config, "long_window", defaults.long_window)?,
        rsi_period: window(config, "rsi_period", defaults.rsi_period)?,
        atr_period: window(config, "atr_period", defaults.atr_period)?,
        boll_window: window(config, "boll_window", defaults.boll_window)?,
    };
    if params.medium_window >= params.long_window {
        return Err(TiercastError::ConfigInvalid {
            section: "engine".into(),
            key: "medium_window".into(),
            reason: "medium window must be shorter than long window".into(),
        });
    }

    let instruments = build_instruments(config)?;
    if instruments.is_empty() {
        return Err(TiercastError::ConfigMissing {
            section: "instruments".into(),
            key: "list".into(),
        });
    }

    let fx = FxConfig {
        base: required(config, "fx", "base")?,
        quote: required(config, "fx", "quote")?,
        default_rate: config.get_double("fx", "default_rate", 32.0),
    };

    Ok(AppConfig {
        engine: EngineConfig {
            lookback_days: lookback_days as u32,
            params,
            period: parse_period(config)?,
        },
        instruments,
        fx,
        snapshot_path: config
            .get_string("snapshot", "path")
            .unwrap_or_else(|| "tiercast_snapshot.json".to_string()),
        telegram_enabled: config.get_bool("telegram", "enabled", true),
    })
}

fn parse_period(config: &dyn ConfigPort) -> Result<Option<ResamplePeriod>, TiercastError> {
    let raw = config
        .get_string("engine", "period")
        .unwrap_or_else(|| "daily".to_string());
    match raw.to_lowercase().as_str() {
        "daily" => Ok(None),
        "weekly" => Ok(Some(ResamplePeriod::Weekly)),
        other => other
            .strip_suffix('d')
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n >= 2)
            .map(|n| Some(ResamplePeriod::CalendarDays(n)))
            .ok_or_else(|| TiercastError::ConfigInvalid {
                section: "engine".into(),
                key: "period".into(),
                reason: format!("expected daily, weekly, or <n>d with n >= 2, got {raw:?}"),
            }),
    }
}

fn build_instruments(config: &dyn ConfigPort) -> Result<Vec<InstrumentSpec>, TiercastError> {
    let Some(list) = config.get_string("instruments", "list") else {
        return Ok(vec![]);
    };

    let mut specs = Vec::new();
    for id in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let section = format!("instrument.{id}");

        let name = config
            .get_string(&section, "name")
            .unwrap_or_else(|| id.to_uppercase());
        let symbol = required(config, &section, "symbol")?;

        let class_str = required(config, &section, "class")?;
        let class = InstrumentClass::parse(&class_str).ok_or_else(|| {
            TiercastError::ConfigInvalid {
                section: section.clone(),
                key: "class".into(),
                reason: format!("unknown class {class_str:?} (expected equity or crypto)"),
            }
        })?;

        let tick = parse_tick(config, &section)?;

        let daily_limit_pct = match config.get_double(&section, "daily_limit_pct", 0.0) {
            limit if limit > 0.0 => Some(limit),
            _ => None,
        };

        specs.push(InstrumentSpec {
            name,
            symbol,
            class,
            tick,
            daily_limit_pct,
        });
    }
    Ok(specs)
}

fn parse_tick(config: &dyn ConfigPort, section: &str) -> Result<TickRule, TiercastError> {
    let raw = config
        .get_string(section, "tick")
        .unwrap_or_else(|| "none".to_string());
    match raw.to_lowercase().as_str() {
        "step" => Ok(TickRule::StepTable),
        "none" => Ok(TickRule::None),
        other => other
            .parse::<f64>()
            .ok()
            .filter(|step| *step > 0.0)
            .map(TickRule::Fixed)
            .ok_or_else(|| TiercastError::ConfigInvalid {
                section: section.to_string(),
                key: "tick".into(),
                reason: format!("expected step, none, or a positive increment, got {raw:?}"),
            }),
    }
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, TiercastError> {
    let value = config.get_int("engine", key, default as i64);
    if value < 1 {
        return Err(TiercastError::ConfigInvalid {
            section: "engine".into(),
            key: key.into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(value as usize)
}

fn required(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, TiercastError> {
    config
        .get_string(section, key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| TiercastError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}
