//! Indicator computation over a bar series.
//!
//! Individual indicators live in submodules and return one value per bar,
//! `None` during warmup. An indicator that cannot be computed is absent,
//! never a numeric default; [`IndicatorSet::compute`] applies the one
//! documented substitution (long MA ≈ 0.9 × medium MA) and flags it.

pub mod sma;
pub mod rsi;
pub mod atr;
pub mod bollinger;

use crate::domain::bar::BarSeries;
use crate::domain::error::TiercastError;
use chrono::NaiveDate;

/// Window lengths used by [`IndicatorSet::compute`].
#[derive(Debug, Clone, Copy)]
pub struct IndicatorParams {
    pub medium_window: usize,
    pub long_window: usize,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub boll_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            medium_window: 20,
            long_window: 60,
            rsi_period: 14,
            atr_period: 14,
            boll_window: 20,
        }
    }
}

/// Indicator values as of the last bar of a series.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub as_of: NaiveDate,
    pub close: f64,
    pub ma_medium: Option<f64>,
    /// Long moving average; approximate when history was too short,
    /// see [`IndicatorSet::compute`].
    pub ma_long: Option<f64>,
    pub ma_long_approx: bool,
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    pub boll_lower: Option<f64>,
}

impl IndicatorSet {
    /// Minimum bars required before any set is computed.
    pub const MIN_BARS: usize = 20;

    /// Computes the set as of the final bar of `series`.
    ///
    /// When the series is shorter than the long window, the long MA is
    /// substituted with 0.9 × the medium MA and `ma_long_approx` is set
    /// so the substitution stays visible in downstream rationale text.
    pub fn compute(series: &BarSeries, params: &IndicatorParams) -> Result<Self, TiercastError> {
        if series.len() < Self::MIN_BARS {
            return Err(TiercastError::InsufficientData {
                symbol: series.symbol.clone(),
                bars: series.len(),
                minimum: Self::MIN_BARS,
            });
        }

        let bars = series.bars();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let last = bars.len() - 1;

        let ma_medium = finite(last_value(&sma::sma(&closes, params.medium_window)));
        let mut ma_long = finite(last_value(&sma::sma(&closes, params.long_window)));
        let mut ma_long_approx = false;
        if ma_long.is_none() {
            if let Some(medium) = ma_medium {
                ma_long = Some(medium * 0.9);
                ma_long_approx = true;
            }
        }

        Ok(Self {
            as_of: bars[last].date,
            close: closes[last],
            ma_medium,
            ma_long,
            ma_long_approx,
            rsi: finite(last_value(&rsi::rsi(&closes, params.rsi_period))),
            atr: finite(last_value(&atr::atr(bars, params.atr_period))),
            boll_lower: finite(last_value(&bollinger::bollinger_lower(
                &closes,
                params.boll_window,
                2.0,
            ))),
        })
    }

    /// Reference average for regime classification: the longest window
    /// that was genuinely computable. The approximate long MA is a ladder
    /// fallback, not trend evidence.
    pub fn regime_reference(&self) -> Option<f64> {
        if self.ma_long_approx {
            self.ma_medium
        } else {
            self.ma_long.or(self.ma_medium)
        }
    }
}

fn last_value(values: &[Option<f64>]) -> Option<f64> {
    values.last().copied().flatten()
}

/// Non-finite results are treated as absent so NaN never reaches the
/// ladder arithmetic.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
