//! Tiered limit-buy ladder construction.
//!
//! Raw candidates come from a single data-driven table of
//! (regime, tier label) → price formula, so adding a regime or a rung is
//! additive rather than another parallel branch. Post-processing then
//! enforces the two hard invariants: every tier strictly below the
//! current price, and strictly descending tier prices after dedup.

use crate::domain::analysis::InstrumentClass;
use crate::domain::indicator::IndicatorSet;
use crate::domain::regime::Regime;
use crate::domain::tick::TickRule;
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierLabel {
    Aggressive,
    Moderate,
    Conservative,
}

impl TierLabel {
    /// Buffer applied when a candidate lands at or above market: the less
    /// aggressive the rung, the deeper it is pushed below the current
    /// price.
    fn clamp_buffer(self) -> f64 {
        match self {
            TierLabel::Aggressive => 0.01,
            TierLabel::Moderate => 0.05,
            TierLabel::Conservative => 0.10,
        }
    }
}

impl fmt::Display for TierLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierLabel::Aggressive => write!(f, "Aggressive"),
            TierLabel::Moderate => write!(f, "Moderate"),
            TierLabel::Conservative => write!(f, "Conservative"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PriceTier {
    pub label: TierLabel,
    pub price: f64,
    pub rationale: String,
    pub feasibility: String,
}

#[derive(Debug, Clone)]
pub struct Ladder {
    /// 0-3 tiers, strictly descending price.
    pub tiers: Vec<PriceTier>,
    /// Index into `tiers`; meaningless when `tiers` is empty.
    pub best_pick: usize,
}

/// Everything the builder needs for one instrument.
#[derive(Debug, Clone, Copy)]
pub struct LadderInputs<'a> {
    pub current: f64,
    pub regime: Regime,
    pub indicators: &'a IndicatorSet,
    pub class: InstrumentClass,
    pub tick: TickRule,
    /// Exchange daily move limit in percent, where one applies.
    pub daily_limit_pct: Option<f64>,
    pub as_of: NaiveDate,
}

type Formula = fn(&LadderInputs) -> Option<f64>;
type Rationale = fn(&LadderInputs) -> String;

struct CandidateRule {
    regime: Regime,
    label: TierLabel,
    formula: Formula,
    rationale: Rationale,
}

static CANDIDATE_TABLE: &[CandidateRule] = &[
    CandidateRule {
        regime: Regime::Bull,
        label: TierLabel::Aggressive,
        formula: |i| i.indicators.ma_medium,
        rationale: |_| "pullback to the medium average".into(),
    },
    CandidateRule {
        regime: Regime::Bull,
        label: TierLabel::Moderate,
        formula: |i| i.indicators.ma_long,
        rationale: |i| {
            format!("bull/bear divide at the long average{}", approx_note(i))
        },
    },
    CandidateRule {
        regime: Regime::Bull,
        label: TierLabel::Conservative,
        formula: |i| i.indicators.boll_lower,
        rationale: |_| "statistical extreme at the lower Bollinger band".into(),
    },
    CandidateRule {
        regime: Regime::Bear,
        label: TierLabel::Aggressive,
        formula: |i| i.indicators.atr.map(|atr| i.current - 0.5 * atr),
        rationale: |_| "shallow bounce half an ATR below market".into(),
    },
    CandidateRule {
        regime: Regime::Bear,
        label: TierLabel::Moderate,
        formula: |i| {
            let below_long = i
                .indicators
                .ma_long
                .zip(i.indicators.atr)
                .map(|(ma, atr)| ma - atr);
            match (i.indicators.boll_lower, below_long) {
                (Some(b), Some(m)) => Some(b.min(m)),
                (Some(b), None) => Some(b),
                (None, m) => m,
            }
        },
        rationale: |i| {
            format!(
                "deeper of the Bollinger floor and long average minus one ATR{}",
                approx_note(i)
            )
        },
    },
    CandidateRule {
        regime: Regime::Bear,
        label: TierLabel::Conservative,
        formula: |i| {
            i.indicators
                .boll_lower
                .map(|b| b * conservative_discount(i.class))
        },
        rationale: |i| {
            format!(
                "Bollinger floor discounted {:.0}%",
                (1.0 - conservative_discount(i.class)) * 100.0
            )
        },
    },
];

/// Deeper discount for instruments with higher routine volatility.
fn conservative_discount(class: InstrumentClass) -> f64 {
    match class {
        InstrumentClass::Crypto => 0.90,
        InstrumentClass::Equity => 0.95,
    }
}

fn approx_note(i: &LadderInputs) -> &'static str {
    if i.indicators.ma_long_approx {
        " (long average approximated from short history)"
    } else {
        ""
    }
}

pub fn build(inputs: &LadderInputs) -> Ladder {
    let mut candidates: Vec<(f64, String)> = Vec::with_capacity(3);

    for rule in CANDIDATE_TABLE.iter().filter(|r| r.regime == inputs.regime) {
        let Some(raw) = (rule.formula)(inputs) else {
            continue;
        };
        if !raw.is_finite() || raw <= 0.0 {
            continue;
        }

        let mut rationale = (rule.rationale)(inputs);
        let mut price = inputs.tick.round_up(raw);

        // Never recommend buying at or above market.
        if price >= inputs.current {
            price = inputs
                .tick
                .round_up(inputs.current * (1.0 - rule.label.clamp_buffer()));
            rationale.push_str("; corrected below market");
            if price >= inputs.current {
                continue;
            }
        }

        candidates.push((price, rationale));
    }

    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    candidates.dedup_by(|a, b| (a.0 - b.0).abs() < 1e-9);

    let labels = [
        TierLabel::Aggressive,
        TierLabel::Moderate,
        TierLabel::Conservative,
    ];
    let tiers: Vec<PriceTier> = candidates
        .into_iter()
        .enumerate()
        .map(|(pos, (price, rationale))| PriceTier {
            label: labels[pos],
            price,
            rationale,
            feasibility: feasibility_note(inputs, price),
        })
        .collect();

    let best_pick = best_pick(inputs, tiers.len());
    Ladder { tiers, best_pick }
}

/// Bear regime or an overheated RSI both push the pick to the lowest
/// rung; otherwise a full ladder picks its middle rung.
fn best_pick(inputs: &LadderInputs, tier_count: usize) -> usize {
    if tier_count == 0 {
        return 0;
    }
    let rsi_hot = inputs.indicators.rsi.is_some_and(|r| r > 70.0);
    if inputs.regime == Regime::Bear || rsi_hot {
        tier_count - 1
    } else if tier_count == 3 {
        1
    } else {
        tier_count - 1
    }
}

fn feasibility_note(inputs: &LadderInputs, price: f64) -> String {
    let distance = (inputs.current - price) / inputs.current * 100.0;
    let mut note = format!("{distance:.1}% below market");

    if let Some(limit) = inputs.daily_limit_pct {
        let sessions = remaining_sessions_in_week(inputs.as_of);
        // Friday or weekend: the week is closed, there is nothing left to
        // reach, so the note would flag every tier.
        if sessions > 0 {
            let floor = inputs.current * (1.0 - limit / 100.0).powi(sessions as i32);
            if price < floor {
                note.push_str("; unreachable this week");
            }
        }
    }
    note
}

/// Weekday sessions strictly after `date` up to and including Friday.
pub fn remaining_sessions_in_week(date: NaiveDate) -> u32 {
    let dow = date.weekday().num_days_from_monday(); // Mon=0 .. Sun=6
    if dow >= 4 { 0 } else { 4 - dow }
}
