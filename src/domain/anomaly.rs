//! Single-bar anomaly detection: crash, spike, extreme oversold.
//!
//! At most one flag per instrument per run, first match in that order.
//! The oversold flag is latched with two-sided hysteresis (enter below
//! one threshold, release above a higher one) so a reading hovering at
//! the boundary does not flap between runs. The latch state is carried
//! in the persisted snapshot.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnomalyFlag {
    /// Daily decline beyond the class threshold, magnitude in percent.
    FlashCrash { change_pct: f64 },
    /// Daily gain beyond the class threshold, magnitude in percent.
    Spike { change_pct: f64 },
    /// RSI below the oversold floor (or still latched from a prior run).
    ExtremeOversold { rsi: f64 },
}

impl fmt::Display for AnomalyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyFlag::FlashCrash { change_pct } => {
                write!(f, "flash crash {change_pct:+.1}% on the day")
            }
            AnomalyFlag::Spike { change_pct } => {
                write!(f, "spike {change_pct:+.1}% on the day")
            }
            AnomalyFlag::ExtremeOversold { rsi } => {
                write!(f, "extreme oversold, RSI {rsi:.0}")
            }
        }
    }
}

/// Class-specific trigger levels. Crypto tolerates larger routine daily
/// moves than equities.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyThresholds {
    pub crash_pct: f64,
    pub spike_pct: f64,
    pub oversold_enter: f64,
    pub oversold_exit: f64,
}

impl AnomalyThresholds {
    pub fn equity() -> Self {
        Self {
            crash_pct: 5.0,
            spike_pct: 5.0,
            oversold_enter: 20.0,
            oversold_exit: 25.0,
        }
    }

    pub fn crypto() -> Self {
        Self {
            crash_pct: 8.0,
            spike_pct: 8.0,
            oversold_enter: 20.0,
            oversold_exit: 25.0,
        }
    }
}

/// Evaluates one instrument's bar against the thresholds.
///
/// `was_oversold` is the latch state from the previous run; the returned
/// bool is the updated latch to persist. A crash or spike outranks the
/// oversold flag but does not clear the latch.
pub fn detect(
    change_pct: Option<f64>,
    rsi: Option<f64>,
    was_oversold: bool,
    thresholds: &AnomalyThresholds,
) -> (Option<AnomalyFlag>, bool) {
    let oversold_now = match rsi {
        Some(r) if r < thresholds.oversold_enter => true,
        Some(r) if was_oversold => r <= thresholds.oversold_exit,
        Some(_) => false,
        None => was_oversold,
    };

    if let Some(change) = change_pct {
        if change <= -thresholds.crash_pct {
            return (Some(AnomalyFlag::FlashCrash { change_pct: change }), oversold_now);
        }
        if change >= thresholds.spike_pct {
            return (Some(AnomalyFlag::Spike { change_pct: change }), oversold_now);
        }
    }

    if oversold_now {
        if let Some(r) = rsi {
            return (Some(AnomalyFlag::ExtremeOversold { rsi: r }), true);
        }
    }

    (None, oversold_now)
}
