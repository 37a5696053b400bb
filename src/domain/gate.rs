//! Notification gate: is this batch worth delivering?
//!
//! Pure comparison of the new batch against the last persisted snapshot.
//! The boolean is exposed separately from the state so callers can
//! combine it with scheduling policy (forced noon delivery, market-hours
//! windows) that lives outside the engine.

use crate::domain::analysis::Batch;
use crate::domain::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NoPriorSnapshot,
    Unchanged,
    Changed,
    Anomalous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub state: GateState,
    pub notify: bool,
}

pub fn decide(batch: &Batch, prior: Option<&Snapshot>) -> GateDecision {
    if batch.has_anomaly() {
        return GateDecision {
            state: GateState::Anomalous,
            notify: true,
        };
    }

    let Some(prior) = prior else {
        return GateDecision {
            state: GateState::NoPriorSnapshot,
            notify: true,
        };
    };

    let all_match = batch.results.iter().all(|r| {
        prior.instruments.get(&r.spec.name).is_some_and(|entry| {
            entry.pick_label == r.best_tier().label.to_string()
                && entry.pick_price == r.best_price_str()
        })
    });

    if all_match {
        GateDecision {
            state: GateState::Unchanged,
            notify: false,
        }
    } else {
        GateDecision {
            state: GateState::Changed,
            notify: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{
        AnalysisResult, FxRate, FxSource, InstrumentClass, InstrumentSpec,
    };
    use crate::domain::anomaly::AnomalyFlag;
    use crate::domain::ladder::{Ladder, PriceTier, TierLabel};
    use crate::domain::regime::Regime;
    use crate::domain::sentiment::{SentimentScore, SentimentSource};
    use crate::domain::snapshot::Snapshot;
    use crate::domain::tick::TickRule;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn result(name: &str, pick_price: f64) -> AnalysisResult {
        AnalysisResult {
            spec: InstrumentSpec {
                name: name.into(),
                symbol: name.into(),
                class: InstrumentClass::Equity,
                tick: TickRule::StepTable,
                daily_limit_pct: None,
            },
            as_of: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            current: pick_price + 10.0,
            regime: Regime::Bull,
            ladder: Ladder {
                tiers: vec![PriceTier {
                    label: TierLabel::Aggressive,
                    price: pick_price,
                    rationale: "test".into(),
                    feasibility: "test".into(),
                }],
                best_pick: 0,
            },
            sentiment: SentimentScore::from_raw(50, SentimentSource::Rsi),
            anomaly: None,
            oversold: false,
        }
    }

    fn batch(results: Vec<AnalysisResult>) -> Batch {
        Batch {
            results,
            fx: FxRate {
                pair: "USD/TWD".into(),
                value: 32.0,
                source: FxSource::Default,
            },
            generated_at: Utc.with_ymd_and_hms(2024, 6, 3, 4, 0, 0).unwrap(),
        }
    }

    #[test]
    fn no_prior_snapshot_notifies() {
        let b = batch(vec![result("TSMC", 560.0)]);
        let decision = decide(&b, None);
        assert_eq!(decision.state, GateState::NoPriorSnapshot);
        assert!(decision.notify);
    }

    #[test]
    fn identical_batch_suppresses() {
        let b = batch(vec![result("TSMC", 560.0), result("BTC", 90.0)]);
        let prior = Snapshot::from_batch(&b);
        let decision = decide(&b, Some(&prior));
        assert_eq!(decision.state, GateState::Unchanged);
        assert!(!decision.notify);
    }

    #[test]
    fn gate_is_idempotent_when_nothing_changes() {
        let b = batch(vec![result("TSMC", 560.0)]);
        let prior = Snapshot::from_batch(&b);
        assert!(!decide(&b, Some(&prior)).notify);
        assert!(!decide(&b, Some(&prior)).notify);
    }

    #[test]
    fn one_tick_price_move_notifies() {
        let b = batch(vec![result("TSMC", 560.0)]);
        let prior = Snapshot::from_batch(&b);

        let moved = batch(vec![result("TSMC", 561.0)]);
        let decision = decide(&moved, Some(&prior));
        assert_eq!(decision.state, GateState::Changed);
        assert!(decision.notify);
    }

    #[test]
    fn new_instrument_notifies() {
        let b = batch(vec![result("TSMC", 560.0)]);
        let prior = Snapshot::from_batch(&b);

        let grown = batch(vec![result("TSMC", 560.0), result("BTC", 90.0)]);
        assert_eq!(decide(&grown, Some(&prior)).state, GateState::Changed);
    }

    #[test]
    fn anomaly_forces_notify_even_when_unchanged() {
        let b = batch(vec![result("TSMC", 560.0)]);
        let prior = Snapshot::from_batch(&b);

        let mut anomalous = batch(vec![result("TSMC", 560.0)]);
        anomalous.results[0].anomaly = Some(AnomalyFlag::FlashCrash { change_pct: -9.0 });
        let decision = decide(&anomalous, Some(&prior));
        assert_eq!(decision.state, GateState::Anomalous);
        assert!(decision.notify);
    }
}
