//! Rendering of the outgoing chat message.
//!
//! The chat channel understands a small HTML subset (`<b>`, `<code>`,
//! `<i>`), so instrument names are escaped before interpolation. The
//! machine-readable output shape lives in [`crate::domain::snapshot`].

use crate::domain::analysis::{AnalysisResult, Batch};
use crate::domain::regime::Regime;

/// Renders the full batch message. Rendered identically whether or not
/// the gate decided to deliver; the caller owns that decision.
pub fn render_message(batch: &Batch) -> String {
    let date = batch.generated_at.format("%Y-%m-%d");
    let mut out = String::new();

    if batch.has_anomaly() {
        out.push_str(&format!("🚨 <b>【{date} Ladder Watch — ALERT】</b>\n"));
    } else {
        out.push_str(&format!("<b>【{date} Ladder Watch】</b>\n"));
    }

    for result in &batch.results {
        out.push_str("----------------\n");
        out.push_str(&render_instrument(result));
    }

    out.push_str("----------------\n");
    out.push_str(&format!(
        "<i>FX {}: {:.2} ({})</i>\n",
        escape(&batch.fx.pair),
        batch.fx.value,
        batch.fx.source,
    ));
    out
}

fn render_instrument(result: &AnalysisResult) -> String {
    let regime_icon = match result.regime {
        Regime::Bull => "🐂",
        Regime::Bear => "🐻",
    };
    let mut out = format!(
        "<b>{}</b> ({}) {} {}\n",
        escape(&result.spec.name),
        escape(&result.spec.symbol),
        regime_icon,
        result.regime,
    );
    out.push_str(&format!("Price: <code>{}</code>\n", result.current_str()));

    for (i, tier) in result.ladder.tiers.iter().enumerate() {
        let marker = if i == result.ladder.best_pick { "★" } else { "•" };
        out.push_str(&format!(
            "{marker} {}: <code>{}</code> — {} ({})\n",
            tier.label,
            result.spec.tick.format(tier.price),
            tier.rationale,
            tier.feasibility,
        ));
    }

    out.push_str(&format!(
        "Mood: {} {} ({}) — <i>{}</i>\n",
        result.sentiment.band.icon(),
        result.sentiment.band,
        result.sentiment.raw,
        result.sentiment.band.description(),
    ));

    if let Some(anomaly) = result.anomaly {
        out.push_str(&format!("⚠️ <b>{anomaly}</b>\n"));
    }
    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
