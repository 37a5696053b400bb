//! Price increment rules and upward tick rounding.
//!
//! Ladder prices are limit-buy prices: rounding always goes up, never
//! down, so the result stays a legal order price without becoming more
//! aggressive than the raw candidate.

/// Tick size regime for one instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickRule {
    /// TWSE-style step function of price magnitude.
    StepTable,
    /// A single uniform increment.
    Fixed(f64),
    /// Continuous pricing (crypto): no rounding.
    None,
}

impl TickRule {
    /// Minimum legal increment at `price`. `None` for continuous pricing.
    pub fn tick_size(&self, price: f64) -> Option<f64> {
        match self {
            TickRule::StepTable => Some(step_table_tick(price)),
            TickRule::Fixed(step) if *step > 0.0 => Some(*step),
            _ => None,
        }
    }

    /// Renders `price` with the precision implied by the tick size at
    /// that magnitude. This string is what the notification gate and the
    /// snapshot compare byte-for-byte, so it must be stable run to run.
    pub fn format(&self, price: f64) -> String {
        let decimals = match self.tick_size(price) {
            Some(t) if t >= 1.0 => 0,
            Some(t) if t >= 0.1 => 1,
            _ => 2,
        };
        format!("{price:.decimals$}")
    }

    /// Rounds `price` up to the next valid increment. Idempotent on
    /// already-aligned prices.
    pub fn round_up(&self, price: f64) -> f64 {
        let Some(tick) = self.tick_size(price) else {
            return price;
        };
        let steps = (price / tick).ceil();
        // ceil() on a float that is epsilon above an integer would bump a
        // whole tick; snap back when the price was already aligned.
        let down = (price / tick).round();
        let aligned = (down * tick - price).abs() < tick * 1e-6;
        let steps = if aligned { down } else { steps };
        steps * tick
    }
}

fn step_table_tick(price: f64) -> f64 {
    if price < 10.0 {
        0.01
    } else if price < 50.0 {
        0.05
    } else if price < 100.0 {
        0.1
    } else if price < 500.0 {
        0.5
    } else if price < 1000.0 {
        1.0
    } else {
        5.0
    }
}
