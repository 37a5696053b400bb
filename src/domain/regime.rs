//! Bull/Bear regime classification.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Bull,
    Bear,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Bull => write!(f, "Bull"),
            Regime::Bear => write!(f, "Bear"),
        }
    }
}

/// Bear iff price is strictly below the reference long average; a price
/// exactly on the line classifies as Bull. Stateless — previous runs do
/// not influence the outcome.
pub fn classify(price: f64, reference_ma: f64) -> Regime {
    if price < reference_ma {
        Regime::Bear
    } else {
        Regime::Bull
    }
}
