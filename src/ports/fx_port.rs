//! FX rate port trait.

use crate::domain::analysis::FxRate;
use crate::domain::error::TiercastError;

pub trait FxRatePort {
    /// Spot conversion rate for one unit of `base` in `quote`. The
    /// returned rate records whether it came from the primary or the
    /// fallback provider; the hardcoded default is the caller's concern.
    fn fetch_rate(&self, base: &str, quote: &str) -> Result<FxRate, TiercastError>;
}
