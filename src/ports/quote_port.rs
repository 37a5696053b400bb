//! Market data port trait.

use crate::domain::bar::Bar;
use crate::domain::error::TiercastError;

pub trait QuotePort {
    /// Ordered daily OHLC bars for `symbol` over the trailing lookback
    /// window. May legitimately return an empty vector.
    fn fetch_daily(&self, symbol: &str, lookback_days: u32) -> Result<Vec<Bar>, TiercastError>;
}
