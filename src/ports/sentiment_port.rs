//! External sentiment index port trait.

use crate::domain::error::TiercastError;

pub trait SentimentIndexPort {
    /// Current market-wide fear/greed reading, 0-100.
    fn fetch_index(&self) -> Result<u8, TiercastError>;
}
