//! Chat delivery port trait.

use crate::domain::error::TiercastError;

pub trait ChatPort {
    /// Best-effort single attempt; the text may use the `<b>`, `<code>`
    /// and `<i>` markup subset. No delivery confirmation is modeled.
    fn send_text(&self, text: &str) -> Result<(), TiercastError>;
}
