//! Port traits: the seams between the engine and its collaborators.

pub mod config_port;
pub mod quote_port;
pub mod sentiment_port;
pub mod fx_port;
pub mod chat_port;
pub mod snapshot_port;
