//! tiercast — regime-aware tiered limit-order ladder advisor.
//!
//! Hexagonal architecture: engine logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
