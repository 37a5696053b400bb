//! Core engine types and logic. No I/O in this tree.

pub mod bar;
pub mod indicator;
pub mod regime;
pub mod tick;
pub mod ladder;
pub mod sentiment;
pub mod anomaly;
pub mod analysis;
pub mod gate;
pub mod snapshot;
pub mod report;
pub mod config_validation;
pub mod error;
