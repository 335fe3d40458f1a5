//! CLI command implementations.

pub mod banks;
pub mod chain;
pub mod common;
pub mod presets;
pub mod units;
