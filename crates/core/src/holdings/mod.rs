//! Holding models and portfolio aggregation helpers.
//!
//! Holdings are owned by the persistence layer; everything in this crate
//! consumes them read-only.

mod allocation;
mod holdings_model;

pub use allocation::*;
pub use holdings_model::*;

#[cfg(test)]
mod holdings_model_tests;
