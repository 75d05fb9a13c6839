//! Rule-based risk engine: market-context state, per-holding rule
//! evaluation and the whole-portfolio verdict.

mod risk_engine;
mod risk_model;

pub use risk_engine::*;
pub use risk_model::*;

#[cfg(test)]
mod risk_engine_tests;
