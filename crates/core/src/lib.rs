//! WealthPulse Core - Portfolio analytics and data-integrity services.
//!
//! This crate contains the computational core for WealthPulse: cash-flow
//! construction, XIRR and rolling-return calculation, the market-context
//! risk engine, and the snapshot backup/restore services. It is
//! database-agnostic and defines capability traits that are implemented
//! by the `storage-sqlite` crate.

pub mod backup;
pub mod constants;
pub mod errors;
pub mod holdings;
pub mod returns;
pub mod risk;
pub mod settings;

// Re-export common types from the holdings and risk modules
pub use holdings::*;
pub use risk::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
