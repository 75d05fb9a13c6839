/// Application identifier stamped into snapshot documents.
pub const APP_ID: &str = "wealthpulse";

/// Current snapshot document schema version.
pub const SNAPSHOT_SCHEMA_VERSION: i32 = 3;

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Day-count denominator for annualization (actual/365.25).
pub const DAYS_PER_YEAR: f64 = 365.25;
