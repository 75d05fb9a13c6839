//! Return calculation: cash-flow construction, XIRR solving and
//! trailing-window aggregation.

mod cash_flow;
mod rolling;
mod xirr;

pub use cash_flow::*;
pub use rolling::*;
pub use xirr::*;
