//! Portfolio-level aggregation helpers shared by the risk engine and the
//! dashboard's allocation widgets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use super::Holding;

/// Sums invested amount and current value over all holdings.
pub fn portfolio_totals(holdings: &[Holding]) -> (Decimal, Decimal) {
    let invested = holdings.iter().map(|h| h.invested_amount).sum();
    let current = holdings.iter().map(|h| h.current_value).sum();
    (invested, current)
}

/// Percentage of the portfolio total held per sector.
///
/// Holdings without a sector are grouped under "Unclassified". Returns an
/// empty map when the total is zero (nothing to apportion).
pub fn sector_allocations(holdings: &[Holding], total: Decimal) -> HashMap<String, Decimal> {
    let mut allocations: HashMap<String, Decimal> = HashMap::new();

    if total <= Decimal::ZERO {
        return allocations;
    }

    for holding in holdings {
        let sector = holding
            .sector
            .clone()
            .unwrap_or_else(|| "Unclassified".to_string());
        *allocations.entry(sector).or_insert(Decimal::ZERO) += holding.current_value;
    }

    for value in allocations.values_mut() {
        *value = *value / total * dec!(100);
    }

    allocations
}
