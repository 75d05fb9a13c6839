use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::holdings::Holding;

/// A single signed cash flow. Outflows (purchases) are negative, the
/// portfolio's present value enters as one positive terminal flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Builds a chronologically sorted cash-flow list from holdings.
///
/// Each holding with a positive invested amount and a parseable
/// `last_updated` date contributes one negative flow; unparsable dates and
/// non-positive amounts are skipped, not treated as fatal. When
/// `current_total_value` is positive a single inflow dated `today` closes
/// the series. No minimum-count validation happens here; the solver rejects
/// sets it cannot price.
pub fn build_cash_flows(
    holdings: &[Holding],
    current_total_value: Decimal,
    today: NaiveDate,
) -> Vec<CashFlow> {
    let mut flows: Vec<CashFlow> = Vec::with_capacity(holdings.len() + 1);

    for holding in holdings {
        if holding.invested_amount <= Decimal::ZERO {
            continue;
        }
        match holding.parsed_last_updated() {
            Some(date) => flows.push(CashFlow {
                date,
                amount: -holding.invested_amount,
            }),
            None => {
                debug!(
                    "Skipping holding '{}' with unparsable date '{}'",
                    holding.id, holding.last_updated
                );
            }
        }
    }

    if current_total_value > Decimal::ZERO {
        flows.push(CashFlow {
            date: today,
            amount: current_total_value,
        });
    }

    flows.sort_by_key(|flow| flow.date);
    flows
}
