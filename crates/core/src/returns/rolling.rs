use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{build_cash_flows, xirr};
use crate::holdings::Holding;

/// Trailing windows the dashboard reports returns for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
    FiveYears,
    All,
}

impl ReturnPeriod {
    /// Every period, in display order.
    pub const ALL_PERIODS: [ReturnPeriod; 7] = [
        ReturnPeriod::OneMonth,
        ReturnPeriod::ThreeMonths,
        ReturnPeriod::SixMonths,
        ReturnPeriod::OneYear,
        ReturnPeriod::ThreeYears,
        ReturnPeriod::FiveYears,
        ReturnPeriod::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReturnPeriod::OneMonth => "1M",
            ReturnPeriod::ThreeMonths => "3M",
            ReturnPeriod::SixMonths => "6M",
            ReturnPeriod::OneYear => "1Y",
            ReturnPeriod::ThreeYears => "3Y",
            ReturnPeriod::FiveYears => "5Y",
            ReturnPeriod::All => "ALL",
        }
    }

    /// Window length in days; `None` means unbounded.
    pub fn window_days(&self) -> Option<i64> {
        match self {
            ReturnPeriod::OneMonth => Some(30),
            ReturnPeriod::ThreeMonths => Some(90),
            ReturnPeriod::SixMonths => Some(180),
            ReturnPeriod::OneYear => Some(365),
            ReturnPeriod::ThreeYears => Some(1095),
            ReturnPeriod::FiveYears => Some(1825),
            ReturnPeriod::All => None,
        }
    }
}

/// Computes XIRR over each trailing window.
///
/// For every window the holding list is filtered to records updated inside
/// the window, the filtered set's present value is the sum of member
/// `current_value`, and the solver runs on the rebuilt flow series. An empty
/// window (or an unpriceable flow set) maps to `None`, never an error or a
/// misleading 0%.
pub fn rolling_returns(holdings: &[Holding], today: NaiveDate) -> HashMap<String, Option<f64>> {
    let mut results = HashMap::with_capacity(ReturnPeriod::ALL_PERIODS.len());

    for period in ReturnPeriod::ALL_PERIODS {
        results.insert(
            period.label().to_string(),
            window_return(holdings, today, period),
        );
    }

    results
}

fn window_return(holdings: &[Holding], today: NaiveDate, period: ReturnPeriod) -> Option<f64> {
    let cutoff = period.window_days().map(|days| today - Duration::days(days));

    let in_window: Vec<Holding> = holdings
        .iter()
        .filter(|h| match h.parsed_last_updated() {
            Some(date) => cutoff.map_or(true, |c| date >= c),
            None => false,
        })
        .cloned()
        .collect();

    if in_window.is_empty() {
        return None;
    }

    let window_value: Decimal = in_window.iter().map(|h| h.current_value).sum();
    let flows = build_cash_flows(&in_window, window_value, today);
    xirr(&flows)
}
