//! Unit tests for holding helpers and allocation aggregation.

use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn holding(id: &str, holding_type: HoldingType, invested: Decimal, current: Decimal) -> Holding {
    Holding {
        id: id.to_string(),
        name: id.to_string(),
        ticker: None,
        platform: None,
        holding_type,
        quantity: Decimal::ONE,
        invested_amount: invested,
        current_value: current,
        last_updated: "2024-01-01".to_string(),
        sector: None,
    }
}

#[test]
fn roi_percent_basic() {
    let h = holding("a", HoldingType::Stock, dec!(100), dec!(150));
    assert_eq!(h.roi_percent(), dec!(50));
    assert_eq!(h.net_pl(), dec!(50));
}

#[test]
fn roi_percent_zero_invested_is_zero() {
    let h = holding("a", HoldingType::Stock, dec!(0), dec!(150));
    assert_eq!(h.roi_percent(), Decimal::ZERO);
}

#[test]
fn parses_iso_date_and_rfc3339() {
    let mut h = holding("a", HoldingType::Stock, dec!(1), dec!(1));
    h.last_updated = "2023-06-15".to_string();
    assert_eq!(
        h.parsed_last_updated(),
        chrono::NaiveDate::from_ymd_opt(2023, 6, 15)
    );

    h.last_updated = "2023-06-15T10:30:00+05:30".to_string();
    assert_eq!(
        h.parsed_last_updated(),
        chrono::NaiveDate::from_ymd_opt(2023, 6, 15)
    );

    h.last_updated = "not a date".to_string();
    assert_eq!(h.parsed_last_updated(), None);
}

#[test]
fn volatile_and_bullion_classification() {
    assert!(HoldingType::Crypto.is_volatile());
    assert!(HoldingType::Silver.is_volatile());
    assert!(HoldingType::Stock.is_volatile());
    assert!(!HoldingType::Gold.is_volatile());

    assert!(HoldingType::Gold.is_bullion());
    assert!(HoldingType::Silver.is_bullion());
    assert!(!HoldingType::Crypto.is_bullion());
}

#[test]
fn sector_allocations_percentages() {
    let mut tech = holding("t", HoldingType::Stock, dec!(100), dec!(400));
    tech.sector = Some("Tech".to_string());
    let mut pharma = holding("p", HoldingType::Stock, dec!(100), dec!(400));
    pharma.sector = Some("Pharma".to_string());
    let unclassified = holding("u", HoldingType::Gold, dec!(100), dec!(200));

    let holdings = vec![tech, pharma, unclassified];
    let (_, total) = portfolio_totals(&holdings);
    assert_eq!(total, dec!(1000));

    let allocations = sector_allocations(&holdings, total);
    assert_eq!(allocations["Tech"], dec!(40));
    assert_eq!(allocations["Pharma"], dec!(40));
    assert_eq!(allocations["Unclassified"], dec!(20));
}

#[test]
fn sector_allocations_zero_total_is_empty() {
    let holdings = vec![holding("a", HoldingType::Stock, dec!(0), dec!(0))];
    assert!(sector_allocations(&holdings, Decimal::ZERO).is_empty());
}
