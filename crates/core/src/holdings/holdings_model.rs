use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Category of a recorded holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldingType {
    Stock,
    MutualFund,
    Crypto,
    Gold,
    Silver,
    FixedDeposit,
    RealEstate,
    Cash,
}

impl HoldingType {
    /// Display label used in exports.
    pub fn label(&self) -> &'static str {
        match self {
            HoldingType::Stock => "Stock",
            HoldingType::MutualFund => "Mutual Fund",
            HoldingType::Crypto => "Crypto",
            HoldingType::Gold => "Gold",
            HoldingType::Silver => "Silver",
            HoldingType::FixedDeposit => "Fixed Deposit",
            HoldingType::RealEstate => "Real Estate",
            HoldingType::Cash => "Cash",
        }
    }

    /// Momentum-sensitive categories that react sharply to market swings.
    pub fn is_volatile(&self) -> bool {
        matches!(
            self,
            HoldingType::Crypto | HoldingType::Silver | HoldingType::Stock
        )
    }

    /// Gold and silver are grouped for exposure-limit purposes.
    pub fn is_bullion(&self) -> bool {
        matches!(self, HoldingType::Gold | HoldingType::Silver)
    }
}

/// A single recorded holding.
///
/// `last_updated` is kept as the raw string persisted by the data layer;
/// consumers that need a date use [`Holding::parsed_last_updated`], which
/// tolerates both plain ISO dates and RFC 3339 timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub platform: Option<String>,
    #[serde(rename = "type")]
    pub holding_type: HoldingType,
    #[serde(default)]
    pub quantity: Decimal,
    pub invested_amount: Decimal,
    pub current_value: Decimal,
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sector: Option<String>,
}

impl Holding {
    /// Absolute gain or loss over the invested amount.
    pub fn net_pl(&self) -> Decimal {
        self.current_value - self.invested_amount
    }

    /// Return on investment as a percentage (15 = +15%).
    ///
    /// Zero invested amount yields zero rather than a division error; the
    /// risk rules treat such holdings as having no momentum signal.
    pub fn roi_percent(&self) -> Decimal {
        if self.invested_amount.is_zero() {
            return Decimal::ZERO;
        }
        (self.current_value - self.invested_amount) / self.invested_amount * dec!(100)
    }

    /// Parses `last_updated` leniently: ISO date first, RFC 3339 second.
    /// Returns `None` for unparsable values so callers can skip the record.
    pub fn parsed_last_updated(&self) -> Option<NaiveDate> {
        if let Ok(date) = NaiveDate::parse_from_str(&self.last_updated, "%Y-%m-%d") {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(&self.last_updated)
            .ok()
            .map(|dt| dt.date_naive())
    }
}
