use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::KeyValueStoreTrait;
use crate::errors::Result;

/// Setting key for the bullion exposure cap.
pub const KEY_BULLION_CAP: &str = "risk.bullion_cap_percent";
/// Setting key for the profit-booking threshold.
pub const KEY_PROFIT_BOOKING: &str = "risk.profit_booking_threshold_percent";
/// Setting key for the bubble limit.
pub const KEY_BUBBLE_LIMIT: &str = "risk.bubble_limit_percent";

/// User-configurable baseline risk thresholds.
///
/// These are the *defaults* the risk engine derives its working profile
/// from; scenario transitions override individual fields at runtime without
/// touching the stored settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSettings {
    pub bullion_cap_percent: Decimal,
    pub profit_booking_threshold_percent: Decimal,
    pub bubble_limit_percent: Decimal,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            bullion_cap_percent: dec!(40),
            profit_booking_threshold_percent: dec!(20),
            bubble_limit_percent: dec!(90),
        }
    }
}

impl RiskSettings {
    /// Loads settings from the key-value store, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_kv(store: &dyn KeyValueStoreTrait) -> Result<Self> {
        let defaults = RiskSettings::default();

        let read = |key: &str, default: Decimal| -> Result<Decimal> {
            match store.get(key)? {
                Some(value) => Ok(value.parse().unwrap_or_else(|_| {
                    debug!("Unparsable value for setting '{}', using default", key);
                    default
                })),
                None => Ok(default),
            }
        };

        Ok(Self {
            bullion_cap_percent: read(KEY_BULLION_CAP, defaults.bullion_cap_percent)?,
            profit_booking_threshold_percent: read(
                KEY_PROFIT_BOOKING,
                defaults.profit_booking_threshold_percent,
            )?,
            bubble_limit_percent: read(KEY_BUBBLE_LIMIT, defaults.bubble_limit_percent)?,
        })
    }
}
