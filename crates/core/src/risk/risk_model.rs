use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::settings::RiskSettings;

/// Named market-condition state that tunes risk thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketScenario {
    #[default]
    Normal,
    HighVolatility,
    SilverCrash,
    GoldRally,
    CryptoWinter,
    BullRun,
}

/// Live market state the rule evaluators read.
///
/// Mutated only through [`super::RiskEngine::set_context`] /
/// [`super::RiskEngine::adapt_to_market`], which also re-derive the
/// dependent [`RiskProfile`] thresholds. Never persisted; rebuilt from live
/// inputs each session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketContext {
    pub scenario: MarketScenario,
    pub volatility_index: Decimal,
    pub commodity_ratio: Decimal,
}

impl Default for MarketContext {
    fn default() -> Self {
        Self {
            scenario: MarketScenario::Normal,
            volatility_index: dec!(15),
            commodity_ratio: dec!(80),
        }
    }
}

/// Partial update applied to the market context. Absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUpdate {
    pub scenario: Option<MarketScenario>,
    pub volatility_index: Option<Decimal>,
    pub commodity_ratio: Option<Decimal>,
}

/// Working thresholds derived from [`RiskSettings`] and the current
/// scenario. Recomputed on every context update; not independently settable
/// once scenario overrides apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub bullion_cap_percent: Decimal,
    pub profit_booking_threshold_percent: Decimal,
    pub bubble_limit_percent: Decimal,
}

impl RiskProfile {
    pub fn from_settings(settings: &RiskSettings) -> Self {
        Self {
            bullion_cap_percent: settings.bullion_cap_percent,
            profit_booking_threshold_percent: settings.profit_booking_threshold_percent,
            bubble_limit_percent: settings.bubble_limit_percent,
        }
    }
}

/// Severity of a per-holding verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    Safe,
    Warning,
    Critical,
}

/// Result of evaluating one holding against the rule list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingVerdict {
    pub holding_id: String,
    pub status: RiskStatus,
    pub issue: String,
    pub action: String,
}

/// Severity of the whole-portfolio verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Safe,
    Caution,
    Critical,
    KillSwitch,
}

/// Holistic portfolio risk verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioVerdict {
    /// 0-100, higher is healthier.
    pub score: Decimal,
    pub level: RiskLevel,
    pub title: String,
    pub narrative: String,
    pub action_plan: Vec<String>,
}
