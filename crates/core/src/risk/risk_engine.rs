use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use super::{
    ContextUpdate, HoldingVerdict, MarketContext, MarketScenario, PortfolioVerdict, RiskLevel,
    RiskProfile, RiskStatus,
};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::holdings::{Holding, HoldingType};
use crate::settings::RiskSettings;

/// VIX level above which `adapt_to_market` forces high-volatility posture.
const VIX_HIGH_VOLATILITY: Decimal = dec!(30);
/// ROI above which a volatile holding in a stressed scenario is a flash rally.
const FLASH_RALLY_ROI: Decimal = dec!(15);
/// Single-holding share of the portfolio that triggers the concentration trap.
const CONCENTRATION_LIMIT: Decimal = dec!(25);
/// Sector share of the portfolio that triggers sector overload.
const SECTOR_OVERLOAD_LIMIT: Decimal = dec!(40);

/// Rule-based risk engine.
///
/// The engine is an explicit, caller-owned value: construct one per session
/// (or per evaluation batch), feed it market context, then evaluate. There
/// is no process-global state, so callers that parallelize evaluations just
/// need to finish context updates before sharing a reference to the batch.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    settings: RiskSettings,
    context: MarketContext,
    profile: RiskProfile,
}

impl RiskEngine {
    /// Creates an engine with NORMAL context and thresholds taken from the
    /// user's settings.
    pub fn new(settings: &RiskSettings) -> Self {
        Self {
            settings: settings.clone(),
            context: MarketContext::default(),
            profile: RiskProfile::from_settings(settings),
        }
    }

    pub fn context(&self) -> &MarketContext {
        &self.context
    }

    pub fn profile(&self) -> &RiskProfile {
        &self.profile
    }

    /// Applies a partial context update and re-derives the threshold profile.
    ///
    /// The profile is always rebuilt from the settings baseline, so leaving a
    /// stressed scenario also clears its overrides.
    pub fn set_context(&mut self, update: ContextUpdate) {
        if let Some(scenario) = update.scenario {
            self.context.scenario = scenario;
        }
        if let Some(vix) = update.volatility_index {
            self.context.volatility_index = vix;
        }
        if let Some(ratio) = update.commodity_ratio {
            self.context.commodity_ratio = ratio;
        }

        self.profile = RiskProfile::from_settings(&self.settings);
        match self.context.scenario {
            MarketScenario::SilverCrash => {
                self.profile.bubble_limit_percent = dec!(10);
                self.profile.bullion_cap_percent = dec!(25);
            }
            MarketScenario::HighVolatility => {
                self.profile.profit_booking_threshold_percent = dec!(15);
            }
            // No threshold policy exists yet for the remaining scenarios;
            // they run on settings defaults.
            MarketScenario::Normal
            | MarketScenario::GoldRally
            | MarketScenario::CryptoWinter
            | MarketScenario::BullRun => {}
        }

        debug!(
            "Context set to {:?}, profile now {:?}",
            self.context.scenario, self.profile
        );
    }

    /// Reacts to a live volatility reading: a VIX above 30 forces the
    /// high-volatility posture with a 50% bullion cap; anything else resets
    /// scenario and thresholds to their defaults.
    pub fn adapt_to_market(&mut self, vix: Decimal) {
        if vix > VIX_HIGH_VOLATILITY {
            self.set_context(ContextUpdate {
                scenario: Some(MarketScenario::HighVolatility),
                volatility_index: Some(vix),
                commodity_ratio: None,
            });
            self.profile.bullion_cap_percent = dec!(50);
        } else {
            self.set_context(ContextUpdate {
                scenario: Some(MarketScenario::Normal),
                volatility_index: Some(vix),
                commodity_ratio: None,
            });
        }
    }

    /// Estimated beta versus a broad market benchmark.
    ///
    /// Stocks are differentiated by sector; everything else is a flat
    /// per-category figure.
    pub fn estimated_beta(holding: &Holding) -> Decimal {
        match holding.holding_type {
            HoldingType::Cash | HoldingType::FixedDeposit => Decimal::ZERO,
            HoldingType::Gold => dec!(0.2),
            HoldingType::Silver => dec!(1.2),
            HoldingType::Crypto => dec!(2.5),
            HoldingType::MutualFund => dec!(0.9),
            HoldingType::RealEstate => dec!(0.3),
            HoldingType::Stock => {
                let sector = holding.sector.as_deref().unwrap_or("").to_lowercase();
                if sector.contains("tech") || sector.contains("small") {
                    dec!(1.5)
                } else if sector.contains("fmcg")
                    || sector.contains("pharma")
                    || sector.contains("utilit")
                    || sector.contains("staple")
                {
                    dec!(0.7)
                } else {
                    dec!(1.1)
                }
            }
        }
    }

    /// Evaluates one holding against the fixed-priority rule list.
    ///
    /// Rules run in a fixed order and a later match *overwrites* the verdict
    /// of an earlier one; it never combines with it. The ordering is
    /// deliberate: structural checks (concentration, sector weight, beta)
    /// come after momentum checks so that portfolio-structure risk outranks
    /// single-asset momentum risk. Do not replace this with a max-severity
    /// aggregation; the output would silently change.
    pub fn evaluate_holding(
        &self,
        holding: &Holding,
        portfolio_total: Decimal,
        sector_allocations: &HashMap<String, Decimal>,
    ) -> HoldingVerdict {
        let roi = holding.roi_percent();
        let scenario = self.context.scenario;
        let beta = Self::estimated_beta(holding);

        let allocation_percent = if portfolio_total > Decimal::ZERO {
            holding.current_value / portfolio_total * dec!(100)
        } else {
            Decimal::ZERO
        };
        let sector_percent = holding
            .sector
            .as_ref()
            .and_then(|s| sector_allocations.get(s))
            .copied()
            .unwrap_or(Decimal::ZERO);

        let mut status = RiskStatus::Safe;
        let mut issue = "No issues".to_string();
        let mut action = "Hold".to_string();
        let mut concentration_flagged = false;

        // 1. Flash rally: a sharp run-up on a volatile asset while the
        //    market itself is stressed.
        let stressed = matches!(
            scenario,
            MarketScenario::HighVolatility | MarketScenario::SilverCrash | MarketScenario::GoldRally
        );
        if holding.holding_type.is_volatile() && roi > FLASH_RALLY_ROI && stressed {
            status = RiskStatus::Warning;
            issue = "Flash rally".to_string();
            action = format!(
                "Book partial profits above {}% gain",
                self.profile.profit_booking_threshold_percent
            );
        }

        // 2. Falling knife: silver dropping through the crash.
        if scenario == MarketScenario::SilverCrash
            && holding.holding_type == HoldingType::Silver
            && roi < dec!(-8)
        {
            status = RiskStatus::Critical;
            issue = "Falling knife".to_string();
            action = if roi < dec!(-15) {
                "Exit (stop-loss breached)".to_string()
            } else {
                "HOLD".to_string()
            };
        }

        // 3. Concentration trap.
        if allocation_percent > CONCENTRATION_LIMIT {
            status = RiskStatus::Critical;
            issue = "Concentration trap".to_string();
            action = format!(
                "Trim position below {}% of portfolio",
                CONCENTRATION_LIMIT
            );
            concentration_flagged = true;
        }

        // 4. Free ride: principal fully recovered. Skipped for concentrated
        //    positions; the structural flag stands.
        if roi > dec!(100) && !concentration_flagged {
            status = RiskStatus::Safe;
            issue = "Free ride".to_string();
            action = "Harvest principal, let profits run".to_string();
        }

        // 5. Slow bleed in a calm market.
        if roi < dec!(-10) && scenario == MarketScenario::Normal {
            status = RiskStatus::Warning;
            issue = "Slow bleed".to_string();
            action = "Review thesis; plan a staged exit".to_string();
        }

        // 6. Dead cat bounce: deep loss while the rest of the market runs.
        if roi < dec!(-30)
            && matches!(
                scenario,
                MarketScenario::GoldRally | MarketScenario::BullRun
            )
        {
            status = RiskStatus::Warning;
            issue = "Dead cat bounce".to_string();
            action = "Do not average down".to_string();
        }

        // 7. Sector overload. Always runs; overrides anything above.
        if sector_percent > SECTOR_OVERLOAD_LIMIT {
            status = RiskStatus::Critical;
            issue = "Sector overload".to_string();
            action = format!(
                "Rebalance out of {}",
                holding.sector.as_deref().unwrap_or("this sector")
            );
        }

        // 8. High beta hazard under volatility. Always runs.
        if scenario == MarketScenario::HighVolatility && beta > dec!(1.5) {
            status = RiskStatus::Warning;
            issue = "High beta hazard".to_string();
            action = "Reduce high-beta exposure".to_string();
        }

        // 9. Blue-chip stagnation during a bull run. Always runs.
        if scenario == MarketScenario::BullRun
            && roi > dec!(-5)
            && roi < dec!(2)
            && beta > dec!(0.8)
        {
            status = RiskStatus::Warning;
            issue = "Blue-chip stagnation".to_string();
            action = "Rotate into market leaders".to_string();
        }

        // 10. Liquidity check for cash reserves.
        if holding.holding_type == HoldingType::Cash {
            if allocation_percent < dec!(5) {
                status = RiskStatus::Critical;
                issue = "Low reserves".to_string();
                action = "Top up emergency reserve".to_string();
            } else {
                status = RiskStatus::Safe;
                issue = "Dry powder".to_string();
                action = "Deploy on corrections".to_string();
            }
        }

        // 11. Weak rally in a crash: positive silver drift below the
        //     profit-booking threshold is distrusted while the crash lasts.
        //     Reached last, so it overrides even falling-knife/free-ride.
        if scenario == MarketScenario::SilverCrash
            && holding.holding_type == HoldingType::Silver
            && roi > Decimal::ZERO
            && roi < self.profile.profit_booking_threshold_percent
        {
            status = RiskStatus::Warning;
            issue = "Weak rally in crash".to_string();
            action = "Sell into strength".to_string();
        }

        HoldingVerdict {
            holding_id: holding.id.clone(),
            status,
            issue,
            action,
        }
    }

    /// Aggregates exposure ratios into a holistic portfolio verdict.
    pub fn generate_verdict(
        &self,
        holdings: &[Holding],
        total_net_worth: Decimal,
    ) -> PortfolioVerdict {
        if total_net_worth <= Decimal::ZERO {
            return PortfolioVerdict {
                score: dec!(100),
                level: RiskLevel::Safe,
                title: "Nothing to assess".to_string(),
                narrative: "No portfolio value recorded yet.".to_string(),
                action_plan: Vec::new(),
            };
        }

        let silver_value: Decimal = holdings
            .iter()
            .filter(|h| h.holding_type == HoldingType::Silver)
            .map(|h| h.current_value)
            .sum();
        let bullion_value: Decimal = holdings
            .iter()
            .filter(|h| h.holding_type.is_bullion())
            .map(|h| h.current_value)
            .sum();

        let silver_percent = silver_value / total_net_worth * dec!(100);
        let bullion_percent = bullion_value / total_net_worth * dec!(100);

        let mut score = dec!(90);
        let mut level = RiskLevel::Safe;
        let mut title = "Portfolio healthy".to_string();
        let mut narrative = "No structural risk flags at current exposures.".to_string();
        let mut action_plan: Vec<String> = Vec::new();

        if self.context.scenario == MarketScenario::SilverCrash {
            if silver_percent > dec!(20) {
                score -= dec!(40);
                level = RiskLevel::KillSwitch;
                title = "Silver exposure kill switch".to_string();
                narrative = format!(
                    "Silver is {}% of the portfolio during a silver crash; losses can cascade.",
                    silver_percent.round_dp(DISPLAY_DECIMAL_PRECISION)
                );
                action_plan = vec![
                    "Halt all silver SIPs immediately".to_string(),
                    "Sell silver down to 15% of the portfolio".to_string(),
                    "Hedge proceeds into fixed income or gold".to_string(),
                ];
            } else if silver_percent >= dec!(10) {
                score -= dec!(20);
                level = RiskLevel::Caution;
                title = "Elevated silver exposure".to_string();
                narrative = format!(
                    "Silver is {}% of the portfolio while the crash plays out.",
                    silver_percent.round_dp(DISPLAY_DECIMAL_PRECISION)
                );
                action_plan = vec![
                    "Hold current silver positions".to_string(),
                    "Set a stop-loss on silver holdings".to_string(),
                ];
            }
        }

        // Bullion cap check runs independently of the silver tiers, but a
        // kill switch is already terminal.
        if bullion_percent > self.profile.bullion_cap_percent && level != RiskLevel::KillSwitch {
            score -= dec!(20);
            level = if level == RiskLevel::Safe {
                RiskLevel::Caution
            } else {
                RiskLevel::Critical
            };
            if title == "Portfolio healthy" {
                title = "Bullion over cap".to_string();
            }
            narrative = format!(
                "{} Combined bullion is {}%, above the {}% cap.",
                narrative,
                bullion_percent.round_dp(DISPLAY_DECIMAL_PRECISION),
                self.profile.bullion_cap_percent
            );
            action_plan.push(format!(
                "Rebalance bullion below {}% of the portfolio",
                self.profile.bullion_cap_percent
            ));
        }

        PortfolioVerdict {
            score: score.clamp(Decimal::ZERO, dec!(100)),
            level,
            title,
            narrative,
            action_plan,
        }
    }
}
