//! Unit tests for the risk engine: context transitions, rule priority and
//! portfolio verdicts.

use super::*;
use crate::holdings::{Holding, HoldingType};
use crate::settings::RiskSettings;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn engine() -> RiskEngine {
    RiskEngine::new(&RiskSettings::default())
}

fn holding(holding_type: HoldingType, invested: Decimal, current: Decimal) -> Holding {
    Holding {
        id: "h1".to_string(),
        name: "Test holding".to_string(),
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

fn no_sectors() -> HashMap<String, Decimal> {
    HashMap::new()
}

fn set_scenario(engine: &mut RiskEngine, scenario: MarketScenario) {
    engine.set_context(ContextUpdate {
        scenario: Some(scenario),
        ..Default::default()
    });
}

// === Context state machine ===

#[test]
fn new_engine_starts_normal_with_settings_thresholds() {
    let e = engine();
    assert_eq!(e.context().scenario, MarketScenario::Normal);
    assert_eq!(e.profile().bullion_cap_percent, dec!(40));
    assert_eq!(e.profile().profit_booking_threshold_percent, dec!(20));
    assert_eq!(e.profile().bubble_limit_percent, dec!(90));
}

#[test]
fn silver_crash_tightens_bubble_and_bullion_limits() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);
    assert_eq!(e.profile().bubble_limit_percent, dec!(10));
    assert_eq!(e.profile().bullion_cap_percent, dec!(25));

    // Leaving the scenario clears the overrides.
    set_scenario(&mut e, MarketScenario::Normal);
    assert_eq!(e.profile().bubble_limit_percent, dec!(90));
    assert_eq!(e.profile().bullion_cap_percent, dec!(40));
}

#[test]
fn high_volatility_tightens_profit_booking() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::HighVolatility);
    assert_eq!(e.profile().profit_booking_threshold_percent, dec!(15));
}

#[test]
fn unpoliced_scenarios_keep_default_thresholds() {
    for scenario in [
        MarketScenario::GoldRally,
        MarketScenario::CryptoWinter,
        MarketScenario::BullRun,
    ] {
        let mut e = engine();
        set_scenario(&mut e, scenario);
        assert_eq!(e.profile(), &RiskProfile::from_settings(&RiskSettings::default()));
    }
}

#[test]
fn adapt_to_market_high_vix_forces_posture() {
    let mut e = engine();
    e.adapt_to_market(dec!(35));
    assert_eq!(e.context().scenario, MarketScenario::HighVolatility);
    assert_eq!(e.context().volatility_index, dec!(35));
    assert_eq!(e.profile().bullion_cap_percent, dec!(50));

    e.adapt_to_market(dec!(18));
    assert_eq!(e.context().scenario, MarketScenario::Normal);
    assert_eq!(e.profile().bullion_cap_percent, dec!(40));
}

#[test]
fn partial_update_preserves_other_fields() {
    let mut e = engine();
    e.set_context(ContextUpdate {
        commodity_ratio: Some(dec!(92)),
        ..Default::default()
    });
    assert_eq!(e.context().scenario, MarketScenario::Normal);
    assert_eq!(e.context().commodity_ratio, dec!(92));
}

// === Per-holding rule evaluation ===

#[test]
fn concentration_trap_overrides_free_ride() {
    let e = engine();
    // 30% of the portfolio AND ROI > 100%: rule order decides, and the
    // free-ride rule explicitly skips concentration-flagged holdings.
    let h = holding(HoldingType::Stock, dec!(100000), dec!(300000));
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Critical);
    assert_eq!(verdict.issue, "Concentration trap");
}

#[test]
fn free_ride_without_concentration_is_safe_harvest() {
    let e = engine();
    let h = holding(HoldingType::Stock, dec!(10000), dec!(25000));
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Safe);
    assert_eq!(verdict.issue, "Free ride");
}

#[test]
fn silver_weak_rally_depends_on_scenario() {
    // +12% silver: clean under NORMAL, distrusted during the crash.
    let h = holding(HoldingType::Silver, dec!(100000), dec!(112000));

    let e = engine();
    let normal = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(normal.status, RiskStatus::Safe);
    assert_eq!(normal.issue, "No issues");

    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);
    let crash = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(crash.status, RiskStatus::Warning);
    assert_eq!(crash.issue, "Weak rally in crash");
}

#[test]
fn weak_rally_overrides_flash_rally_when_reached_last() {
    // +18% silver during the crash: flash rally fires first, weak rally
    // (below the 20% booking threshold) overwrites it.
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);
    let h = holding(HoldingType::Silver, dec!(100000), dec!(118000));
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Warning);
    assert_eq!(verdict.issue, "Weak rally in crash");
}

#[test]
fn falling_knife_hold_vs_stop_loss() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);

    let shallow = holding(HoldingType::Silver, dec!(100000), dec!(90000)); // -10%
    let verdict = e.evaluate_holding(&shallow, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Critical);
    assert_eq!(verdict.issue, "Falling knife");
    assert_eq!(verdict.action, "HOLD");

    let deep = holding(HoldingType::Silver, dec!(100000), dec!(80000)); // -20%
    let verdict = e.evaluate_holding(&deep, dec!(1000000), &no_sectors());
    assert_eq!(verdict.action, "Exit (stop-loss breached)");
}

#[test]
fn flash_rally_on_volatile_asset_in_stressed_market() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::HighVolatility);
    let h = holding(HoldingType::Stock, dec!(100000), dec!(120000)); // +20%
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Warning);
    assert_eq!(verdict.issue, "Flash rally");
}

#[test]
fn slow_bleed_only_in_normal_scenario() {
    let e = engine();
    let h = holding(HoldingType::MutualFund, dec!(100000), dec!(88000)); // -12%
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.issue, "Slow bleed");

    let mut e = engine();
    set_scenario(&mut e, MarketScenario::CryptoWinter);
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.issue, "No issues");
}

#[test]
fn dead_cat_bounce_during_rallies() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::BullRun);
    let h = holding(HoldingType::Stock, dec!(100000), dec!(60000)); // -40%
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.issue, "Dead cat bounce");
}

#[test]
fn sector_overload_overrides_momentum_rules() {
    let e = engine();
    let mut h = holding(HoldingType::Stock, dec!(10000), dec!(25000)); // free ride
    h.sector = Some("Tech".to_string());
    let mut sectors = HashMap::new();
    sectors.insert("Tech".to_string(), dec!(45));

    let verdict = e.evaluate_holding(&h, dec!(1000000), &sectors);
    assert_eq!(verdict.status, RiskStatus::Critical);
    assert_eq!(verdict.issue, "Sector overload");
}

#[test]
fn high_beta_hazard_under_volatility() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::HighVolatility);
    let h = holding(HoldingType::Crypto, dec!(100000), dec!(105000));
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Warning);
    assert_eq!(verdict.issue, "High beta hazard");
}

#[test]
fn blue_chip_stagnation_in_bull_run() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::BullRun);
    let h = holding(HoldingType::Stock, dec!(100000), dec!(100500)); // +0.5%
    let verdict = e.evaluate_holding(&h, dec!(1000000), &no_sectors());
    assert_eq!(verdict.issue, "Blue-chip stagnation");
}

#[test]
fn cash_liquidity_rule() {
    let e = engine();

    let thin = holding(HoldingType::Cash, dec!(30000), dec!(30000)); // 3%
    let verdict = e.evaluate_holding(&thin, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Critical);
    assert_eq!(verdict.issue, "Low reserves");

    let healthy = holding(HoldingType::Cash, dec!(100000), dec!(100000)); // 10%
    let verdict = e.evaluate_holding(&healthy, dec!(1000000), &no_sectors());
    assert_eq!(verdict.status, RiskStatus::Safe);
    assert_eq!(verdict.issue, "Dry powder");
}

#[test]
fn beta_lookup_table() {
    let stock = |sector: &str| {
        let mut h = holding(HoldingType::Stock, dec!(1), dec!(1));
        h.sector = Some(sector.to_string());
        RiskEngine::estimated_beta(&h)
    };
    assert_eq!(stock("Technology"), dec!(1.5));
    assert_eq!(stock("Small Cap"), dec!(1.5));
    assert_eq!(stock("Pharma"), dec!(0.7));
    assert_eq!(stock("Banking"), dec!(1.1));

    assert_eq!(
        RiskEngine::estimated_beta(&holding(HoldingType::Cash, dec!(1), dec!(1))),
        Decimal::ZERO
    );
    assert_eq!(
        RiskEngine::estimated_beta(&holding(HoldingType::Crypto, dec!(1), dec!(1))),
        dec!(2.5)
    );
    assert_eq!(
        RiskEngine::estimated_beta(&holding(HoldingType::Silver, dec!(1), dec!(1))),
        dec!(1.2)
    );
}

// === Portfolio verdict ===

#[test]
fn silver_crash_kill_switch() {
    // 10,00,000 total with a 3,00,000 silver holding (30%) during the crash.
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);
    let holdings = vec![
        holding(HoldingType::Silver, dec!(250000), dec!(300000)),
        holding(HoldingType::Stock, dec!(600000), dec!(700000)),
    ];
    let verdict = e.generate_verdict(&holdings, dec!(1000000));

    assert_eq!(verdict.level, RiskLevel::KillSwitch);
    assert!(verdict.score <= dec!(50));
    assert!(verdict
        .action_plan
        .iter()
        .any(|step| step.to_lowercase().contains("halt")));
}

#[test]
fn silver_crash_caution_tier() {
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);
    let holdings = vec![
        holding(HoldingType::Silver, dec!(140000), dec!(150000)),
        holding(HoldingType::Stock, dec!(800000), dec!(850000)),
    ];
    let verdict = e.generate_verdict(&holdings, dec!(1000000));

    assert_eq!(verdict.level, RiskLevel::Caution);
    assert_eq!(verdict.score, dec!(70));
    assert!(verdict
        .action_plan
        .iter()
        .any(|step| step.to_lowercase().contains("stop-loss")));
}

#[test]
fn bullion_cap_escalates_caution_to_critical() {
    // 15% silver (caution tier) plus 15% gold pushes bullion to 30%, above
    // the crash-tightened 25% cap.
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);
    let holdings = vec![
        holding(HoldingType::Silver, dec!(140000), dec!(150000)),
        holding(HoldingType::Gold, dec!(140000), dec!(150000)),
        holding(HoldingType::Stock, dec!(650000), dec!(700000)),
    ];
    let verdict = e.generate_verdict(&holdings, dec!(1000000));

    assert_eq!(verdict.level, RiskLevel::Critical);
    assert_eq!(verdict.score, dec!(50));
    assert!(verdict
        .action_plan
        .iter()
        .any(|step| step.to_lowercase().contains("rebalance")));
}

#[test]
fn bullion_cap_alone_yields_caution() {
    let e = engine();
    let holdings = vec![
        holding(HoldingType::Gold, dec!(400000), dec!(500000)),
        holding(HoldingType::Stock, dec!(450000), dec!(500000)),
    ];
    let verdict = e.generate_verdict(&holdings, dec!(1000000));

    assert_eq!(verdict.level, RiskLevel::Caution);
    assert_eq!(verdict.score, dec!(70));
}

#[test]
fn kill_switch_is_terminal_for_bullion_check() {
    // 30% silver + 20% gold: kill switch fires, bullion check must not
    // stack another deduction.
    let mut e = engine();
    set_scenario(&mut e, MarketScenario::SilverCrash);
    let holdings = vec![
        holding(HoldingType::Silver, dec!(250000), dec!(300000)),
        holding(HoldingType::Gold, dec!(180000), dec!(200000)),
        holding(HoldingType::Stock, dec!(450000), dec!(500000)),
    ];
    let verdict = e.generate_verdict(&holdings, dec!(1000000));

    assert_eq!(verdict.level, RiskLevel::KillSwitch);
    assert_eq!(verdict.score, dec!(50));
}

#[test]
fn zero_net_worth_short_circuits() {
    let e = engine();
    let verdict = e.generate_verdict(&[], Decimal::ZERO);
    assert_eq!(verdict.level, RiskLevel::Safe);
    assert_eq!(verdict.score, dec!(100));
    assert!(verdict.action_plan.is_empty());
}
