//! Analysis policy configuration
//!
//! Defaults match the conventional screening rules. Binaries may override
//! them from the environment (`AnalysisConfig::from_env`) and then from
//! command line flags.

use crate::units::Rate;
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

/// Default all-in cost ceiling as a fraction of ARV
pub const DEFAULT_SEVENTY_RULE_THRESHOLD: Decimal = dec!(0.70);

/// How equity build-up is measured for a BRRRR deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EquityPolicy {
    /// Equity captured the instant the refinance closes: ARV - new loan
    #[default]
    AtRefinance,
    /// Principal repaid on the refinance loan over its first 12 payments
    FirstYearPaydown,
}

impl FromStr for EquityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "at_refinance" | "refinance" | "instant" => Ok(EquityPolicy::AtRefinance),
            "first_year_paydown" | "paydown" => Ok(EquityPolicy::FirstYearPaydown),
            other => Err(format!("Unknown equity policy: {}", other)),
        }
    }
}

/// Thresholds for soft (advisory) checks
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryThresholds {
    /// Vacancy above this is flagged
    pub max_vacancy: Rate,
    /// Management fee above this is flagged
    pub max_management_fee: Rate,
    /// Refinance interest rate above this is flagged
    pub max_refinance_rate: Rate,
    /// HML interest rate above this is flagged
    pub max_hml_rate: Rate,
    /// Refinance LTV above this is flagged
    pub max_ltv: Rate,
    /// DSCR below this is flagged
    pub min_dscr: f64,
}

impl Default for AdvisoryThresholds {
    fn default() -> Self {
        Self {
            max_vacancy: Rate::from_percent(dec!(50)),
            max_management_fee: Rate::from_percent(dec!(20)),
            max_refinance_rate: Rate::from_percent(dec!(15)),
            max_hml_rate: Rate::from_percent(dec!(25)),
            max_ltv: Rate::from_percent(dec!(85)),
            min_dscr: 1.0,
        }
    }
}

/// Policy knobs shared by every analysis call
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// All-in cost ceiling as a fraction of ARV (0.70 for the 70% rule)
    pub seventy_rule_threshold: Rate,
    pub equity_policy: EquityPolicy,
    pub advisories: AdvisoryThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seventy_rule_threshold: Rate::from_fraction(DEFAULT_SEVENTY_RULE_THRESHOLD),
            equity_policy: EquityPolicy::default(),
            advisories: AdvisoryThresholds::default(),
        }
    }
}

impl AnalysisConfig {
    /// Build from defaults overridden by environment variables:
    ///   DEAL_SEVENTY_RULE_PERCENT, DEAL_EQUITY_POLICY,
    ///   DEAL_MAX_VACANCY_PERCENT, DEAL_MIN_DSCR
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(pct) = env_parse::<Decimal>("DEAL_SEVENTY_RULE_PERCENT") {
            config.seventy_rule_threshold = Rate::from_percent(pct);
        }
        if let Some(policy) = env_parse::<EquityPolicy>("DEAL_EQUITY_POLICY") {
            config.equity_policy = policy;
        }
        if let Some(pct) = env_parse::<Decimal>("DEAL_MAX_VACANCY_PERCENT") {
            config.advisories.max_vacancy = Rate::from_percent(pct);
        }
        if let Some(dscr) = env_parse::<f64>("DEAL_MIN_DSCR") {
            config.advisories.min_dscr = dscr;
        }

        config
    }
}

fn env_parse<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
