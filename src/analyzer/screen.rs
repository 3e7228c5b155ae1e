//! Stand-alone acquisition screen: cost rollup plus the 70% rule

use crate::acquisition::{
    roll_up, AcquisitionCosts, AcquisitionInputs, PriceGap, SeventyRuleEvaluator, SeventyRuleResult,
};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::units::Money;
use crate::validation::{validate_acquisition, Advisory};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionAnalysis {
    pub costs: AcquisitionCosts,
    pub seventy_rule: SeventyRuleResult,
    pub advisories: Vec<Advisory>,
}

/// Roll up acquisition costs and screen them against ARV
pub fn analyze_acquisition(
    arv: Money,
    inputs: &AcquisitionInputs,
    config: &AnalysisConfig,
) -> Result<AcquisitionAnalysis> {
    let mut advisories = validate_acquisition(arv, inputs, &config.advisories)?;

    let costs = roll_up(inputs);
    let seventy_rule = SeventyRuleEvaluator::new(config.seventy_rule_threshold).evaluate(arv, &costs)?;
    seventy_rule_advisories(&seventy_rule, &mut advisories);

    debug!(
        "Acquisition screen: total {:.2}, all-in {:.2}% of ARV, passes={}",
        costs.total_purchase_costs, seventy_rule.all_in_percent, seventy_rule.passes
    );

    Ok(AcquisitionAnalysis {
        costs,
        seventy_rule,
        advisories,
    })
}

pub(super) fn seventy_rule_advisories(result: &SeventyRuleResult, advisories: &mut Vec<Advisory>) {
    if !result.passes {
        advisories.push(Advisory::new(
            "purchase_price",
            format!(
                "all-in cost is {:.2}% of ARV, above the {:.0}% rule",
                result.all_in_percent,
                result.threshold.as_percent()
            ),
        ));
    }
    if result.price_gap == PriceGap::NoPriceSatisfies {
        advisories.push(Advisory::new(
            "arv",
            "non-price costs alone exceed the rule; no purchase price can satisfy it",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::AcquisitionFees;
    use crate::units::Rate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_failing_screen_is_advised_not_rejected() {
        let inputs = AcquisitionInputs {
            purchase_price: dec!(250000),
            rehab_cost: dec!(20000),
            rehab_utilities_cost: Decimal::ZERO,
            fees: AcquisitionFees {
                origination_points: Rate::from_percent(dec!(1)),
                ..Default::default()
            },
        };
        let analysis = analyze_acquisition(dec!(300000), &inputs, &AnalysisConfig::default()).unwrap();
        assert!(!analysis.seventy_rule.passes);
        assert_eq!(analysis.advisories.len(), 1);
        assert_eq!(analysis.advisories[0].field, "purchase_price");
    }

    #[test]
    fn test_unreachable_rule_is_flagged() {
        let inputs = AcquisitionInputs {
            purchase_price: dec!(10000),
            rehab_cost: dec!(90000),
            ..Default::default()
        };
        let analysis = analyze_acquisition(dec!(100000), &inputs, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.seventy_rule.max_allowed_purchase_price, dec!(-20000));
        assert_eq!(analysis.seventy_rule.price_gap, PriceGap::NoPriceSatisfies);
        assert!(analysis.advisories.iter().any(|a| a.field == "arv"));
    }
}
