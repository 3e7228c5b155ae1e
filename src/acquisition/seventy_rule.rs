//! The 70% rule: all-in acquisition cost should not exceed 70% of ARV
//!
//! Besides the pass/fail check this solves the inverse problem, the highest
//! purchase price that keeps the deal at the threshold while every
//! non-price cost stays fixed:
//!
//! ```text
//! total(P) = P * (1 + r) + C        r = price-proportional fee rate
//! total(P) = t * ARV      =>  P = (t * ARV - C) / (1 + r)
//! ```

use super::costs::AcquisitionCosts;
use crate::error::{DealError, Result};
use crate::units::{Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Round-off allowance on the pass/fail comparison
const RATIO_TOLERANCE: Decimal = dec!(0.000000001);

/// How far the offer is from the threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceGap {
    /// Cut the purchase price by this many dollars (may be zero)
    Reduce(Money),
    /// The current price already clears the rule
    AlreadyCompliant,
    /// Non-price costs alone exceed the ceiling; no purchase price passes
    NoPriceSatisfies,
}

impl PriceGap {
    /// Wire representation: the amount, or -1 when already compliant.
    /// When no price can pass, the whole offer has to go.
    pub fn to_wire(self, purchase_price: Money) -> Money {
        match self {
            PriceGap::Reduce(amount) => amount,
            PriceGap::AlreadyCompliant => Decimal::NEGATIVE_ONE,
            PriceGap::NoPriceSatisfies => purchase_price,
        }
    }
}

/// Outcome of the 70% rule check
#[derive(Debug, Clone, PartialEq)]
pub struct SeventyRuleResult {
    /// Total purchase costs as a percentage (0-100) of ARV
    pub all_in_percent: Decimal,
    pub passes: bool,
    /// Zero or negative when [`PriceGap::NoPriceSatisfies`]
    pub max_allowed_purchase_price: Money,
    pub price_gap: PriceGap,
    pub threshold: Rate,
}

/// Evaluates the all-in cost ceiling against ARV
#[derive(Debug, Clone, Copy)]
pub struct SeventyRuleEvaluator {
    threshold: Rate,
}

impl SeventyRuleEvaluator {
    pub fn new(threshold: Rate) -> Self {
        Self { threshold }
    }

    pub fn evaluate(&self, arv: Money, costs: &AcquisitionCosts) -> Result<SeventyRuleResult> {
        if arv <= Decimal::ZERO {
            return Err(DealError::invalid("arv", "must be greater than 0"));
        }

        let ratio = costs.total_purchase_costs / arv;
        let passes = ratio <= self.threshold.fraction() + RATIO_TOLERANCE;

        let max_allowed_purchase_price = (self.threshold.of(arv) - costs.non_proportional_costs())
            / (Decimal::ONE + costs.price_proportional_rate.fraction());

        let difference = costs.purchase_price - max_allowed_purchase_price;
        let price_gap = if max_allowed_purchase_price <= Decimal::ZERO {
            PriceGap::NoPriceSatisfies
        } else if difference >= Decimal::ZERO {
            PriceGap::Reduce(difference)
        } else {
            PriceGap::AlreadyCompliant
        };

        Ok(SeventyRuleResult {
            all_in_percent: ratio * dec!(100),
            passes,
            max_allowed_purchase_price,
            price_gap,
            threshold: self.threshold,
        })
    }
}

impl Default for SeventyRuleEvaluator {
    fn default() -> Self {
        Self::new(Rate::from_fraction(crate::config::DEFAULT_SEVENTY_RULE_THRESHOLD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::costs::{roll_up, AcquisitionFees, AcquisitionInputs};

    fn inputs(purchase_price: Money, rehab_cost: Money) -> AcquisitionInputs {
        AcquisitionInputs {
            purchase_price,
            rehab_cost,
            rehab_utilities_cost: Decimal::ZERO,
            fees: AcquisitionFees {
                origination_points: Rate::from_percent(dec!(1)),
                title_fees: dec!(5000),
                ..Default::default()
            },
        }
    }

    fn approx_eq(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        let diff = if a > b { a - b } else { b - a };
        diff < tol
    }

    #[test]
    fn test_scenario_a_passes() {
        // 180k price, 15k of rehab and fees, 1% points on a 300k ARV
        let costs = roll_up(&inputs(dec!(180000), dec!(10000)));
        let result = SeventyRuleEvaluator::default().evaluate(dec!(300000), &costs).unwrap();

        assert_eq!(costs.total_purchase_costs, dec!(196800));
        assert_eq!(result.all_in_percent, dec!(65.6));
        assert!(result.passes);
        assert_eq!(result.price_gap, PriceGap::AlreadyCompliant);
        assert_eq!(result.price_gap.to_wire(dec!(180000)), dec!(-1));
    }

    #[test]
    fn test_max_allowed_price_solves_inverse() {
        let costs = roll_up(&inputs(dec!(180000), dec!(10000)));
        let result = SeventyRuleEvaluator::default().evaluate(dec!(300000), &costs).unwrap();
        // (210,000 - 15,000) / 1.01
        assert!(approx_eq(
            result.max_allowed_purchase_price,
            dec!(193069.306930693),
            dec!(0.000001)
        ));

        // Buying at exactly the max lands on 70.00% and passes
        let at_max = roll_up(&inputs(result.max_allowed_purchase_price, dec!(10000)));
        let check = SeventyRuleEvaluator::default().evaluate(dec!(300000), &at_max).unwrap();
        assert!(approx_eq(check.all_in_percent, dec!(70), dec!(0.000000001)));
        assert!(check.passes);
    }

    #[test]
    fn test_failing_deal_reports_required_cut() {
        let costs = roll_up(&inputs(dec!(220000), dec!(30000)));
        let result = SeventyRuleEvaluator::default().evaluate(dec!(300000), &costs).unwrap();
        assert!(!result.passes);
        match result.price_gap {
            PriceGap::Reduce(cut) => {
                assert_eq!(cut, dec!(220000) - result.max_allowed_purchase_price);
                assert!(cut > Decimal::ZERO);
            }
            other => panic!("expected a required price cut, got {:?}", other),
        }
    }

    #[test]
    fn test_costs_above_ceiling_leave_no_price() {
        // 95k of rehab and fees against a 70k ceiling
        let costs = roll_up(&inputs(dec!(10000), dec!(90000)));
        let result = SeventyRuleEvaluator::default().evaluate(dec!(100000), &costs).unwrap();
        assert!(!result.passes);
        assert!(result.max_allowed_purchase_price < Decimal::ZERO);
        assert_eq!(result.price_gap, PriceGap::NoPriceSatisfies);
        // Never more than the offer itself
        assert_eq!(result.price_gap.to_wire(dec!(10000)), dec!(10000));
    }

    #[test]
    fn test_rehab_increase_never_turns_fail_into_pass() {
        let evaluator = SeventyRuleEvaluator::default();
        let mut passed_before = true;
        for step in 0..40u32 {
            let costs = roll_up(&inputs(dec!(170000), Decimal::from(step) * dec!(2000)));
            let passes = evaluator.evaluate(dec!(300000), &costs).unwrap().passes;
            assert!(passed_before || !passes, "flipped to pass at step {}", step);
            passed_before = passes;
        }
        assert!(!passed_before);
    }

    #[test]
    fn test_non_positive_arv_is_invalid() {
        let costs = roll_up(&inputs(dec!(180000), Decimal::ZERO));
        let err = SeventyRuleEvaluator::default().evaluate(Decimal::ZERO, &costs).unwrap_err();
        assert_eq!(err.violations()[0].field, "arv");
        assert!(SeventyRuleEvaluator::default().evaluate(dec!(-1), &costs).is_err());
    }

    #[test]
    fn test_custom_threshold() {
        let costs = roll_up(&inputs(dec!(180000), dec!(10000)));
        let strict = SeventyRuleEvaluator::new(Rate::from_percent(dec!(65)));
        let result = strict.evaluate(dec!(300000), &costs).unwrap();
        assert!(!result.passes);
    }
}
