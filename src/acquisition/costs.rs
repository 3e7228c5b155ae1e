//! One-time purchase-side cost rollup

use crate::units::{Money, Rate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Transfer tax (doc stamps) applied when a deal is flagged as taxable
pub const DEFAULT_TRANSFER_TAX_RATE: Decimal = dec!(0.007);

/// Named one-time acquisition fees
///
/// Dollar fees are flat amounts. `origination_points` and
/// `transfer_tax_rate` scale with the purchase price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionFees {
    pub origination_points: Rate,
    pub transfer_tax_rate: Rate,

    pub title_fees: Money,
    pub attorney_fees: Money,
    pub recording_fees: Money,
    pub transfer_taxes: Money,
    pub lender_underwriting_fees: Money,
    pub title_insurance: Money,
    pub survey_cost: Money,
    pub inspection_costs: Money,

    // Hard money lender fees
    pub hml_underwriting_fee: Money,
    pub hml_processing_fee: Money,
    pub hml_appraisal_fee: Money,
    pub draw_setup_fee: Money,

    pub builders_risk_insurance: Money,
    /// Lump-sum closing costs not broken out above
    pub other_closing_costs: Money,
}

impl AcquisitionFees {
    /// Typical fee schedule used as a starting point for a new deal
    pub fn typical() -> Self {
        Self {
            origination_points: Rate::from_percent(dec!(3)),
            title_fees: dec!(1200),
            title_insurance: dec!(1200),
            recording_fees: dec!(150),
            lender_underwriting_fees: dec!(600),
            inspection_costs: dec!(400),
            hml_appraisal_fee: dec!(500),
            draw_setup_fee: dec!(350),
            ..Default::default()
        }
    }

    /// Sum of all flat dollar fees
    pub fn fixed_total(&self) -> Money {
        self.title_fees
            + self.attorney_fees
            + self.recording_fees
            + self.transfer_taxes
            + self.lender_underwriting_fees
            + self.title_insurance
            + self.survey_cost
            + self.inspection_costs
            + self.hml_underwriting_fee
            + self.hml_processing_fee
            + self.hml_appraisal_fee
            + self.draw_setup_fee
            + self.builders_risk_insurance
            + self.other_closing_costs
    }

    /// Combined rate charged on the purchase price
    pub fn price_proportional_rate(&self) -> Rate {
        self.origination_points + self.transfer_tax_rate
    }

    /// Flat fees paired with their field names, for validation
    pub fn named_amounts(&self) -> [(&'static str, Money); 14] {
        [
            ("title_fees", self.title_fees),
            ("attorney_fees", self.attorney_fees),
            ("recording_fees", self.recording_fees),
            ("transfer_taxes", self.transfer_taxes),
            ("lender_underwriting_fees", self.lender_underwriting_fees),
            ("title_insurance", self.title_insurance),
            ("survey_cost", self.survey_cost),
            ("inspection_costs", self.inspection_costs),
            ("hml_underwriting_fee", self.hml_underwriting_fee),
            ("hml_processing_fee", self.hml_processing_fee),
            ("hml_appraisal_fee", self.hml_appraisal_fee),
            ("draw_setup_fee", self.draw_setup_fee),
            ("builders_risk_insurance_cost", self.builders_risk_insurance),
            ("closing_costs_buy", self.other_closing_costs),
        ]
    }
}

/// Inputs to the acquisition rollup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquisitionInputs {
    pub purchase_price: Money,
    pub rehab_cost: Money,
    pub rehab_utilities_cost: Money,
    pub fees: AcquisitionFees,
}

/// Rolled-up acquisition costs
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionCosts {
    pub purchase_price: Money,
    pub rehab_cost: Money,
    pub rehab_utilities_cost: Money,
    /// Sum of flat dollar fees
    pub fixed_fees: Money,
    /// Fees proportional to purchase price
    pub proportional_fees: Money,
    pub price_proportional_rate: Rate,
    pub total_purchase_costs: Money,
}

impl AcquisitionCosts {
    /// Everything other than price and rehab: fees, points, rehab utilities
    pub fn closing_costs(&self) -> Money {
        self.total_purchase_costs - self.purchase_price - self.rehab_cost
    }

    /// Costs that do not scale with the purchase price
    pub fn non_proportional_costs(&self) -> Money {
        self.total_purchase_costs - self.purchase_price * (Decimal::ONE + self.price_proportional_rate.fraction())
    }
}

/// Roll all one-time purchase-side costs into a total
pub fn roll_up(inputs: &AcquisitionInputs) -> AcquisitionCosts {
    let rate = inputs.fees.price_proportional_rate();
    let fixed_fees = inputs.fees.fixed_total();
    let proportional_fees = rate.of(inputs.purchase_price);

    let total_purchase_costs = inputs.purchase_price
        + inputs.rehab_cost
        + inputs.rehab_utilities_cost
        + fixed_fees
        + proportional_fees;

    AcquisitionCosts {
        purchase_price: inputs.purchase_price,
        rehab_cost: inputs.rehab_cost,
        rehab_utilities_cost: inputs.rehab_utilities_cost,
        fixed_fees,
        proportional_fees,
        price_proportional_rate: rate,
        total_purchase_costs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_a_inputs() -> AcquisitionInputs {
        AcquisitionInputs {
            purchase_price: dec!(180000),
            rehab_cost: dec!(10000),
            rehab_utilities_cost: dec!(1000),
            fees: AcquisitionFees {
                origination_points: Rate::from_percent(dec!(1)),
                title_fees: dec!(1500),
                title_insurance: dec!(1200),
                inspection_costs: dec!(500),
                draw_setup_fee: dec!(800),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_total_includes_points_on_purchase_price() {
        let costs = roll_up(&scenario_a_inputs());
        // 180,000 + 15,000 + 1% of 180,000
        assert_eq!(costs.total_purchase_costs, dec!(196800));
        assert_eq!(costs.proportional_fees, dec!(1800));
        assert_eq!(costs.non_proportional_costs(), dec!(15000));
        assert_eq!(costs.closing_costs(), dec!(6800));
    }

    #[test]
    fn test_missing_fees_default_to_zero() {
        let costs = roll_up(&AcquisitionInputs {
            purchase_price: dec!(100000),
            ..Default::default()
        });
        assert_eq!(costs.total_purchase_costs, dec!(100000));
    }

    #[test]
    fn test_rehab_increase_strictly_increases_total() {
        let mut inputs = scenario_a_inputs();
        let mut previous = roll_up(&inputs).total_purchase_costs;
        for _ in 0..10 {
            inputs.rehab_cost += dec!(2500);
            let total = roll_up(&inputs).total_purchase_costs;
            assert!(total > previous);
            previous = total;
        }
    }

    #[test]
    fn test_transfer_tax_rate_scales_with_price() {
        let mut inputs = scenario_a_inputs();
        inputs.fees.transfer_tax_rate = Rate::from_fraction(DEFAULT_TRANSFER_TAX_RATE);
        let costs = roll_up(&inputs);
        assert_eq!(costs.proportional_fees, dec!(1800) + dec!(1260));
    }

    #[test]
    fn test_typical_schedule() {
        let fees = AcquisitionFees::typical();
        assert_eq!(fees.fixed_total(), dec!(4400));
        assert_eq!(fees.origination_points.fraction(), dec!(0.03));
    }
}
