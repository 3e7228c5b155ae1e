//! Fix-and-flip analysis

use super::DealBase;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::financing::HardMoneyLoan;
use crate::returns::{FlipMetricInputs, FlipReturns, SaleAssumptions};
use crate::units::Money;
use crate::validation::{validate_flip, Advisory};
use log::debug;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlipInputs {
    pub base: DealBase,
    pub closing_costs_buy: Money,
    pub sale: SaleAssumptions,
    pub monthly_utilities: Money,
}

impl FlipInputs {
    /// Utilities plus taxes, insurance and HOA for one month of holding
    pub fn monthly_holding_cost(&self) -> Money {
        self.monthly_utilities + self.base.carrying.monthly()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlipAnalysis {
    pub hard_money: HardMoneyLoan,
    pub returns: FlipReturns,
    pub advisories: Vec<Advisory>,
}

pub struct FlipAnalyzer<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> FlipAnalyzer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, inputs: &FlipInputs) -> Result<FlipAnalysis> {
        let mut advisories = validate_flip(inputs, &self.config.advisories)?;
        let base = &inputs.base;

        let hard_money = base.hard_money.finance(
            base.purchase_price,
            base.down_payment,
            base.rehab_cost,
            inputs.sale.holding_months,
        );

        let returns = FlipReturns::calculate(&FlipMetricInputs {
            purchase_price: base.purchase_price,
            rehab_cost: base.rehab_cost,
            closing_costs_buy: inputs.closing_costs_buy,
            sale: &inputs.sale,
            hard_money: &hard_money,
            monthly_holding_cost: inputs.monthly_holding_cost(),
        });

        debug!(
            "Flip: profit {:.2} on {:.2} cash over {} months, ROI {:.4}",
            returns.net_profit, returns.total_cash_needed, inputs.sale.holding_months, returns.roi
        );

        if returns.net_profit < Decimal::ZERO {
            advisories.push(Advisory::new(
                "sale_price",
                format!("the flip loses {:.2} after costs", -returns.net_profit),
            ));
        }

        Ok(FlipAnalysis {
            hard_money,
            returns,
            advisories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::fixtures;
    use crate::units::Rate;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_roi_and_annualized() {
        let a = FlipAnalyzer::new(&AnalysisConfig::default())
            .analyze(&fixtures::flip())
            .unwrap();
        assert_eq!(a.returns.net_profit, dec!(25000));
        assert_eq!(a.returns.total_cash_needed, dec!(50000));
        assert_relative_eq!(a.returns.roi, 0.50, epsilon = 1e-9);
        assert_relative_eq!(a.returns.annualized_roi, 1.00, epsilon = 1e-9);
        assert!(a.advisories.is_empty());
    }

    #[test]
    fn test_holding_cost_includes_carrying() {
        let mut inputs = fixtures::flip();
        inputs.monthly_utilities = dec!(200);
        inputs.base.carrying.annual_taxes = dec!(2400);
        inputs.base.carrying.monthly_hoa = dec!(50);

        let a = FlipAnalyzer::new(&AnalysisConfig::default()).analyze(&inputs).unwrap();
        // (200 + 200 + 50) * 6
        assert_eq!(a.returns.total_holding_costs, dec!(2700));
        assert_eq!(a.returns.net_profit, dec!(22300));
    }

    #[test]
    fn test_unfinanced_rehab_with_points() {
        let mut inputs = fixtures::flip();
        inputs.base.hard_money.rehab_financed = Rate::ZERO;
        inputs.base.hard_money.points = Rate::from_percent(dec!(2));

        let a = FlipAnalyzer::new(&AnalysisConfig::default()).analyze(&inputs).unwrap();
        assert_eq!(a.returns.net_profit, dec!(25000));
        assert_eq!(a.returns.total_cash_needed, dec!(53200));
    }

    #[test]
    fn test_zero_holding_time_is_advised() {
        let mut inputs = fixtures::flip();
        inputs.sale.holding_months = Decimal::ZERO;
        inputs.base.hard_money.annual_rate = Rate::from_percent(dec!(12));

        let a = FlipAnalyzer::new(&AnalysisConfig::default()).analyze(&inputs).unwrap();
        assert_eq!(a.returns.total_hml_interest, Decimal::ZERO);
        assert_eq!(a.returns.annualized_roi, f64::INFINITY);
        assert!(a.advisories.iter().any(|x| x.field == "holding_time"));
    }

    #[test]
    fn test_losing_flip_is_advised() {
        let mut inputs = fixtures::flip();
        inputs.sale.sale_price = dec!(200000);
        let a = FlipAnalyzer::new(&AnalysisConfig::default()).analyze(&inputs).unwrap();
        assert!(a.returns.net_profit < Decimal::ZERO);
        assert!(a.advisories.iter().any(|x| x.field == "sale_price"));
    }

    #[test]
    fn test_rejects_nonpositive_sale_price() {
        let mut inputs = fixtures::flip();
        inputs.sale.sale_price = Decimal::ZERO;
        let err = FlipAnalyzer::new(&AnalysisConfig::default())
            .analyze(&inputs)
            .unwrap_err();
        assert_eq!(err.violations()[0].field, "sale_price");
    }
}
