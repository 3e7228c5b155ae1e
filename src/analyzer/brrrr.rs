//! Buy-Rehab-Rent-Refinance-Repeat analysis

use super::screen::seventy_rule_advisories;
use super::DealBase;
use crate::acquisition::{
    roll_up, AcquisitionCosts, AcquisitionFees, AcquisitionInputs, SeventyRuleEvaluator, SeventyRuleResult,
};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::financing::{AmortizedLoan, HardMoneyLoan, RefinanceTerms};
use crate::operating::{OperatingInputs, OperatingStatement};
use crate::returns::{BrrrrMetricInputs, BrrrrReturns};
use crate::units::Money;
use crate::validation::{validate_brrrr, Advisory};
use log::debug;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrrrrInputs {
    pub base: DealBase,
    pub arv: Money,
    /// Utilities paid during rehab, rolled into acquisition cost
    pub rehab_utilities_cost: Money,
    pub fees: AcquisitionFees,
    pub refinance: RefinanceTerms,
    /// Hard-money carry period before the refinance closes
    pub months_until_refi: Decimal,
    pub operating: OperatingInputs,
}

impl BrrrrInputs {
    pub fn acquisition_inputs(&self) -> AcquisitionInputs {
        AcquisitionInputs {
            purchase_price: self.base.purchase_price,
            rehab_cost: self.base.rehab_cost,
            rehab_utilities_cost: self.rehab_utilities_cost,
            fees: self.fees.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrrrrAnalysis {
    pub costs: AcquisitionCosts,
    pub seventy_rule: SeventyRuleResult,
    pub hard_money: HardMoneyLoan,
    pub refinance_loan: AmortizedLoan,
    pub statement: OperatingStatement,
    pub returns: BrrrrReturns,
    pub advisories: Vec<Advisory>,
}

pub struct BrrrrAnalyzer<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> BrrrrAnalyzer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, inputs: &BrrrrInputs) -> Result<BrrrrAnalysis> {
        let mut advisories = validate_brrrr(inputs, &self.config.advisories)?;
        let base = &inputs.base;

        let costs = roll_up(&inputs.acquisition_inputs());
        let seventy_rule =
            SeventyRuleEvaluator::new(self.config.seventy_rule_threshold).evaluate(inputs.arv, &costs)?;

        let hard_money = base.hard_money.finance(
            base.purchase_price,
            base.down_payment,
            base.rehab_cost,
            inputs.months_until_refi,
        );
        let refinance_loan = inputs.refinance.size(inputs.arv)?;
        let statement = OperatingStatement::new(&inputs.operating, &base.carrying);

        let returns = BrrrrReturns::calculate(&BrrrrMetricInputs {
            arv: inputs.arv,
            costs: &costs,
            hard_money: &hard_money,
            refinance_loan: &refinance_loan,
            refinance_closing_costs: inputs.refinance.closing_costs,
            statement: &statement,
            carrying: &base.carrying,
            months_until_refi: inputs.months_until_refi,
            equity_policy: self.config.equity_policy,
        });

        debug!(
            "BRRRR: NOI {:.2}, debt service {:.2}, DSCR {:.3}, cash-out {:.2}, CoC {:.4}",
            statement.net_operating_income,
            returns.monthly_debt_service,
            returns.dscr,
            returns.cash_out,
            returns.cash_on_cash
        );

        seventy_rule_advisories(&seventy_rule, &mut advisories);
        self.outcome_advisories(&returns, &mut advisories);

        Ok(BrrrrAnalysis {
            costs,
            seventy_rule,
            hard_money,
            refinance_loan,
            statement,
            returns,
            advisories,
        })
    }

    fn outcome_advisories(&self, returns: &BrrrrReturns, advisories: &mut Vec<Advisory>) {
        if returns.cash_flow < Decimal::ZERO {
            advisories.push(Advisory::new(
                "rent",
                format!("negative monthly cash flow of {:.2}", returns.cash_flow),
            ));
        }
        let min_dscr = self.config.advisories.min_dscr;
        if returns.dscr < min_dscr {
            advisories.push(Advisory::new(
                "rent",
                format!("DSCR of {:.2} is below {:.2}", returns.dscr, min_dscr),
            ));
        }
        if returns.cash_out < Decimal::ZERO {
            advisories.push(Advisory::new(
                "ltv",
                format!(
                    "refinance does not cover acquisition; {:.2} stays in the deal",
                    -returns.cash_out
                ),
            ));
        }
    }
}
