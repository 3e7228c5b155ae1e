//! BRRRR return metrics: DSCR, cash-out at refinance, cash-on-cash, ROI

use super::ratio;
use crate::acquisition::AcquisitionCosts;
use crate::config::EquityPolicy;
use crate::financing::{AmortizedLoan, HardMoneyLoan};
use crate::operating::{CarryingExpenses, OperatingStatement};
use crate::units::{Money, MONTHS_PER_YEAR};
use rust_decimal::Decimal;

/// Everything the BRRRR metrics are derived from
#[derive(Debug, Clone)]
pub struct BrrrrMetricInputs<'a> {
    pub arv: Money,
    pub costs: &'a AcquisitionCosts,
    pub hard_money: &'a HardMoneyLoan,
    pub refinance_loan: &'a AmortizedLoan,
    pub refinance_closing_costs: Money,
    pub statement: &'a OperatingStatement,
    pub carrying: &'a CarryingExpenses,
    pub months_until_refi: Decimal,
    pub equity_policy: EquityPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrrrrReturns {
    pub monthly_debt_service: Money,
    pub cash_flow: Money,
    /// NOI / debt service
    pub dscr: f64,
    /// Rent / (debt service + taxes + insurance + HOA), as lenders quote it
    pub lender_dscr: f64,
    /// Investor's net position once the refinance closes (negative = still in)
    pub cash_out: Money,
    /// Capital left in the deal after refinance, never negative
    pub cash_invested: Money,
    /// Refinance proceeds beyond everything the investor put in
    pub surplus_cash_out: Money,
    pub cash_on_cash: f64,
    pub roi: f64,
    pub equity_build_up: Money,
    /// Equity plus cash-out
    pub net_profit: Money,
    /// Peak cash required before the refinance
    pub total_cash_needed: Money,
    pub holding_costs_until_refi: Money,
}

impl BrrrrReturns {
    pub fn calculate(inputs: &BrrrrMetricInputs<'_>) -> Self {
        let costs = inputs.costs;
        let hml = inputs.hard_money;

        let monthly_debt_service = inputs.refinance_loan.monthly_payment();
        let cash_flow = inputs.statement.cash_flow(monthly_debt_service);
        let dscr = ratio(inputs.statement.net_operating_income, monthly_debt_service);
        let lender_dscr = ratio(
            inputs.statement.gross_rent,
            monthly_debt_service + inputs.carrying.monthly(),
        );

        let holding_costs_until_refi = inputs.carrying.over_months(inputs.months_until_refi);
        let total_cash_needed = hml.down_payment_cash(costs.purchase_price)
            + costs.closing_costs()
            + hml.points_cost
            + hml.unfinanced_rehab(costs.rehab_cost)
            + hml.total_interest
            + holding_costs_until_refi;

        // The new loan retires the HML; whatever is left goes back to the investor
        let cash_out = inputs.refinance_loan.principal
            - hml.principal
            - inputs.refinance_closing_costs
            - total_cash_needed;
        let cash_invested = (-cash_out).max(Decimal::ZERO);
        let surplus_cash_out = cash_out.max(Decimal::ZERO);

        let equity_build_up = match inputs.equity_policy {
            EquityPolicy::AtRefinance => inputs.arv - inputs.refinance_loan.principal,
            EquityPolicy::FirstYearPaydown => inputs.refinance_loan.principal_paid(12),
        };

        let annual_cash_flow = cash_flow * MONTHS_PER_YEAR;
        let cash_on_cash = ratio(annual_cash_flow, cash_invested);
        let roi = ratio(annual_cash_flow + equity_build_up, cash_invested);

        Self {
            monthly_debt_service,
            cash_flow,
            dscr,
            lender_dscr,
            cash_out,
            cash_invested,
            surplus_cash_out,
            cash_on_cash,
            roi,
            equity_build_up,
            net_profit: equity_build_up + cash_out,
            total_cash_needed,
            holding_costs_until_refi,
        }
    }
}
