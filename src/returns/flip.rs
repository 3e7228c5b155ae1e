//! Flip return metrics: net profit after selling costs and tax, ROI
//!
//! Profit is measured against the all-in price and rehab budget, so HML
//! points show up only in the cash the investor brings to closing.

use super::{annualize, ratio};
use crate::financing::HardMoneyLoan;
use crate::units::{Money, Rate};
use rust_decimal::Decimal;

/// Exit assumptions for a flip
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SaleAssumptions {
    /// Projected sale price (ARV)
    pub sale_price: Money,
    pub holding_months: Decimal,
    pub buyer_agent_fee: Rate,
    pub seller_agent_fee: Rate,
    pub selling_closing_costs: Money,
    pub capital_gains_tax: Rate,
}

impl SaleAssumptions {
    pub fn selling_costs(&self) -> Money {
        (self.buyer_agent_fee + self.seller_agent_fee).of(self.sale_price) + self.selling_closing_costs
    }
}

#[derive(Debug, Clone)]
pub struct FlipMetricInputs<'a> {
    pub purchase_price: Money,
    pub rehab_cost: Money,
    pub closing_costs_buy: Money,
    pub sale: &'a SaleAssumptions,
    pub hard_money: &'a HardMoneyLoan,
    /// Utilities, taxes, insurance and HOA per month while holding
    pub monthly_holding_cost: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlipReturns {
    pub selling_costs: Money,
    pub total_holding_costs: Money,
    pub total_hml_interest: Money,
    pub hml_points_cost: Money,
    pub profit_before_tax: Money,
    pub capital_gains_tax: Money,
    pub net_profit: Money,
    pub total_cash_needed: Money,
    pub roi: f64,
    pub annualized_roi: f64,
}

impl FlipReturns {
    pub fn calculate(inputs: &FlipMetricInputs<'_>) -> Self {
        let sale = inputs.sale;
        let hml = inputs.hard_money;

        let selling_costs = sale.selling_costs();
        let total_holding_costs = inputs.monthly_holding_cost * sale.holding_months;

        let profit_before_tax = sale.sale_price
            - inputs.purchase_price
            - inputs.rehab_cost
            - inputs.closing_costs_buy
            - selling_costs
            - total_holding_costs
            - hml.total_interest;
        // Losses carry no tax credit here
        let capital_gains_tax = sale.capital_gains_tax.of(profit_before_tax.max(Decimal::ZERO));
        let net_profit = profit_before_tax - capital_gains_tax;

        // Cash at closing; the rehab is paid as it happens
        let total_cash_needed =
            hml.down_payment_cash(inputs.purchase_price) + inputs.closing_costs_buy + hml.points_cost;

        let roi = ratio(net_profit, total_cash_needed);
        let annualized_roi = annualize(roi, sale.holding_months);

        Self {
            selling_costs,
            total_holding_costs,
            total_hml_interest: hml.total_interest,
            hml_points_cost: hml.points_cost,
            profit_before_tax,
            capital_gains_tax,
            net_profit,
            total_cash_needed,
            roi,
            annualized_roi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financing::HardMoneyTerms;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn fully_financed_rehab(purchase_price: Money, rehab: Money, months: Decimal) -> HardMoneyLoan {
        HardMoneyTerms {
            points: Rate::ZERO,
            annual_rate: Rate::ZERO,
            rehab_financed: Rate::ONE,
        }
        .finance(purchase_price, Rate::from_percent(dec!(20)), rehab, months)
    }

    #[test]
    fn test_roi_and_annualized_roi() {
        // 40k down + 10k closing = 50k cash; profit works out to 25k
        let hml = fully_financed_rehab(dec!(200000), dec!(30000), dec!(6));
        let sale = SaleAssumptions {
            sale_price: dec!(265000),
            holding_months: dec!(6),
            ..Default::default()
        };
        let r = FlipReturns::calculate(&FlipMetricInputs {
            purchase_price: dec!(200000),
            rehab_cost: dec!(30000),
            closing_costs_buy: dec!(10000),
            sale: &sale,
            hard_money: &hml,
            monthly_holding_cost: Decimal::ZERO,
        });

        assert_eq!(r.net_profit, dec!(25000));
        assert_eq!(r.total_cash_needed, dec!(50000));
        assert_relative_eq!(r.roi, 0.50, epsilon = 1e-9);
        assert_relative_eq!(r.annualized_roi, 1.00, epsilon = 1e-9);
    }

    #[test]
    fn test_points_count_as_cash_not_profit_cost() {
        // Lender takes 2 points on the 160k purchase loan, rehab is paid out of pocket
        let hml = HardMoneyTerms {
            points: Rate::from_percent(dec!(2)),
            annual_rate: Rate::ZERO,
            rehab_financed: Rate::ZERO,
        }
        .finance(dec!(200000), Rate::from_percent(dec!(20)), dec!(30000), dec!(6));
        let sale = SaleAssumptions {
            sale_price: dec!(265000),
            holding_months: dec!(6),
            ..Default::default()
        };
        let r = FlipReturns::calculate(&FlipMetricInputs {
            purchase_price: dec!(200000),
            rehab_cost: dec!(30000),
            closing_costs_buy: dec!(10000),
            sale: &sale,
            hard_money: &hml,
            monthly_holding_cost: Decimal::ZERO,
        });

        assert_eq!(r.hml_points_cost, dec!(3200));
        assert_eq!(r.net_profit, dec!(25000));
        // 40k down + 10k closing + 3.2k points
        assert_eq!(r.total_cash_needed, dec!(53200));
    }

    #[test]
    fn test_selling_costs_holding_and_tax() {
        let hml = HardMoneyTerms {
            points: Rate::from_percent(dec!(2)),
            annual_rate: Rate::from_percent(dec!(12)),
            rehab_financed: Rate::ZERO,
        }
        .finance(dec!(150000), Rate::from_percent(dec!(10)), dec!(40000), dec!(5));
        let sale = SaleAssumptions {
            sale_price: dec!(300000),
            holding_months: dec!(5),
            buyer_agent_fee: Rate::from_percent(dec!(2.5)),
            seller_agent_fee: Rate::from_percent(dec!(2.5)),
            selling_closing_costs: dec!(3000),
            capital_gains_tax: Rate::from_percent(dec!(20)),
        };
        let r = FlipReturns::calculate(&FlipMetricInputs {
            purchase_price: dec!(150000),
            rehab_cost: dec!(40000),
            closing_costs_buy: dec!(4000),
            sale: &sale,
            hard_money: &hml,
            monthly_holding_cost: dec!(600),
        });

        assert_eq!(r.selling_costs, dec!(18000));
        assert_eq!(r.total_holding_costs, dec!(3000));
        // HML 135k: 1,350/month for 5 months, 2,700 points
        assert_eq!(r.total_hml_interest, dec!(6750));
        assert_eq!(r.hml_points_cost, dec!(2700));
        // 300,000 - 150,000 - 40,000 - 4,000 - 18,000 - 3,000 - 6,750
        assert_eq!(r.profit_before_tax, dec!(78250));
        assert_eq!(r.capital_gains_tax, dec!(15650));
        assert_eq!(r.net_profit, dec!(62600));
        // 15k down + 4k closing + 2.7k points
        assert_eq!(r.total_cash_needed, dec!(21700));
    }

    #[test]
    fn test_loss_is_not_taxed() {
        let hml = fully_financed_rehab(dec!(200000), dec!(30000), dec!(6));
        let sale = SaleAssumptions {
            sale_price: dec!(220000),
            holding_months: dec!(6),
            capital_gains_tax: Rate::from_percent(dec!(25)),
            ..Default::default()
        };
        let r = FlipReturns::calculate(&FlipMetricInputs {
            purchase_price: dec!(200000),
            rehab_cost: dec!(30000),
            closing_costs_buy: Decimal::ZERO,
            sale: &sale,
            hard_money: &hml,
            monthly_holding_cost: Decimal::ZERO,
        });
        assert_eq!(r.net_profit, dec!(-10000));
        assert_eq!(r.capital_gains_tax, Decimal::ZERO);
        assert!(r.roi < 0.0);
    }
}
