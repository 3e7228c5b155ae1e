//! Hard-money loan (HML) carry costs
//!
//! HMLs are interest-only for the holding period. The financed amount is
//! the purchase price less the down payment plus an explicit fraction of
//! the rehab budget.

use crate::units::{Money, Rate, MONTHS_PER_YEAR};
use rust_decimal::Decimal;

/// Terms offered by the hard-money lender
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HardMoneyTerms {
    /// Points charged once at closing on the loan principal
    pub points: Rate,
    /// Annual interest rate, interest-only
    pub annual_rate: Rate,
    /// Fraction of the rehab budget financed by the lender (0 to 1)
    pub rehab_financed: Rate,
}

/// A sized hard-money loan for one deal
#[derive(Debug, Clone, PartialEq)]
pub struct HardMoneyLoan {
    pub principal: Money,
    /// Portion of principal funding the purchase
    pub purchase_portion: Money,
    /// Portion of principal funding rehab
    pub rehab_portion: Money,
    pub points_cost: Money,
    pub monthly_interest: Money,
    pub holding_months: Decimal,
    pub total_interest: Money,
}

impl HardMoneyTerms {
    /// Size the loan and its carry over `holding_months`
    pub fn finance(
        &self,
        purchase_price: Money,
        down_payment: Rate,
        rehab_cost: Money,
        holding_months: Decimal,
    ) -> HardMoneyLoan {
        let purchase_portion = down_payment.complement().of(purchase_price);
        let rehab_portion = self.rehab_financed.of(rehab_cost);
        let principal = purchase_portion + rehab_portion;

        let annual_interest = self.annual_rate.of(principal);

        HardMoneyLoan {
            principal,
            purchase_portion,
            rehab_portion,
            points_cost: self.points.of(principal),
            monthly_interest: annual_interest / MONTHS_PER_YEAR,
            holding_months,
            total_interest: annual_interest * holding_months / MONTHS_PER_YEAR,
        }
    }
}

impl HardMoneyLoan {
    /// Cash the buyer brings for the purchase itself
    pub fn down_payment_cash(&self, purchase_price: Money) -> Money {
        purchase_price - self.purchase_portion
    }

    /// Rehab the buyer pays out of pocket
    pub fn unfinanced_rehab(&self, rehab_cost: Money) -> Money {
        rehab_cost - self.rehab_portion
    }
}
