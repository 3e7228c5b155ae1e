//! Permanent refinance loan sizing and fixed-rate amortization
//!
//! Amortization is written in terms of the discounted share
//! `s(m) = 1 - (1+r)^-m`, which stays within [0, 1] for any term:
//!
//! ```text
//! payment    = P r / s(n)
//! balance(k) = P s(n-k) / s(n)
//! ```

use crate::error::{DealError, Result};
use crate::units::{Money, Rate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Longest loan term accepted, in years
pub const MAX_LOAN_TERM_YEARS: u32 = 50;

const PAYMENTS_PER_YEAR: u32 = 12;

/// Terms of the permanent (DSCR) loan taken at refinance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefinanceTerms {
    /// Loan-to-value against ARV
    pub ltv: Rate,
    /// Annual nominal interest rate
    pub annual_rate: Rate,
    pub term_years: u32,
    /// Closing costs paid at refinance
    pub closing_costs: Money,
}

impl Default for RefinanceTerms {
    fn default() -> Self {
        Self {
            ltv: Rate::from_percent(dec!(75)),
            annual_rate: Rate::ZERO,
            term_years: 30,
            closing_costs: Decimal::ZERO,
        }
    }
}

impl RefinanceTerms {
    /// Size the new loan against ARV
    pub fn size(&self, arv: Money) -> Result<AmortizedLoan> {
        AmortizedLoan::new(self.ltv.of(arv), self.annual_rate, self.term_years)
    }
}

/// A level-payment, fixed-rate loan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizedLoan {
    pub principal: Money,
    /// Periodic (monthly) rate
    pub monthly_rate: Decimal,
    /// Number of monthly payments
    pub payments: u32,
}

impl AmortizedLoan {
    pub fn new(principal: Money, annual_rate: Rate, term_years: u32) -> Result<Self> {
        let payments = term_years
            .checked_mul(PAYMENTS_PER_YEAR)
            .filter(|_| (1..=MAX_LOAN_TERM_YEARS).contains(&term_years))
            .ok_or_else(|| {
                DealError::invalid(
                    "loan_term_years",
                    format!("must be between 1 and {} years", MAX_LOAN_TERM_YEARS),
                )
            })?;

        Ok(Self {
            principal,
            monthly_rate: annual_rate.monthly(),
            payments,
        })
    }

    /// 1 - (1+r)^-m; saturates at 1 when (1+r)^m is out of range
    fn discounted_share(&self, months: u32) -> Decimal {
        match (Decimal::ONE + self.monthly_rate).checked_powu(u64::from(months)) {
            Some(growth) if !growth.is_zero() => Decimal::ONE - Decimal::ONE / growth,
            _ => Decimal::ONE,
        }
    }

    /// Standard annuity payment, or P / n at 0%
    pub fn monthly_payment(&self) -> Money {
        let share = self.discounted_share(self.payments);
        if self.monthly_rate.is_zero() || share.is_zero() {
            return self.principal / Decimal::from(self.payments);
        }
        self.principal * self.monthly_rate / share
    }

    /// Outstanding balance after `k` payments
    pub fn balance_after(&self, k: u32) -> Money {
        let remaining = self.payments - k.min(self.payments);
        let share = self.discounted_share(self.payments);
        if self.monthly_rate.is_zero() || share.is_zero() {
            return self.principal * Decimal::from(remaining) / Decimal::from(self.payments);
        }
        self.principal * self.discounted_share(remaining) / share
    }

    /// Principal repaid over the first `k` payments
    pub fn principal_paid(&self, k: u32) -> Money {
        self.principal - self.balance_after(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Decimal, b: Decimal, tol: Decimal) -> bool {
        let diff = if a > b { a - b } else { b - a };
        diff < tol
    }

    #[test]
    fn test_zero_rate_payment_is_straight_line() {
        let loan = AmortizedLoan::new(dec!(120000), Rate::ZERO, 30).unwrap();
        assert_eq!(loan.payments, 360);
        assert_eq!(loan.monthly_payment().round_dp(2), dec!(333.33));
        assert_eq!(loan.balance_after(12), dec!(116000));
    }

    #[test]
    fn test_standard_annuity_payment() {
        // 200k at 6% over 30 years is the textbook 1,199.10
        let loan = AmortizedLoan::new(dec!(200000), Rate::from_percent(dec!(6)), 30).unwrap();
        assert_eq!(loan.monthly_payment().round_dp(2), dec!(1199.10));
    }

    #[test]
    fn test_balance_reaches_zero_at_maturity() {
        let loan = AmortizedLoan::new(dec!(150000), Rate::from_percent(dec!(7.25)), 15).unwrap();
        assert_eq!(loan.balance_after(loan.payments), Decimal::ZERO);
        assert_eq!(loan.principal_paid(loan.payments), dec!(150000));
        // Early payments are mostly interest
        assert!(loan.principal_paid(12) < loan.monthly_payment() * dec!(12));
        assert!(loan.principal_paid(12) > Decimal::ZERO);
    }

    #[test]
    fn test_balance_matches_payment_schedule() {
        let loan = AmortizedLoan::new(dec!(200000), Rate::from_percent(dec!(6)), 30).unwrap();
        let payment = loan.monthly_payment();
        let mut balance = loan.principal;
        for _ in 0..12 {
            balance = balance + balance * loan.monthly_rate - payment;
        }
        assert!(approx_eq(loan.balance_after(12), balance, dec!(0.0001)));
    }

    #[test]
    fn test_term_outside_range_is_invalid() {
        let err = AmortizedLoan::new(dec!(100000), Rate::from_percent(dec!(5)), 0).unwrap_err();
        assert_eq!(err.violations()[0].field, "loan_term_years");

        // Would overflow the payment count if multiplied blindly
        let err = AmortizedLoan::new(dec!(100000), Rate::from_percent(dec!(5)), 400_000_000)
            .unwrap_err();
        assert_eq!(err.violations()[0].field, "loan_term_years");
        assert!(AmortizedLoan::new(dec!(100000), Rate::ZERO, u32::MAX).is_err());
        assert!(AmortizedLoan::new(dec!(100000), Rate::ZERO, MAX_LOAN_TERM_YEARS + 1).is_err());
    }

    #[test]
    fn test_extreme_rate_over_longest_term_stays_finite() {
        // (1 + 10/12)^600 is far outside the decimal range
        let loan = AmortizedLoan::new(
            dec!(100000),
            Rate::from_percent(dec!(1000)),
            MAX_LOAN_TERM_YEARS,
        )
        .unwrap();
        assert_eq!(loan.payments, 600);
        assert!(approx_eq(
            loan.monthly_payment(),
            dec!(100000) * loan.monthly_rate,
            dec!(0.01)
        ));
        assert!(loan.balance_after(1) <= loan.principal);
    }

    #[test]
    fn test_refinance_sized_from_arv() {
        let terms = RefinanceTerms {
            ltv: Rate::from_percent(dec!(75)),
            annual_rate: Rate::from_percent(dec!(7)),
            term_years: 30,
            closing_costs: Decimal::ZERO,
        };
        let loan = terms.size(dec!(300000)).unwrap();
        assert_eq!(loan.principal, dec!(225000));
    }
}
