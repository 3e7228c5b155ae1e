//! Monthly operating cash flow for a rental hold

use crate::units::{Money, Rate, MONTHS_PER_YEAR};
use rust_decimal::Decimal;

/// Recurring property expenses that accrue whether or not the unit is rented
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarryingExpenses {
    pub annual_taxes: Money,
    pub annual_insurance: Money,
    pub monthly_hoa: Money,
}

impl CarryingExpenses {
    /// Taxes and insurance spread monthly, plus HOA
    pub fn monthly(&self) -> Money {
        (self.annual_taxes + self.annual_insurance) / MONTHS_PER_YEAR + self.monthly_hoa
    }

    /// Total carrying cost over a number of months
    pub fn over_months(&self, months: Decimal) -> Money {
        (self.annual_taxes + self.annual_insurance) * months / MONTHS_PER_YEAR
            + self.monthly_hoa * months
    }
}

/// Rent and rent-proportional expense assumptions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperatingInputs {
    pub monthly_rent: Money,
    pub vacancy: Rate,
    pub management_fee: Rate,
    pub maintenance: Rate,
    pub capex: Rate,
}

/// One month of operations, before debt service
#[derive(Debug, Clone, PartialEq)]
pub struct OperatingStatement {
    pub gross_rent: Money,
    pub vacancy_loss: Money,
    pub management_fee: Money,
    pub maintenance: Money,
    pub capex_reserve: Money,
    /// Taxes, insurance and HOA
    pub fixed_expenses: Money,
    pub net_operating_income: Money,
}

impl OperatingStatement {
    pub fn new(inputs: &OperatingInputs, carrying: &CarryingExpenses) -> Self {
        let rent = inputs.monthly_rent;
        let vacancy_loss = inputs.vacancy.of(rent);
        let management_fee = inputs.management_fee.of(rent);
        let maintenance = inputs.maintenance.of(rent);
        let capex_reserve = inputs.capex.of(rent);
        let fixed_expenses = carrying.monthly();

        let net_operating_income =
            rent - vacancy_loss - management_fee - maintenance - capex_reserve - fixed_expenses;

        Self {
            gross_rent: rent,
            vacancy_loss,
            management_fee,
            maintenance,
            capex_reserve,
            fixed_expenses,
            net_operating_income,
        }
    }

    pub fn operating_expenses(&self) -> Money {
        self.gross_rent - self.net_operating_income
    }

    /// NOI less the monthly loan payment. Negative is a valid outcome.
    pub fn cash_flow(&self, monthly_debt_service: Money) -> Money {
        self.net_operating_income - monthly_debt_service
    }
}
