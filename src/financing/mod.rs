//! Financing: hard-money carry and the permanent refinance loan

mod hard_money;
mod mortgage;

pub use hard_money::{HardMoneyLoan, HardMoneyTerms};
pub use mortgage::{AmortizedLoan, RefinanceTerms, MAX_LOAN_TERM_YEARS};
