//! Acquisition cost rollup and the 70% rule screen

mod costs;
mod seventy_rule;

pub use costs::{
    roll_up, AcquisitionCosts, AcquisitionFees, AcquisitionInputs, DEFAULT_TRANSFER_TAX_RATE,
};
pub use seventy_rule::{PriceGap, SeventyRuleEvaluator, SeventyRuleResult};
