//! Deal Analyzer - Underwriting engine for BRRRR and fix-and-flip real-estate deals
//!
//! This library provides:
//! - Acquisition cost rollup and the 70% of ARV screening rule
//! - Hard-money carry, refinance sizing and amortized debt service
//! - Rental operating statements (NOI, cash flow, DSCR)
//! - Return metrics (cash-out, cash-on-cash, ROI, flip profit) on exact decimal money
//! - Two-tier validation: hard rejections and soft advisories
//! - Wire records for the HTTP surface and a parallel CSV batch runner

pub mod acquisition;
pub mod analyzer;
pub mod batch;
pub mod config;
pub mod error;
pub mod financing;
pub mod operating;
pub mod returns;
pub mod units;
pub mod validation;
pub mod wire;

// Re-export commonly used types
pub use analyzer::{analyze, analyze_acquisition, BrrrrInputs, Deal, DealAnalysis, DealBase, FlipInputs};
pub use batch::DealRunner;
pub use config::{AnalysisConfig, EquityPolicy};
pub use error::{DealError, FieldViolation};
pub use units::{Money, Rate};
pub use validation::Advisory;
