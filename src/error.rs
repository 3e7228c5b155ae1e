//! Error types for deal analysis
//!
//! Hard failures only. Soft problems travel alongside a result as
//! [`Advisory`](crate::validation::Advisory) messages.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A single rejected input field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldViolation {
    /// Wire/engine name of the offending field
    pub field: &'static str,
    /// Human readable reason
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Engine failure. A call either fully succeeds or returns one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DealError {
    /// Structurally invalid input; no partial result is produced
    #[error("invalid input: {}", join_violations(.0))]
    InvalidInput(Vec<FieldViolation>),
}

impl DealError {
    /// Shorthand for a single-field rejection
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DealError::InvalidInput(vec![FieldViolation::new(field, reason)])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            DealError::InvalidInput(v) => v,
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, DealError>;
