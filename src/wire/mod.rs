//! Request and response records for the HTTP and batch surfaces
//!
//! Field names match what existing clients already send, misspellings
//! included. Every conversion into the engine happens in an `into_*`
//! method here, so the engine only ever sees raw dollars and [`Rate`]s.
//!
//! [`Rate`]: crate::units::Rate

mod acquisition;
mod deal;
mod flip;

pub use acquisition::{AcquisitionRequest, AcquisitionResponse};
pub use deal::{AnalyzeDealRequest, AnalyzeDealResponse};
pub use flip::{AnalyzeFlipRequest, AnalyzeFlipResponse};

use crate::error::{DealError, FieldViolation, Result};
use crate::units::{Percent, Rate};
use crate::validation::Advisory;
use serde::Serialize;

/// Body returned with HTTP 400
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub violations: Vec<FieldViolation>,
}

impl From<&DealError> for ErrorBody {
    fn from(err: &DealError) -> Self {
        Self {
            error: err.to_string(),
            violations: err.violations().to_vec(),
        }
    }
}

impl ErrorBody {
    /// A body for requests that never reached the engine (bad JSON, unknown route)
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            violations: Vec::new(),
        }
    }
}

/// Serializes ratio metrics, writing infinite sentinels as strings
pub mod ratio {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f64::INFINITY {
            serializer.serialize_str("Infinity")
        } else if *value == f64::NEG_INFINITY {
            serializer.serialize_str("-Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

/// `None` when there is nothing to say, as existing clients expect
pub(crate) fn messages(advisories: &[Advisory]) -> Option<Vec<String>> {
    if advisories.is_empty() {
        None
    } else {
        Some(advisories.iter().map(ToString::to_string).collect())
    }
}

pub(crate) fn required<T>(field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| DealError::invalid(field, "is required"))
}

/// Work out how much of the rehab the hard-money lender funds.
///
/// Clients send either the legacy `use_HM_for_rehab` toggle or an explicit
/// percentage; both at once must agree.
pub(crate) fn rehab_financed(toggle: Option<bool>, percent: Option<Percent>) -> Result<Rate> {
    match (toggle, percent) {
        (Some(false), Some(p)) if !p.0.is_zero() => Err(DealError::invalid(
            "hml_rehab_financed_percent",
            "use_HM_for_rehab is false but a financed percentage was given",
        )),
        (Some(true), Some(p)) if p.0.is_zero() => Err(DealError::invalid(
            "hml_rehab_financed_percent",
            "use_HM_for_rehab is true but the financed percentage is 0",
        )),
        (_, Some(p)) => Ok(p.to_rate()),
        (Some(true), None) => Ok(Rate::ONE),
        (Some(false), None) | (None, None) => Ok(Rate::ZERO),
    }
}

/// Run every field conversion and report all failures together
pub(crate) struct Conversions {
    violations: Vec<FieldViolation>,
}

impl Conversions {
    pub fn new() -> Self {
        Self { violations: Vec::new() }
    }

    /// Keep the value, or record why it could not be produced. The
    /// placeholder default never escapes: `finish` fails in that case.
    pub fn take<T: Default>(&mut self, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.violations.extend(err.violations().iter().cloned());
                T::default()
            }
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(DealError::InvalidInput(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Serialize)]
    struct Sample {
        #[serde(with = "ratio")]
        value: f64,
    }

    #[test]
    fn test_ratio_sentinels_serialize_as_strings() {
        let json = |value| serde_json::to_string(&Sample { value }).unwrap();
        assert_eq!(json(f64::INFINITY), r#"{"value":"Infinity"}"#);
        assert_eq!(json(f64::NEG_INFINITY), r#"{"value":"-Infinity"}"#);
        assert_eq!(json(1.25), r#"{"value":1.25}"#);
    }

    #[test]
    fn test_rehab_financed_resolution() {
        assert_eq!(rehab_financed(None, None).unwrap(), Rate::ZERO);
        assert_eq!(rehab_financed(Some(true), None).unwrap(), Rate::ONE);
        assert_eq!(
            rehab_financed(None, Some(Percent(dec!(80)))).unwrap(),
            Rate::from_percent(dec!(80))
        );
        assert_eq!(
            rehab_financed(Some(true), Some(Percent(dec!(50)))).unwrap(),
            Rate::from_percent(dec!(50))
        );
        assert!(rehab_financed(Some(false), Some(Percent(dec!(50)))).is_err());
        assert!(rehab_financed(Some(true), Some(Percent(dec!(0)))).is_err());
    }

    #[test]
    fn test_error_body_lists_violations() {
        let err = DealError::InvalidInput(vec![
            FieldViolation::new("arv", "must be greater than 0"),
            FieldViolation::new("rent", "is required"),
        ]);
        let body = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(body["violations"][0]["field"], "arv");
        assert_eq!(body["violations"][1]["reason"], "is required");
        assert!(body["error"].as_str().unwrap().starts_with("invalid input"));
    }
}
