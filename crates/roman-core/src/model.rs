//! Wire models returned by the conversion endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::numeral;

/// One integer and its Roman numeral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Decimal form of the converted integer.
    pub input: String,
    /// Roman numeral encoding.
    pub output: String,
}

impl Conversion {
    /// Convert `n` and pair it with its decimal form.
    pub fn of(n: i64) -> Result<Self> {
        Ok(Self {
            input: n.to_string(),
            output: numeral::convert(n)?,
        })
    }
}

/// Every conversion of an inclusive range, ascending by input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRange {
    pub conversions: Vec<Conversion>,
}

/// Body of a successful conversion request.
///
/// Untagged: a single conversion serialises as `{"input","output"}` and a range
/// as `{"conversions":[...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversionResponse {
    Range(ConversionRange),
    Single(Conversion),
}

/// Body of a rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

/// Liveness payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self { status: "ok".into() }
    }
}

/// Which conversion path a request took. Used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Single,
    Range,
}

impl ConversionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ConversionKind::Single => "single",
            ConversionKind::Range => "range",
        }
    }
}
