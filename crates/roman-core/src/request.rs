//! Conversion request shape validation.
//!
//! A request carries either `query` alone or `min` together with `max`.
//! Validation runs in a fixed order so the same bad input always produces the
//! same detail message:
//!
//! 1. `query` mixed with `min`/`max` is rejected outright.
//! 2. `query` alone is a single conversion.
//! 3. `min` + `max` is a range, provided `min < max`.
//! 4. Anything else is rejected.

use std::ops::RangeInclusive;

use crate::error::{Result, RomanError};
use crate::model::ConversionKind;

/// Validated inclusive range bounds (`min < max`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBounds {
    min: i64,
    max: i64,
}

impl RangeBounds {
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min >= max {
            return Err(RomanError::InvalidRange);
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Number of integers in the range, saturating at `u64::MAX`.
    pub fn span(&self) -> u64 {
        let span = i128::from(self.max) - i128::from(self.min) + 1;
        u64::try_from(span).unwrap_or(u64::MAX)
    }

    pub fn iter(&self) -> RangeInclusive<i64> {
        self.min..=self.max
    }
}

/// A validated conversion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRequest {
    Single(i64),
    Range(RangeBounds),
}

impl ConversionRequest {
    /// Resolve raw query parameters into a request.
    pub fn from_params(query: Option<i64>, min: Option<i64>, max: Option<i64>) -> Result<Self> {
        match (query, min, max) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(RomanError::MixedParameters),
            (Some(n), None, None) => Ok(ConversionRequest::Single(n)),
            (None, Some(min), Some(max)) => Ok(ConversionRequest::Range(RangeBounds::new(min, max)?)),
            _ => Err(RomanError::InvalidParameters),
        }
    }

    pub fn kind(&self) -> ConversionKind {
        match self {
            ConversionRequest::Single(_) => ConversionKind::Single,
            ConversionRequest::Range(_) => ConversionKind::Range,
        }
    }
}
