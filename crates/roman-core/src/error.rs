//! Shared error type across roman crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input: wrong parameter shape, bad ordering, or out of domain.
    BadRequest,
    /// Internal server error. Never carries a client-visible detail.
    Internal,
}

impl ClientCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RomanError>;

/// Unified error type used by core and gateway.
///
/// Display strings of the client variants are returned verbatim as the
/// `detail` of a 400 response, so they are part of the HTTP contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RomanError {
    #[error("Input must be between 1 and 255")]
    OutOfRange(i64),
    #[error("min must be less than max")]
    InvalidRange,
    #[error("Provide either 'query' or 'min' and 'max', not both")]
    MixedParameters,
    #[error("Invalid query parameters")]
    InvalidParameters,
    #[error("Invalid query parameters: {0}")]
    MalformedParameters(String),
    #[error("Range of {span} values exceeds the limit of {limit}")]
    RangeTooLarge { span: u64, limit: u32 },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RomanError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RomanError::OutOfRange(_)
            | RomanError::InvalidRange
            | RomanError::MixedParameters
            | RomanError::InvalidParameters
            | RomanError::MalformedParameters(_)
            | RomanError::RangeTooLarge { .. } => ClientCode::BadRequest,
            RomanError::Config(_) | RomanError::Internal(_) => ClientCode::Internal,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.client_code() == ClientCode::BadRequest
    }
}
