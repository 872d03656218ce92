//! Roman core: the numeral converter, request shape validation, wire models,
//! and the error taxonomy shared by the gateway.
//!
//! This crate carries no transport or runtime dependencies. Everything here is
//! pure and synchronous; concurrency and HTTP live in `roman-gateway`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Every invalid input
//! surfaces as a `RomanError` so a bad query can never take the process down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;
pub mod numeral;
pub mod request;

/// Shared result type.
pub use error::{Result, RomanError};
