//! Roman numeral gateway library entry.
//!
//! Wires the conversion API, request-ID propagation, lifecycle
//! instrumentation, and operational endpoints into one axum router. Consumed
//! by the binary (`main.rs`) and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod context;
pub mod obs;
pub mod ops;
pub mod router;
pub mod services;
