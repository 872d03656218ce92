//! Observability: metrics registry, request lifecycle hook, logging bootstrap.

pub mod logging;
pub mod metrics;
pub mod track;
