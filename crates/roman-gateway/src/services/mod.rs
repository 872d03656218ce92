//! Conversion services sitting between the HTTP handlers and `roman-core`.

pub mod roman;

pub use roman::RomanService;
