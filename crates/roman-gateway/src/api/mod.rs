//! Conversion API (`/v1/romannumeral` and its unversioned alias).

pub mod error;
pub mod roman;

pub use error::ApiError;
