//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use roman_core::error::{Result, RomanError};

pub use schema::{GatewayConfig, LimitsSection, LogFormat, LoggingSection, ServerSection};

/// Default config path when neither a CLI argument nor `ROMAN_CONFIG` is given.
pub const DEFAULT_PATH: &str = "roman.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RomanError::Config(format!("read {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| RomanError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path`, falling back to built-in defaults when the file does not exist.
///
/// Returns whether the defaults were used so the caller can log it once the
/// subscriber is installed.
pub fn load_or_default(path: &str) -> Result<(GatewayConfig, bool)> {
    match fs::read_to_string(Path::new(path)) {
        Ok(s) => Ok((load_from_str(&s)?, false)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok((GatewayConfig::default(), true)),
        Err(e) => Err(RomanError::Config(format!("read {path} failed: {e}"))),
    }
}

/// Resolve the config path: first CLI argument, then `ROMAN_CONFIG`, then the default.
pub fn resolve_path(arg: Option<String>) -> String {
    arg.or_else(|| std::env::var("ROMAN_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_PATH.to_string())
}
