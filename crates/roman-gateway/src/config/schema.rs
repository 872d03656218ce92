use std::net::SocketAddr;

use roman_core::error::{Result, RomanError};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub limits: LimitsSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            logging: LoggingSection::default(),
            limits: LimitsSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RomanError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.logging.validate()?;
        self.limits.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.shutdown_grace_ms > 60_000 {
            return Err(RomanError::Config(
                "server.shutdown_grace_ms must be between 0 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            RomanError::Config(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8000".into()
}
fn default_shutdown_grace_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    #[serde(default)]
    pub format: LogFormat,

    /// `EnvFilter` directive. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_filter(),
        }
    }
}

impl LoggingSection {
    pub fn validate(&self) -> Result<()> {
        if self.filter.trim().is_empty() {
            return Err(RomanError::Config("logging.filter must not be empty".into()));
        }
        Ok(())
    }
}

fn default_filter() -> String {
    "info".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSection {
    /// Largest number of integers a single range request may convert.
    /// Unset means no cap.
    #[serde(default)]
    pub max_range_span: Option<u32>,
}

impl LimitsSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.max_range_span {
            // a valid range always holds at least two values
            if limit < 2 {
                return Err(RomanError::Config(
                    "limits.max_range_span must be at least 2".into(),
                ));
            }
        }
        Ok(())
    }
}
