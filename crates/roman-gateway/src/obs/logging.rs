//! Subscriber bootstrap.
//!
//! `RUST_LOG` wins over `logging.filter`. JSON output carries the current span,
//! which is how the `request_id` lands on every line emitted inside a request.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use roman_core::error::{Result, RomanError};

use crate::config::{LogFormat, LoggingSection};

pub fn init(cfg: &LoggingSection) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .map_err(|e| RomanError::Config(format!("logging.filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let res = match cfg.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };

    res.map_err(|e| RomanError::Internal(format!("logging init failed: {e}")))
}
