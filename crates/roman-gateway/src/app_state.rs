//! Shared application state for the Roman gateway.
//!
//! Built once at startup. Cloning is cheap: everything sits behind `Arc`.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::obs::metrics::GatewayMetrics;
use crate::services::RomanService;

#[derive(Clone)]
pub struct AppState {
    roman: Arc<RomanService>,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    pub fn new(cfg: GatewayConfig) -> Self {
        Self {
            roman: Arc::new(RomanService::new(cfg.limits.max_range_span)),
            metrics: Arc::new(GatewayMetrics::new()),
        }
    }

    pub fn roman(&self) -> &RomanService {
        &self.roman
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }
}
