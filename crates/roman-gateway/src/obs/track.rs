//! Request lifecycle hook for the conversion routes.
//!
//! Every request that enters is logged once on receipt and once on
//! completion, and lands in `http_requests_total`,
//! `http_request_latency_seconds`, and `http_requests_in_flight`. Completion
//! is recorded from `Drop`, so it also runs when the request future is
//! dropped before a response exists (client went away mid range fan-out).
//! Those requests are recorded with status 499.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::Span;

use crate::app_state::AppState;
use crate::context::RequestContext;

/// Status recorded for a request dropped before it produced a response.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

struct Completion {
    state: AppState,
    span: Span,
    endpoint: String,
    method: String,
    started: Instant,
    status: Option<u16>,
}

impl Completion {
    fn start(state: AppState, span: Span, endpoint: String, method: String) -> Self {
        state
            .metrics()
            .http_in_flight
            .inc(&[("endpoint", endpoint.as_str())]);
        span.in_scope(|| tracing::info!(endpoint = %endpoint, "request_received"));
        Self {
            state,
            span,
            endpoint,
            method,
            started: Instant::now(),
            status: None,
        }
    }

    fn finish(mut self, status: u16) {
        self.status = Some(status);
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        let latency = self.started.elapsed();
        let status = self.status.unwrap_or(CLIENT_CLOSED_REQUEST);
        let status_label = status.to_string();
        let endpoint = self.endpoint.as_str();

        let metrics = self.state.metrics();
        metrics.http_in_flight.dec(&[("endpoint", endpoint)]);
        metrics.http_latency.observe(&[("endpoint", endpoint)], latency);
        metrics.http_requests.inc(&[
            ("method", self.method.as_str()),
            ("endpoint", endpoint),
            ("status", status_label.as_str()),
        ]);

        let cancelled = self.status.is_none();
        self.span.in_scope(|| {
            tracing::info!(
                endpoint = %endpoint,
                status,
                latency_seconds = latency.as_secs_f64(),
                cancelled,
                "request_completed"
            )
        });
    }
}

pub async fn track_request(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().as_str().to_owned();
    let span = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.span.clone())
        .unwrap_or_else(Span::current);

    let completion = Completion::start(state, span, endpoint, method);
    let res = next.run(req).await;
    completion.finish(res.status().as_u16());
    res
}
