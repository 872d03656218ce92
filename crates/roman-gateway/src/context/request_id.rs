//! `X-Request-ID` propagation.
//!
//! - An inbound header is echoed back exactly as it arrived.
//! - Only when the header is absent is a UUID v4 generated.
//! - The ID and the `request` span recording it are stored in the request
//!   extensions as a `RequestContext`; the span wraps the rest of the stack.

use std::fmt;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, Span};
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(HeaderValue);

impl RequestId {
    pub fn generate() -> Self {
        let id = Uuid::new_v4().hyphenated().to_string();
        // a hyphenated UUID is always a valid header value
        let value = HeaderValue::from_str(&id)
            .unwrap_or_else(|_| HeaderValue::from_static("00000000-0000-0000-0000-000000000000"));
        Self(value)
    }

    pub fn from_header(value: &HeaderValue) -> Self {
        Self(value.clone())
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.to_str() {
            Ok(s) => f.write_str(s),
            Err(_) => f.write_str(&String::from_utf8_lossy(self.0.as_bytes())),
        }
    }
}

/// Per-request values handed to handlers and the lifecycle hook.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    /// `request` span carrying `request_id`; events logged in it inherit the ID.
    pub span: Span,
}

pub async fn propagate_request_id(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .map(RequestId::from_header)
        .unwrap_or_else(RequestId::generate);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
        span: span.clone(),
    });

    let mut res = next.run(req).instrument(span).await;
    res.headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), request_id.header_value().clone());
    res
}
