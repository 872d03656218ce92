//! Axum router wiring.
//!
//! Layer order, outermost first:
//! 1. request ID propagation (every route, including 404s)
//! 2. lifecycle tracking (conversion routes only)
//! 3. panic -> generic 500 (conversion routes only)

use std::any::Any;

use axum::{middleware, response::Response, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::error::internal_error_response;
use crate::{api, app_state::AppState, context, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let conversions = Router::new()
        .route("/v1/romannumeral", get(api::roman::convert))
        .route("/romannumeral", get(api::roman::convert));

    assemble(conversions, state)
}

/// Wraps `conversions` in the tracking and panic layers, mounts the
/// operational routes next to them, and applies request ID propagation.
pub fn assemble(conversions: Router<AppState>, state: AppState) -> Router {
    let conversions = conversions
        .route_layer(CatchPanicLayer::custom(panic_response))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            obs::track::track_request,
        ));

    Router::new()
        .merge(conversions)
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn(context::propagate_request_id))
        .with_state(state)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let msg = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    tracing::error!(panic = msg, "handler_panicked");
    internal_error_response()
}
