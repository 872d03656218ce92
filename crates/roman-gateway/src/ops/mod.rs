//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness, no dependency checks
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use roman_core::model::HealthStatus;

use crate::app_state::AppState;

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render();

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
