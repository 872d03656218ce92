//! `RomanError` -> HTTP response mapping.
//!
//! Client errors become `400 {"detail": <message>}`. Internal errors become a
//! generic 500 whose body never includes the underlying cause.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use roman_core::error::{ClientCode, RomanError};
use roman_core::model::ErrorBody;

/// Body detail of every 500 response.
pub const INTERNAL_DETAIL: &str = "Internal Server Error";

#[derive(Debug)]
pub struct ApiError(RomanError);

impl From<RomanError> for ApiError {
    fn from(e: RomanError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0.client_code() {
            ClientCode::BadRequest => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::new(self.0.to_string())),
            )
                .into_response(),
            ClientCode::Internal => internal_error_response(),
        }
    }
}

pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(INTERNAL_DETAIL)),
    )
        .into_response()
}
