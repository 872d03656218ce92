//! Conversion handler.
//!
//! Parse -> validate shape -> dispatch to single or range -> respond.
//! Lifecycle logging and request metrics are handled by `obs::track` around
//! this handler; only the conversion counter is bumped here.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use roman_core::error::{Result, RomanError};
use roman_core::model::{ConversionRange, ConversionResponse};
use roman_core::request::ConversionRequest;

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::context::RequestContext;

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct RomanQuery {
    pub query: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

pub async fn convert(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    params: std::result::Result<Query<RomanQuery>, QueryRejection>,
) -> std::result::Result<Json<ConversionResponse>, ApiError> {
    // malformed input logs empty parameter fields; the reason is in `error`
    let (q, outcome) = match params {
        Ok(Query(q)) => (q, dispatch(&state, q).await),
        Err(rejection) => (
            RomanQuery::default(),
            Err(RomanError::MalformedParameters(rejection.body_text())),
        ),
    };

    outcome.map(Json).map_err(|err| reject(&ctx, q, err))
}

async fn dispatch(state: &AppState, q: RomanQuery) -> Result<ConversionResponse> {
    let request = ConversionRequest::from_params(q.query, q.min, q.max)?;
    state
        .metrics()
        .conversions
        .inc(&[("type", request.kind().as_str())]);

    match request {
        ConversionRequest::Single(n) => {
            Ok(ConversionResponse::Single(state.roman().convert_single(n)?))
        }
        ConversionRequest::Range(bounds) => {
            let conversions = state
                .roman()
                .expand_range(bounds.min(), bounds.max())
                .await?;
            Ok(ConversionResponse::Range(ConversionRange { conversions }))
        }
    }
}

/// Logs the failure in the request's span and converts it for the response.
fn reject(ctx: &RequestContext, q: RomanQuery, err: RomanError) -> ApiError {
    ctx.span.in_scope(|| {
        if err.is_client_error() {
            tracing::warn!(
                error = %err,
                query = q.query,
                min = q.min,
                max = q.max,
                "invalid_input"
            );
        } else {
            tracing::error!(error = %err, "internal_error");
        }
    });
    ApiError::from(err)
}
