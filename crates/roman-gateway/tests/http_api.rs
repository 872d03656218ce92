//! End-to-end HTTP behaviour through the full router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::future::Future;
use std::task::Poll;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use roman_core::RomanError;
use roman_gateway::api::error::INTERNAL_DETAIL;
use roman_gateway::api::ApiError;
use roman_gateway::app_state::AppState;
use roman_gateway::config::GatewayConfig;
use roman_gateway::obs::track::CLIENT_CLOSED_REQUEST;
use roman_gateway::router::{assemble, build_router};

struct Reply {
    status: StatusCode,
    request_id: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

async fn send(app: &Router, uri: &str, request_id: Option<&str>) -> Reply {
    let mut req = Request::builder().uri(uri);
    if let Some(id) = request_id {
        req = req.header("x-request-id", HeaderValue::from_bytes(id.as_bytes()).unwrap());
    }
    let res = app
        .clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let header_str = |name: &str| {
        res.headers()
            .get(name)
            .map(|v| String::from_utf8(v.as_bytes().to_vec()).unwrap())
    };
    let request_id = header_str("x-request-id");
    let content_type = header_str(header::CONTENT_TYPE.as_str());
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec();
    Reply {
        status,
        request_id,
        content_type,
        body,
    }
}

fn app() -> Router {
    build_router(AppState::new(GatewayConfig::default()))
}

#[tokio::test]
async fn single_conversion() {
    let r = send(&app(), "/v1/romannumeral?query=10", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"input": "10", "output": "X"}));
}

#[tokio::test]
async fn unversioned_alias_behaves_the_same() {
    let app = app();
    let r = send(&app, "/romannumeral?query=10", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"input": "10", "output": "X"}));

    let r = send(&app, "/romannumeral?query=5&min=1&max=3", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_query_is_400() {
    let app = app();
    for uri in ["/v1/romannumeral?query=300", "/v1/romannumeral?query=0"] {
        let r = send(&app, uri, None).await;
        assert_eq!(r.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(r.json(), json!({"detail": "Input must be between 1 and 255"}));
    }
}

#[tokio::test]
async fn missing_parameters_is_400() {
    let app = app();
    let r = send(&app, "/v1/romannumeral", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.json(), json!({"detail": "Invalid query parameters"}));

    let r = send(&app, "/v1/romannumeral?min=1", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.json()["detail"], "Invalid query parameters");
}

#[tokio::test]
async fn mixed_parameters_is_400() {
    let r = send(&app(), "/v1/romannumeral?query=5&max=9", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        r.json()["detail"],
        "Provide either 'query' or 'min' and 'max', not both"
    );
}

#[tokio::test]
async fn non_integer_parameter_is_400() {
    let app = app();
    for uri in [
        "/v1/romannumeral?query=abc",
        "/v1/romannumeral?query=",
        "/v1/romannumeral?min=1&max=99999999999999999999999",
    ] {
        let r = send(&app, uri, None).await;
        assert_eq!(r.status, StatusCode::BAD_REQUEST, "{uri}");
        let detail = r.json()["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Invalid query parameters: "), "{detail}");
    }
}

#[tokio::test]
async fn range_conversion() {
    let r = send(&app(), "/v1/romannumeral?min=1&max=3", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(
        r.json(),
        json!({
            "conversions": [
                {"input": "1", "output": "I"},
                {"input": "2", "output": "II"},
                {"input": "3", "output": "III"},
            ]
        })
    );
}

#[tokio::test]
async fn range_min_not_below_max_is_400() {
    let r = send(&app(), "/v1/romannumeral?min=5&max=3", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.json(), json!({"detail": "min must be less than max"}));
}

#[tokio::test]
async fn range_member_out_of_domain_is_400() {
    let r = send(&app(), "/v1/romannumeral?min=250&max=260", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.json(), json!({"detail": "Input must be between 1 and 255"}));
}

#[tokio::test]
async fn range_cap_from_config() {
    let mut cfg = GatewayConfig::default();
    cfg.limits.max_range_span = Some(5);
    let app = build_router(AppState::new(cfg));

    let r = send(&app, "/v1/romannumeral?min=1&max=5", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json()["conversions"].as_array().unwrap().len(), 5);

    let r = send(&app, "/v1/romannumeral?min=1&max=6", None).await;
    assert_eq!(r.status, StatusCode::BAD_REQUEST);
    assert_eq!(r.json()["detail"], "Range of 6 values exceeds the limit of 5");
}

#[tokio::test]
async fn health() {
    let r = send(&app(), "/health", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(r.json(), json!({"status": "ok"}));
    assert!(r.request_id.is_some());
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let app = app();
    let a = send(&app, "/v1/romannumeral?query=5", None).await;
    let b = send(&app, "/v1/romannumeral?query=5", None).await;
    let (a, b) = (a.request_id.unwrap(), b.request_id.unwrap());
    assert_eq!(a.len(), 36, "{a}");
    assert_ne!(a, b);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = app();
    for uri in ["/v1/romannumeral?query=5", "/v1/romannumeral?query=999", "/health", "/nope"] {
        let r = send(&app, uri, Some("test-id-123")).await;
        assert_eq!(r.request_id.as_deref(), Some("test-id-123"), "{uri}");
    }
}

#[tokio::test]
async fn any_supplied_request_id_is_echoed_verbatim() {
    let app = app();
    let long = "x".repeat(200);
    for supplied in ["", "has space", "trace id/42 é", long.as_str()] {
        let r = send(&app, "/v1/romannumeral?query=5", Some(supplied)).await;
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.request_id.as_deref(), Some(supplied));
    }
}

#[tokio::test]
async fn metrics_reflect_traffic() {
    let app = app();
    send(&app, "/v1/romannumeral?query=10", None).await;
    send(&app, "/v1/romannumeral?query=300", None).await;
    send(&app, "/v1/romannumeral?min=1&max=3", None).await;
    send(&app, "/romannumeral?query=1", None).await;

    let r = send(&app, "/metrics", None).await;
    assert_eq!(r.status, StatusCode::OK);
    assert_eq!(
        r.content_type.as_deref(),
        Some("text/plain; version=0.0.4; charset=utf-8")
    );
    let text = r.text();
    assert!(text.contains(
        r#"http_requests_total{endpoint="/v1/romannumeral",method="GET",status="200"} 2"#
    ), "{text}");
    assert!(text.contains(
        r#"http_requests_total{endpoint="/v1/romannumeral",method="GET",status="400"} 1"#
    ), "{text}");
    assert!(text.contains(
        r#"http_requests_total{endpoint="/romannumeral",method="GET",status="200"} 1"#
    ), "{text}");
    assert!(text.contains(r#"http_request_latency_seconds_count{endpoint="/v1/romannumeral"} 3"#), "{text}");
    assert!(text.contains(r#"roman_conversions_total{type="single"} 3"#), "{text}");
    assert!(text.contains(r#"roman_conversions_total{type="range"} 1"#), "{text}");
    assert!(text.contains(r#"http_requests_in_flight{endpoint="/v1/romannumeral"} 0"#), "{text}");
}

#[tokio::test]
async fn rejected_shapes_do_not_count_as_conversions() {
    let app = app();
    send(&app, "/v1/romannumeral?min=5&max=3", None).await;
    send(&app, "/v1/romannumeral", None).await;

    let text = send(&app, "/metrics", None).await.text();
    assert!(!text.contains("roman_conversions_total{"), "{text}");
    assert!(text.contains(
        r#"http_requests_total{endpoint="/v1/romannumeral",method="GET",status="400"} 2"#
    ), "{text}");
}

#[tokio::test]
async fn internal_errors_hide_their_cause() {
    let res = ApiError::from(RomanError::Internal("slot 3 left empty".into())).into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v, json!({"detail": INTERNAL_DETAIL}));
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let app = app();
    let a = send(&app, "/v1/romannumeral?min=10&max=20", None).await;
    let b = send(&app, "/v1/romannumeral?min=10&max=20", None).await;
    assert_eq!(a.body, b.body);
}

#[tokio::test]
async fn dropped_range_request_is_still_recorded() {
    let state = AppState::new(GatewayConfig::default());
    let app = build_router(state.clone());
    let req = Request::builder()
        .uri("/v1/romannumeral?min=1&max=200")
        .body(Body::empty())
        .unwrap();

    // one poll gets the handler as far as waiting on its spawned conversions
    let mut pending = Box::pin(app.oneshot(req));
    let ready = std::future::poll_fn(|cx| Poll::Ready(pending.as_mut().poll(cx).is_ready())).await;
    assert!(!ready);

    let m = state.metrics();
    let endpoint = [("endpoint", "/v1/romannumeral")];
    assert_eq!(m.http_in_flight.get(&endpoint), 1);
    assert_eq!(m.conversions.get(&[("type", "range")]), 1);

    drop(pending);

    let status = CLIENT_CLOSED_REQUEST.to_string();
    assert_eq!(m.http_in_flight.get(&endpoint), 0);
    assert_eq!(m.http_latency.count(&endpoint), 1);
    assert_eq!(
        m.http_requests.get(&[
            ("method", "GET"),
            ("endpoint", "/v1/romannumeral"),
            ("status", status.as_str()),
        ]),
        1
    );
}

async fn explode() -> &'static str {
    panic!("conversion table corrupted")
}

#[tokio::test]
async fn handler_panic_becomes_generic_500() {
    let state = AppState::new(GatewayConfig::default());
    let app = assemble(
        Router::new().route("/v1/explode", get(explode)),
        state.clone(),
    );

    let r = send(&app, "/v1/explode", Some("panic-id-7")).await;
    assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(r.json(), json!({"detail": INTERNAL_DETAIL}));
    assert_eq!(r.request_id.as_deref(), Some("panic-id-7"));

    let text = send(&app, "/metrics", None).await.text();
    assert!(text.contains(
        r#"http_requests_total{endpoint="/v1/explode",method="GET",status="500"} 1"#
    ), "{text}");
    assert!(text.contains(r#"http_requests_in_flight{endpoint="/v1/explode"} 0"#), "{text}");
    assert!(!text.contains("conversion table corrupted"), "{text}");
}
