use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, SECRET};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_query_and_headers() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/echo?page=2&q=ann")
                .header("X-Trace", "t-1")
                .header(http::header::AUTHORIZATION, "Bearer abc")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/echo");
    assert_eq!(echo.query["page"], "2");
    assert_eq!(echo.query["q"], "ann");
    assert_eq!(echo.headers["x-trace"], "t-1");
    assert_eq!(echo.headers["authorization"], "Bearer abc");
    assert!(echo.body.is_null());
}

#[tokio::test]
async fn echo_decodes_json_body() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"name":"lamp"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.body, json!({"name": "lamp"}));
}

// --- faults ---

#[tokio::test]
async fn unknown_route_is_json_404() {
    let resp = app().oneshot(get("/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "not found"}));
}

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app().oneshot(get("/status/503")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "Service Unavailable", "status": 503}));
}

#[tokio::test]
async fn empty_route_has_no_body() {
    let resp = app().oneshot(get("/empty/404")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn text_route_is_plain() {
    let resp = app().oneshot(get("/text")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"pong");
}

#[tokio::test]
async fn slow_route_reports_delay() {
    let resp = app().oneshot(get("/slow?ms=5")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"slept": 5}));
}

#[tokio::test]
async fn big_route_returns_json_string_of_requested_size() {
    let resp = app().oneshot(get("/big?bytes=16")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: String = body_json(resp).await;
    assert_eq!(body, "a".repeat(16));
}

// --- auth ---

#[tokio::test]
async fn protected_rejects_missing_token() {
    let resp = app().oneshot(get("/protected")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"error": "unauthorized"}));
}

#[tokio::test]
async fn protected_accepts_bearer_secret() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/protected")
                .header(http::header::AUTHORIZATION, format!("Bearer {SECRET}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"ok": true}));
}
