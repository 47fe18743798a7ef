use super::support::{get, proxy_app, response_json, spawn_upstream};
use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    routing::get as axum_get,
};
use serde_json::{Value, json};
use std::collections::HashMap;

fn upstream_ok(params: Query<HashMap<String, String>>) -> Json<Value> {
    // Echo the received parameters so tests can observe what was forwarded.
    let Query(params) = params;
    Json(json!({
        "query": params.get("query").cloned().unwrap_or_default(),
        "page": params.get("page").and_then(|p| p.parse::<u64>().ok()).unwrap_or(1),
        "pageSize": params.get("pageSize").and_then(|p| p.parse::<u64>().ok()).unwrap_or(8),
        "total": 1,
        "totalPages": 1,
        "results": [{"id": "tt0133093", "title": "The Matrix", "year": 1999}]
    }))
}

#[tokio::test]
async fn relays_a_conforming_upstream_page() {
    let stub = Router::new().route(
        "/v1/movies/search",
        axum_get(|params: Query<HashMap<String, String>>| async move { upstream_ok(params) }),
    );
    let base_url = spawn_upstream(stub).await;
    let app = proxy_app(&base_url);

    let response = get(&app, "/api/movies?q=matrix&page=2&pageSize=100").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    // `q` was renamed to `query`; page and pageSize passed through unclamped.
    assert_eq!(json["query"], "matrix");
    assert_eq!(json["page"], 2);
    assert_eq!(json["pageSize"], 100);
    assert_eq!(json["results"][0]["title"], "The Matrix");
}

#[tokio::test]
async fn missing_parameters_forward_their_defaults() {
    let stub = Router::new().route(
        "/v1/movies/search",
        axum_get(|params: Query<HashMap<String, String>>| async move { upstream_ok(params) }),
    );
    let base_url = spawn_upstream(stub).await;
    let app = proxy_app(&base_url);

    let json = response_json(get(&app, "/api/movies").await).await;
    assert_eq!(json["query"], "");
    assert_eq!(json["page"], 1);
    assert_eq!(json["pageSize"], 8);
}

#[tokio::test]
async fn upstream_failure_status_becomes_bad_gateway() {
    let stub = Router::new().route(
        "/v1/movies/search",
        axum_get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = spawn_upstream(stub).await;
    let app = proxy_app(&base_url);

    let response = get(&app, "/api/movies?q=matrix").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = response_json(response).await;
    assert_eq!(json["error"], "Upstream error 500");
}

#[tokio::test]
async fn unreachable_upstream_becomes_bad_gateway() {
    // Grab a port that nothing listens on by binding and dropping a listener.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let app = proxy_app(&base_url);
    let response = get(&app, "/api/movies?q=matrix").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = response_json(response).await;
    assert_eq!(json["error"], "upstream request failed");
}

#[tokio::test]
async fn malformed_upstream_body_becomes_bad_gateway() {
    let stub = Router::new().route(
        "/v1/movies/search",
        axum_get(|| async { Json(json!({"unexpected": "shape"})) }),
    );
    let base_url = spawn_upstream(stub).await;
    let app = proxy_app(&base_url);

    let response = get(&app, "/api/movies?q=matrix").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = response_json(response).await;
    assert_eq!(json["error"], "upstream returned a malformed search response");
}
