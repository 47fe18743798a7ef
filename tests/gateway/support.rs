use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request},
    response::Response,
};
use cinefind_backend::{
    catalog::{Catalog, Movie},
    config::{AppConfig, LogConfig, OtelConfig, SourceConfig},
    routes::{self, AppState},
    sources::{LocalSource, MovieSource, UpstreamSource},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub fn test_config(source: SourceConfig) -> AppConfig {
    AppConfig {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        source,
        environment: "test".into(),
        otel: OtelConfig {
            endpoint: None,
            service_name: "test".into(),
            disable_traces: true,
            disable_logs: true,
        },
        log: LogConfig {
            level: "info".into(),
        },
        cors_allowed_origins: Vec::new(),
    }
}

/// Gateway wired to an in-memory catalog (local mode).
pub fn local_app(movies: Vec<Movie>) -> Router {
    let catalog = Catalog::new(movies).expect("unique ids");
    let source = MovieSource::Local(LocalSource::new(catalog));
    let config = test_config(SourceConfig::Local { catalog_file: None });
    routes::router(AppState::new(Arc::new(config), Arc::new(source)))
}

/// Gateway forwarding to the upstream at `base_url` (proxy mode).
pub fn proxy_app(base_url: &str) -> Router {
    let base_url = reqwest::Url::parse(base_url).expect("valid base url");
    let source =
        MovieSource::Upstream(UpstreamSource::new(base_url.clone()).expect("upstream source"));
    let config = test_config(SourceConfig::Upstream { base_url });
    routes::router(AppState::new(Arc::new(config), Arc::new(source)))
}

pub fn numbered_movies(count: usize) -> Vec<Movie> {
    (1..=count)
        .map(|n| Movie {
            id: format!("m{n}"),
            title: format!("Movie {n}"),
            year: 2000,
            poster_url: None,
        })
        .collect()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    app.clone().oneshot(request).await.expect("router response")
}

pub async fn response_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body bytes")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("valid json payload")
}

/// Serve a stub upstream on an ephemeral loopback port.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub upstream");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub upstream");
    });
    format!("http://{addr}")
}
