#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use std::sync::Arc;

use ledvision_api::dispatch::NotificationDispatcher;
use ledvision_api::handlers::AppState;
use ledvision_api::routes::build_router;
use ledvision_api::store::memory::InMemoryStore;

/// Router over a fresh in-memory store.
pub fn app_with(notifications: NotificationDispatcher) -> Router {
    build_router(Arc::new(AppState {
        store: Arc::new(InMemoryStore::new()),
        notifications,
    }))
}

pub fn app() -> Router {
    app_with(NotificationDispatcher::disabled())
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn raw_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
