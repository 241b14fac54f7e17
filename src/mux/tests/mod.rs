//! Test helpers for Mux unit tests.
//!
//! These tests drive the Mux as a tower service with `oneshot()`, without
//! network I/O.
//!
//! ## Available Helpers
//!
//! - `create_test_mux()`: a Mux built from default settings
//! - Request helpers: `get_request()`, `request()`, `post_json()`
//! - Response helpers: `get_body_string()`, `send()`

use crate::{Config, Mux};
use axum::{body::Body, http::Request, response::Response};
use tower::ServiceExt;

#[cfg(test)]
pub(crate) mod catch_panic;
#[cfg(test)]
pub(crate) mod errors;

const BASE_CONFIG_TOML: &str = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
max_payload_size_bytes = "1KiB"

[logging]
format = "compact"
"#;

pub(crate) fn create_base_config() -> Config {
    BASE_CONFIG_TOML
        .parse()
        .expect("Failed to parse test config TOML")
}

pub(crate) fn create_test_mux() -> Mux {
    Mux::from_config(create_base_config())
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    request("GET", uri)
}

pub(crate) fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(crate) fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(crate) async fn send(mux: &Mux, req: Request<Body>) -> Response {
    mux.clone().oneshot(req).await.unwrap()
}

pub(crate) async fn get_body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8_lossy(&body).to_string()
}
