//! Middleware Example
//!
//! Demonstrates global and per-route middleware, request timeouts and panic
//! recovery.
//!
//! Run with:
//! ```bash
//! cargo run --example with_middleware
//! ```
//!
//! Then test:
//! ```bash
//! # Security headers added by global middleware
//! curl -i http://localhost:3000/api/data
//!
//! # Rejected by route middleware without an API key
//! curl -i http://localhost:3000/api/admin
//! curl -i -H "x-api-key: secret" http://localhost:3000/api/admin
//!
//! # Cancelled by the request timeout
//! curl -i http://localhost:3000/api/slow
//!
//! # A panic becomes a 500
//! curl -i http://localhost:3000/api/panic
//! ```

use axum::http::{HeaderValue, StatusCode};
use regex_mux::{Config, Context, LogFormat, Mux, Request, Result};
use std::time::Duration;

async fn data(_ctx: Context, req: Request) -> String {
    format!("Hello from {}!", req.route())
}

async fn slow(ctx: Context, _req: Request) -> (StatusCode, &'static str) {
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(10)) => (StatusCode::OK, "done"),
        _ = ctx.cancelled() => (StatusCode::GATEWAY_TIMEOUT, "took too long"),
    }
}

async fn explode(_ctx: Context, _req: Request) -> &'static str {
    panic!("something went badly wrong")
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::default()
        .with_bind_port(3000)
        .with_request_timeout(Duration::from_secs(2))
        .with_log_format(LogFormat::Compact)
        .with_log_filter("regex_mux=debug,info");
    config.validate()?;
    config.setup_tracing();

    let mux = Mux::from_config(config);

    mux.middleware(|_ctx, res, req| {
        tracing::info!(method = %req.method(), path = %req.path(), "request");
        let headers = res.headers_mut();
        headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
        headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
        true
    });

    mux.add("data", "^/api/data$", data, &["GET"])?;
    mux.add("admin", "^/api/admin$", data, &["GET"])?
        .middleware(|_ctx, res, req| {
            if req.headers().get("x-api-key").is_some_and(|k| k == "secret") {
                return true;
            }
            *res.status_mut() = StatusCode::UNAUTHORIZED;
            false
        });
    mux.add("slow", "^/api/slow$", slow, &["GET"])?;
    mux.add("panic", "^/api/panic$", explode, &["GET"])?;

    println!("Starting server on http://127.0.0.1:3000");
    mux.start().await
}
