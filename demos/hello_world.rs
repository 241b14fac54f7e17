//! Hello World Example
//!
//! The simplest possible regex-mux application.
//!
//! Run with:
//! ```bash
//! cargo run --example hello_world
//! ```
//!
//! Then test:
//! ```bash
//! curl http://localhost:3000/
//! curl http://localhost:3000/hello/ada
//! curl -X OPTIONS -i http://localhost:3000/hello/ada
//! curl -i http://localhost:3000/a//b/../hello/ada
//! ```

use regex_mux::{Config, Context, Mux, Request, Result, json};
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Serialize)]
struct Message {
    message: String,
}

async fn index(_ctx: Context, _req: Request) -> &'static str {
    "Hello, World!"
}

async fn hello(_ctx: Context, req: Request) -> axum::response::Response {
    json(
        StatusCode::OK,
        &Message {
            message: format!("Hello, {}!", req.values().string_or("name", "stranger")),
        },
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from inline string
    // In production, use Config::default() to load from config/{RUST_ENV}.toml
    let config: Config = r#"
[http]
bind_addr = "127.0.0.1"
bind_port = 3000
max_payload_size_bytes = "1MiB"
request_timeout = "30s"

[logging]
format = "default"
"#
    .parse()?;
    config.validate()?;

    // Setup logging based on config
    config.setup_tracing();

    println!("Starting server on http://127.0.0.1:3000");

    let mux = Mux::from_config(config);
    mux.add("index", "^/$", index, &["GET"])?;
    mux.add("hello", r"^/hello/(?P<name>[a-z]+)$", hello, &["GET", "HEAD"])?;
    mux.start().await
}
