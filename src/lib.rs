//! # regex-mux
//!
//! A regex path router for Tokio/axum hosts, with declarative validation of
//! JSON request bodies.
//!
//! Routes are regular expressions with named capture groups. Each pattern
//! can carry a default handler plus per-method handlers; requests are matched
//! against the shortest pattern first, after path cleaning. Around the
//! handler the [`Mux`] runs global and per-route middleware, applies a
//! cancellation deadline and turns panics into 500 responses.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use regex_mux::{Config, Context, Mux, Request, Result};
//!
//! async fn hello(_ctx: Context, req: Request) -> String {
//!     format!("Hello, {}!", req.values().string_or("name", "World"))
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default(); // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     let mux = Mux::from_config(config);
//!     mux.add("hello", r"^/hello/(?P<name>[a-z]+)$", hello, &["GET"])?;
//!     mux.start().await
//! }
//! ```
//!
//! # Validated bodies
//!
//! ```rust
//! use axum::http::StatusCode;
//! use regex_mux::{Mux, json, wrap, val::{Kind, Length, Set, Validator}};
//!
//! let rules = Set::new()
//!     .field(Validator::new("name", Kind::String).rule(Length::at_least(3)))
//!     .field(Validator::new("age", Kind::Int).optional());
//!
//! let mux = Mux::new();
//! mux.must(
//!     "people",
//!     "^/people$",
//!     wrap(rules, |_ctx, _req, person| async move {
//!         json(StatusCode::CREATED, &person)
//!     }),
//!     &["POST"],
//! );
//! ```
//!
//! A body failing validation never reaches the handler: the Mux answers 400
//! with a message such as `'name': length 2 must be at least 3`.
//!
//! # Configuration
//!
//! ```rust
//! use regex_mux::Config;
//! use std::time::Duration;
//!
//! let config: Config = r#"
//!     [http]
//!     bind_port = 8080
//!     request_timeout = "5s"
//!     max_payload_size_bytes = "64KiB"
//! "#.parse().unwrap();
//!
//! let config = config.with_request_timeout(Duration::from_secs(10));
//! assert_eq!(config.http.bind_port, 8080);
//! ```
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration loading and validation ([`Config`]) |
//! | [`mux`] | Routing, middleware, dispatch ([`Mux`]) |
//! | [`val`] | Declarative JSON validation ([`val::Set`]) |
//! | [`error`] | Error types ([`Error`]) |
//! | [`utils`] | Path cleaning ([`clean_path`]) |
pub mod config;
mod content;
pub mod error;
pub mod mux;
mod request;
pub mod utils;
pub mod val;
mod values;
mod wrapper;

pub use config::*;
pub use content::Content;
pub use error::*;
pub use mux::*;
pub use request::{Request, RequestInfo};
pub use utils::*;
pub use values::{Value, Values};
pub use wrapper::*;

pub type Result<T> = std::result::Result<T, Error>;
