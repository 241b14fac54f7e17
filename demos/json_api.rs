//! JSON API Example
//!
//! Demonstrates a simple REST API with validated JSON request bodies.
//!
//! Run with:
//! ```bash
//! cargo run --example json_api
//! ```
//!
//! Then test:
//! ```bash
//! # List users
//! curl http://localhost:3000/users
//!
//! # Create a user
//! curl -X POST http://localhost:3000/users \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Alice", "email": "alice@example.com"}'
//!
//! # Rejected: name too short, email without '@'
//! curl -X POST http://localhost:3000/users -d '{"name": "A", "email": "x"}'
//!
//! # Get a user
//! curl http://localhost:3000/users/1
//!
//! # Describe the validation rules
//! curl http://localhost:3000/users/schema
//! ```

use axum::http::StatusCode;
use regex_mux::{
    Config, Context, Mux, Request, RequestInfo, Result, json, marshal,
    val::{Contains, Kind, Length, Set, Validator},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

// Data models
#[derive(Clone, Serialize)]
struct User {
    id: u64,
    name: String,
    email: String,
}

#[derive(Deserialize)]
struct CreateUser {
    name: String,
    email: String,
}

// In-memory user storage
#[derive(Default)]
struct Store {
    users: RwLock<Vec<User>>,
}

fn create_user_rules() -> Set {
    Set::new()
        .field(Validator::new("name", Kind::String).rule(Length::new(2, 64)))
        .field(Validator::new("email", Kind::String).rule(Contains::new("@")))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config: Config = r#"
[http]
bind_port = 3000
max_payload_size_bytes = "16KiB"

[logging]
format = "json"
"#
    .parse()?;
    config.setup_tracing();

    let store = Arc::new(Store::default());
    let mux = Mux::from_config(config);

    // Errors are reported as JSON documents.
    mux.error_handler(|status: StatusCode, message: &str, info: &RequestInfo| {
        json(
            status,
            &serde_json::json!({ "status": status.as_u16(), "error": message, "path": info.path() }),
        )
    });

    let list = store.clone();
    mux.add(
        "list-users",
        "^/users$",
        move |_ctx: Context, _req: Request| {
            let users = list.users.read().map(|u| u.clone()).unwrap_or_default();
            async move { json(StatusCode::OK, &users) }
        },
        &["GET"],
    )?;

    let create = store.clone();
    mux.add(
        "create-user",
        "^/users$",
        marshal(create_user_rules(), move |_ctx, _req, new: CreateUser| {
            let store = create.clone();
            async move {
                let Ok(mut users) = store.users.write() else {
                    return json(StatusCode::SERVICE_UNAVAILABLE, &"store unavailable");
                };
                let user = User {
                    id: users.len() as u64 + 1,
                    name: new.name,
                    email: new.email,
                };
                users.push(user.clone());
                json(StatusCode::CREATED, &user)
            }
        }),
        &["POST"],
    )?;

    let get = store.clone();
    mux.add(
        "get-user",
        r"^/users/(?P<id>[0-9]+)$",
        move |_ctx: Context, req: Request| {
            let id = req.values().uint_or("id", 0);
            let user = get
                .users
                .read()
                .ok()
                .and_then(|users| users.iter().find(|u| u.id == id).cloned());
            async move {
                match user {
                    Some(user) => json(StatusCode::OK, &user),
                    None => req
                        .mux()
                        .handle_error(StatusCode::NOT_FOUND, "user not found", req.info()),
                }
            }
        },
        &["GET"],
    )?;

    mux.add(
        "user-schema",
        "^/users/schema$",
        |_ctx: Context, _req: Request| async { json(StatusCode::OK, &create_user_rules()) },
        &["GET"],
    )?;

    println!("Starting server on http://127.0.0.1:3000");
    mux.start().await
}
