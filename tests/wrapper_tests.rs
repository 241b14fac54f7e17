//! End-to-end tests of the body adapters through a Mux.
//!
//! The Mux is driven in-process as a tower service.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use regex_mux::{
    Config, Context, ErrorKind, Mux, RequestInfo, json, marshal, marshal_body,
    val::{Kind, Length, Min, Rule, Set, Validator, id},
    wrap, wrap_content,
};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;

#[derive(Debug, Deserialize, Serialize)]
struct NewUser {
    name: String,
    age: u32,
}

fn user_rules() -> Set {
    Set::new()
        .field(Validator::new("name", Kind::String).rule(Length::new(2, 32)))
        .field(Validator::new("age", Kind::Int).rule(Min(18.0)))
}

fn test_mux() -> Mux {
    let config: Config = r#"
        [http]
        max_payload_size_bytes = "256B"
    "#
    .parse()
    .unwrap();
    Mux::from_config(config)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(mux: &Mux, req: Request<Body>) -> (StatusCode, String) {
    let response: Response = mux.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).to_string())
}

#[tokio::test]
async fn marshal_validates_then_decodes() {
    let mux = test_mux();
    mux.must(
        "users",
        "^/users$",
        marshal(user_rules(), |_ctx, _req, user: NewUser| async move {
            json(StatusCode::CREATED, &user)
        }),
        &["POST"],
    );

    let (status, body) = call(&mux, post("/users", r#"{"name":"Ada","age":36}"#)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, r#"{"name":"Ada","age":36}"#);

    let (status, body) = call(&mux, post("/users", r#"{"name":"Ada","age":12}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Bad Request");

    let (status, _) = call(&mux, post("/users", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn error_handler_sees_the_rejection_reason() {
    let mux = test_mux();
    mux.error_handler(|status: StatusCode, message: &str, _: &RequestInfo| {
        json(status, &serde_json::json!({ "error": message }))
    });
    mux.must(
        "users",
        "^/users$",
        marshal(user_rules(), |_ctx, _req, user: NewUser| async move { user.name }),
        &["POST"],
    );

    let cases = [
        (r#"{"age":20}"#, "'name': required"),
        (r#"{"name":"A","age":20}"#, "'name': length 1 must be at least 2"),
        (r#"{"name":"Ada","age":20.5}"#, "'age': expected 'integer' but got 'float'"),
        (r#"{"name":"Ada","age":17}"#, "'age': value 17 cannot be less than 18"),
        ("", "missing HTTP body"),
        ("null", "'name': required"),
    ];
    for (input, expected) in cases {
        let (status, body) = call(&mux, post("/users", input)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "input {input}");
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["error"], expected, "input {input}");
    }
}

#[tokio::test]
async fn wrap_content_accepts_empty_bodies() {
    let mux = test_mux();
    mux.must(
        "echo",
        "^/echo$",
        wrap_content(|_ctx: Context, _req, content| async move {
            format!("{} keys", content.len())
        }),
        &["POST"],
    );

    let (status, body) = call(&mux, post("/echo", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "0 keys");

    let (_, body) = call(&mux, post("/echo", r#"{"a":1,"b":2}"#)).await;
    assert_eq!(body, "2 keys");

    let (status, _) = call(&mux, post("/echo", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let mux = test_mux();
    mux.must(
        "echo",
        "^/echo$",
        wrap_content(|_, _, content| async move { content.len().to_string() }),
        &[],
    );

    let big = format!(r#"{{"pad":"{}"}}"#, "x".repeat(512));
    let (status, _) = call(&mux, post("/echo", &big)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn path_values_and_content_together() {
    let mux = test_mux();
    let id_rule = id();
    mux.must(
        "rename",
        r"^/users/(?P<id>[0-9]+)$",
        wrap(
            Set::new().field(Validator::new("name", Kind::String)),
            move |_ctx, req, content| {
                let rules = id_rule.clone();
                async move {
                    let id = match req.values().uint("id") {
                        Ok(id) => id,
                        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()),
                    };
                    let valid = rules
                        .iter()
                        .all(|rule| rule.validate(&serde_json::json!(id)).is_ok());
                    if !valid {
                        return (StatusCode::NOT_FOUND, format!("no user {id}"));
                    }
                    (
                        StatusCode::OK,
                        format!("user {id} is now {}", content.string_or("name", "")),
                    )
                }
            },
        ),
        &["PUT"],
    );

    let put = |uri: &str, body: &str| {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let (status, body) = call(&mux, put("/users/7", r#"{"name":"Grace"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "user 7 is now Grace");

    let (status, body) = call(&mux, put("/users/0", r#"{"name":"Grace"}"#)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "no user 0");
}

#[tokio::test]
async fn marshal_body_skips_validation() {
    let mux = test_mux();
    mux.must(
        "users",
        "^/users$",
        marshal_body(|_ctx, _req, user: NewUser| async move { user.age.to_string() }),
        &["POST"],
    );

    let (status, body) = call(&mux, post("/users", r#"{"name":"A","age":3}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "3");

    let (status, _) = call(&mux, post("/users", r#"{"name":"A"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[test]
fn content_errors_have_kinds() {
    let content = regex_mux::Content::try_from(serde_json::json!({"n": "x"})).unwrap();
    assert_eq!(content.int("n").unwrap_err().kind(), ErrorKind::InvalidType);
    assert_eq!(content.int("m").unwrap_err().kind(), ErrorKind::NotExists);
}
