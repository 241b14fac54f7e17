//! Error handler selection.

use super::{create_test_mux, get_body_string, get_request, post_json, request, send};
use crate::{RequestInfo, func, json, val::{Kind, Set, Validator}, wrap};
use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json as json_value;

fn labelled(label: &'static str) -> impl Fn(StatusCode, &str, &RequestInfo) -> Response {
    move |status: StatusCode, message: &str, info: &RequestInfo| -> Response {
        (status, format!("{label}: {message} ({})", info.path())).into_response()
    }
}

#[tokio::test]
async fn test_default_error_response() {
    let mux = create_test_mux();

    let response = send(&mux, get_request("/missing")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(get_body_string(response).await, "Not Found");
}

#[tokio::test]
async fn test_generic_handler_covers_all_statuses() {
    let mux = create_test_mux();
    mux.error_handler(labelled("generic"));
    mux.must("read", "^/read$", func(|_, _| async { "" }), &["GET"]);

    let response = send(&mux, get_request("/missing")).await;
    assert_eq!(
        get_body_string(response).await,
        "generic: Not Found (/missing)"
    );

    let response = send(&mux, request("POST", "/read")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        get_body_string(response).await,
        "generic: Method Not Allowed (/read)"
    );
}

#[tokio::test]
async fn test_specific_handlers_take_precedence() {
    let mux = create_test_mux();
    mux.error_handler(labelled("generic"))
        .not_found_handler(labelled("not-found"))
        .method_not_allowed_handler(labelled("not-allowed"));
    mux.must("read", "^/read$", func(|_, _| async { "" }), &["GET"]);

    let response = send(&mux, get_request("/missing")).await;
    assert_eq!(
        get_body_string(response).await,
        "not-found: Not Found (/missing)"
    );

    let response = send(&mux, request("DELETE", "/read")).await;
    assert_eq!(
        get_body_string(response).await,
        "not-allowed: Method Not Allowed (/read)"
    );
}

#[tokio::test]
async fn test_rejected_content_is_reported_as_bad_request() {
    let mux = create_test_mux();
    mux.error_handler(labelled("generic"));
    let rules = Set::new().field(Validator::new("name", Kind::String));
    mux.must(
        "create",
        "^/items$",
        wrap(rules, |_, _, content| async move {
            json(StatusCode::CREATED, &content)
        }),
        &["POST"],
    );

    let response = send(&mux, post_json("/items", r#"{"name": 3}"#)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        get_body_string(response).await,
        "generic: 'name': expected 'string' but got 'number' (/items)"
    );

    let response = send(&mux, post_json("/items", r#"{"name": "a"}"#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: serde_json::Value =
        serde_json::from_str(&get_body_string(response).await).unwrap();
    assert_eq!(body, json_value!({"name": "a"}));
}

#[tokio::test]
async fn test_handle_error_is_public() {
    let mux = create_test_mux();
    mux.must(
        "teapot",
        "^/teapot$",
        func(|_, req| async move {
            req.mux()
                .handle_error(StatusCode::IM_A_TEAPOT, "short and stout", req.info())
        }),
        &[],
    );

    let response = send(&mux, get_request("/teapot")).await;
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(get_body_string(response).await, "I'm a teapot");
}
