//! Panics in handlers and middleware become 500 responses.

use super::{create_test_mux, get_body_string, get_request, send};
use crate::{RequestInfo, func};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::{Arc, Mutex};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_handler_panic_returns_internal_server_error() {
    let mux = create_test_mux();
    mux.must(
        "panic",
        "^/panic$",
        func(|_, _| async {
            panic!("Test panic!");
            #[allow(unreachable_code)]
            "This will never be reached"
        }),
        &[],
    );
    mux.must("normal", "^/normal$", func(|_, _| async { "OK" }), &[]);

    let response = send(&mux, get_request("/panic")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; charset=utf-8"
    );
    assert_eq!(get_body_string(response).await, "Internal Server Error");
    assert!(logs_contain("handler panicked"));
    assert!(logs_contain("Test panic!"));

    // The Mux keeps serving after a panic.
    let response = send(&mux, get_request("/normal")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_string(response).await, "OK");
}

#[tokio::test]
async fn test_internal_error_handler_receives_panic_message() {
    let mux = create_test_mux();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    mux.internal_error_handler(
        move |status: StatusCode, message: &str, info: &RequestInfo| -> Response {
            sink.lock()
                .unwrap()
                .push(format!("{} {} {}", status.as_u16(), info.route(), message));
            (status, "custom").into_response()
        },
    );
    mux.must(
        "formatted",
        "^/formatted$",
        func(|_, _| async {
            let id = 7;
            panic!("item {id} exploded");
            #[allow(unreachable_code)]
            ""
        }),
        &[],
    );
    mux.must(
        "typed",
        "^/typed$",
        func(|_, _| async {
            std::panic::panic_any(crate::Error::internal("typed failure"));
            #[allow(unreachable_code)]
            ""
        }),
        &[],
    );
    mux.must(
        "opaque",
        "^/opaque$",
        func(|_, _| async {
            std::panic::panic_any(42u8);
            #[allow(unreachable_code)]
            ""
        }),
        &[],
    );

    for path in ["/formatted", "/typed", "/opaque"] {
        let response = send(&mux, get_request(path)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(get_body_string(response).await, "custom");
    }
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "500 formatted item 7 exploded",
            "500 typed typed failure",
            "500 opaque unknown panic",
        ]
    );
}

#[tokio::test]
async fn test_middleware_panic_is_caught() {
    let mux = create_test_mux();
    mux.middleware(|_, _, req| {
        if req.path() == "/boom" {
            panic!("middleware failure");
        }
        true
    });
    mux.must("boom", "^/boom$", func(|_, _| async { "unreachable" }), &[]);

    let response = send(&mux, get_request("/boom")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
