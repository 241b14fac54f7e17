//! Benchmarks for measuring dispatch overhead.
//!
//! These benchmarks measure the latency the Mux adds on top of a bare axum
//! router, and how it grows with the size of the route table, middleware and
//! body validation.

use axum::{Router, body::Body, http::Request, routing::get};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use regex_mux::{
    Config, Mux, func,
    val::{Kind, Length, Set, Validator},
    wrap,
};
use std::hint::black_box;
use tower::ServiceExt;

fn test_config() -> Config {
    Config::from_toml("").expect("empty config should parse")
}

fn test_request(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

/// A Mux with `n` filler routes that sort before `^/target/(?P<id>[0-9]+)$`.
fn mux_with_routes(n: usize) -> Mux {
    let mux = Mux::from_config(test_config());
    for i in 0..n {
        mux.must(
            &format!("filler-{i}"),
            &format!("^/f{i}$"),
            func(|_, _| async { "filler" }),
            &["GET"],
        );
    }
    mux.must(
        "target",
        r"^/target/(?P<id>[0-9]+)$",
        func(|_, req| async move { req.values().uint_or("id", 0).to_string() }),
        &["GET"],
    );
    mux
}

/// Benchmark: bare axum router (baseline)
fn bench_bare_axum(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = Router::new().route("/target/{id}", get(|| async { "OK" }));

    c.bench_function("bare_axum", |b| {
        b.to_async(&rt).iter(|| async {
            let response = router
                .clone()
                .oneshot(test_request("/target/42"))
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: lookup cost as the route table grows
fn bench_route_table_size(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("route_table_size");

    for n in [1, 10, 100] {
        let mux = mux_with_routes(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.to_async(&rt).iter(|| async {
                let response = mux
                    .clone()
                    .oneshot(test_request("/target/42"))
                    .await
                    .unwrap();
                black_box(response)
            })
        });
    }
    group.finish();
}

/// Benchmark: global middleware plus a request timeout
fn bench_middleware_and_timeout(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mux = mux_with_routes(10);
    mux.set_timeout(std::time::Duration::from_secs(5));
    for _ in 0..3 {
        mux.middleware(|_, _, _| true);
    }

    c.bench_function("middleware_and_timeout", |b| {
        b.to_async(&rt).iter(|| async {
            let response = mux
                .clone()
                .oneshot(test_request("/target/42"))
                .await
                .unwrap();
            black_box(response)
        })
    });
}

/// Benchmark: validated JSON body
fn bench_validated_body(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mux = Mux::from_config(test_config());
    let rules = Set::new()
        .field(Validator::new("name", Kind::String).rule(Length::new(2, 64)))
        .field(Validator::new("age", Kind::Int));
    mux.must(
        "people",
        "^/people$",
        wrap(rules, |_, _, content| async move { content.len().to_string() }),
        &["POST"],
    );

    c.bench_function("validated_body", |b| {
        b.to_async(&rt).iter(|| async {
            let req = Request::builder()
                .method("POST")
                .uri("/people")
                .body(Body::from(r#"{"name":"Ada","age":36}"#))
                .unwrap();
            let response = mux.clone().oneshot(req).await.unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_bare_axum,
    bench_route_table_size,
    bench_middleware_and_timeout,
    bench_validated_body,
);
criterion_main!(benches);
