//! Handler, error handler and middleware capabilities.
//!
//! A route handler is anything implementing [`Handler`]: named async
//! functions taking `(Context, Request)` work directly, closures go through
//! [`func`], tower services (including an `axum::Router`) go through
//! [`Convert`].

use {
    super::Context,
    crate::{Request, RequestInfo},
    axum::{
        body::Body,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    futures_util::future::BoxFuture,
    std::{fmt, future::Future, sync::Arc},
    tower::{Service, ServiceExt},
};

/// Produces the response for a routed request.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, ctx: Context, req: Request) -> BoxFuture<'static, Response>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn handle(&self, ctx: Context, req: Request) -> BoxFuture<'static, Response> {
        let fut = self(ctx, req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// A closure adapted into a [`Handler`]. See [`func`].
#[derive(Clone)]
pub struct Func<F>(F);

impl<F> fmt::Debug for Func<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Func")
    }
}

/// Wraps a closure as a [`Handler`], pinning down its argument types.
///
/// ```rust
/// use regex_mux::{Mux, func};
///
/// let mux = Mux::new();
/// mux.must("hello", "^/hello$", func(|_ctx, _req| async { "hi" }), &["GET"]);
/// ```
pub fn func<F, Fut, R>(f: F) -> Func<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Func(f)
}

impl<F, Fut, R> Handler for Func<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn handle(&self, ctx: Context, req: Request) -> BoxFuture<'static, Response> {
        let fut = (self.0)(ctx, req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// Adapts a tower service into a [`Handler`].
///
/// The request is handed over as a plain `http::Request<Body>`; the route
/// [`Values`](crate::Values) are inserted into its extensions. Service errors
/// become a 500 response.
///
/// ```rust
/// use axum::{Router, routing::get};
/// use regex_mux::{Convert, Mux};
///
/// let legacy = Router::new().route("/legacy/ping", get(|| async { "pong" }));
/// let mux = Mux::new();
/// mux.must("legacy", "^/legacy/.*$", Convert::new(legacy), &[]);
/// ```
#[derive(Debug, Clone)]
pub struct Convert<S> {
    inner: S,
}

impl<S> Convert<S> {
    pub fn new(inner: S) -> Self {
        Convert { inner }
    }
}

impl<S> Handler for Convert<S>
where
    S: Service<axum::http::Request<Body>> + Clone + Send + Sync + 'static,
    S::Response: IntoResponse,
    S::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    S::Future: Send,
{
    fn handle(&self, _ctx: Context, req: Request) -> BoxFuture<'static, Response> {
        let svc = self.inner.clone();
        let values = req.values().clone();
        let mut req = req.into_http();
        req.extensions_mut().insert(values);
        Box::pin(async move {
            match svc.oneshot(req).await {
                Ok(res) => res.into_response(),
                Err(err) => {
                    let err: Box<dyn std::error::Error + Send + Sync> = err.into();
                    crate::Error::internal(err.to_string()).into_response()
                }
            }
        })
    }
}

/// Reports a routing or processing failure as a response.
///
/// The message is the reason text (404/405), the panic text (500) or the
/// content error (400 from [`Wrap`](crate::Wrap)/[`Marshal`](crate::Marshal)).
pub trait ErrorHandler: Send + Sync + 'static {
    fn handle_error(&self, status: StatusCode, message: &str, info: &RequestInfo) -> Response;
}

impl<F> ErrorHandler for F
where
    F: Fn(StatusCode, &str, &RequestInfo) -> Response + Send + Sync + 'static,
{
    fn handle_error(&self, status: StatusCode, message: &str, info: &RequestInfo) -> Response {
        self(status, message, info)
    }
}

/// A pre-handler hook.
///
/// Middleware runs before the handler against a scratch response. Returning
/// `false` stops the chain and the scratch response is sent as is. Returning
/// `true` continues; headers set on the scratch response are copied onto the
/// handler response unless the handler set them itself.
pub type Middleware = Arc<dyn Fn(&Context, &mut Response, &Request) -> bool + Send + Sync>;
