use {
    super::{ErrorHandler, Handler, Mux, route::RouteHandler},
    crate::{
        Context, Request, RequestInfo, Values,
        utils::{clean_path, decode_path, encode_path},
    },
    axum::{
        body::Body,
        http::{
            self, HeaderValue, Method, StatusCode, Version,
            header::{ALLOW, CONNECTION, CONTENT_TYPE, LOCATION, X_CONTENT_TYPE_OPTIONS},
        },
        response::{IntoResponse, Response},
    },
    futures_util::{FutureExt, future::BoxFuture},
    std::{
        any::Any,
        convert::Infallible,
        panic::AssertUnwindSafe,
        sync::{Arc, PoisonError},
        task::Poll,
    },
    tokio_util::sync::CancellationToken,
    tower::Service,
};

/// Outcome of looking a path and method up in the route table.
pub(crate) enum Resolution {
    Found {
        handler: Arc<RouteHandler>,
        route: String,
        values: Values,
    },
    Options {
        allow: String,
    },
    MethodNotAllowed,
    NotFound,
}

impl Mux {
    /// Finds the first entry matching `path` and picks its handler for
    /// `method`. OPTIONS without an explicit handler is answered from the
    /// entry's method list before the entry's default handler is tried.
    pub(crate) fn resolve(&self, path: &str, method: &Method) -> Resolution {
        let routes = self
            .inner
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        for entry in routes.iter() {
            let Some(values) = entry.captures(path) else {
                continue;
            };
            tracing::debug!(path, route = %entry.name, pattern = %entry.source, "route matched");

            if let Some(handler) = entry.methods.get(method) {
                return Resolution::Found {
                    handler: handler.clone(),
                    route: entry.name.clone(),
                    values,
                };
            }
            if *method == Method::OPTIONS {
                return Resolution::Options {
                    allow: entry.allow(),
                };
            }
            if let Some(handler) = &entry.base {
                return Resolution::Found {
                    handler: handler.clone(),
                    route: entry.name.clone(),
                    values,
                };
            }
            tracing::warn!(path, %method, route = %entry.name, "method not allowed");
            return Resolution::MethodNotAllowed;
        }

        tracing::debug!(path, "no route matched");
        Resolution::NotFound
    }

    /// Routes one inbound request to completion.
    pub async fn serve(&self, req: http::Request<Body>) -> Response {
        if req.uri().path() == "*" {
            let mut res = StatusCode::BAD_REQUEST.into_response();
            if req.version() >= Version::HTTP_11 {
                res.headers_mut()
                    .insert(CONNECTION, HeaderValue::from_static("close"));
            }
            return res;
        }

        let base = self.base_context(&req);
        let Some(decoded) = decode_path(req.uri().path()) else {
            tracing::debug!(path = %req.uri().path(), "path is not valid UTF-8");
            let (parts, body) = req.into_parts();
            let req = Request::new(parts, body, "", Values::new(), self.clone(), base);
            return self.handle_error(
                StatusCode::BAD_REQUEST,
                reason(StatusCode::BAD_REQUEST),
                req.info(),
            );
        };

        let path = clean_path(&decoded);
        if path != decoded && self.inner.config.http.redirect_clean_paths {
            let mut location = encode_path(&path);
            if let Some(query) = req.uri().query() {
                location.push('?');
                location.push_str(query);
            }
            tracing::debug!(from = %req.uri().path(), to = %location, "redirecting to clean path");
            return redirect(&location);
        }

        let (parts, body) = req.into_parts();

        match self.resolve(&path, &parts.method) {
            Resolution::Found {
                handler,
                route,
                values,
            } => {
                let req = Request::new(parts, body, &route, values, self.clone(), base.clone());
                self.process(base, handler.handler.clone(), Some(handler), req)
                    .await
            }
            Resolution::Options { allow } => {
                let mut res = StatusCode::NO_CONTENT.into_response();
                if let Ok(allow) = HeaderValue::from_str(&allow) {
                    res.headers_mut().insert(ALLOW, allow);
                }
                res
            }
            Resolution::MethodNotAllowed => {
                let req = Request::new(parts, body, "", Values::new(), self.clone(), base);
                self.handle_error(
                    StatusCode::METHOD_NOT_ALLOWED,
                    reason(StatusCode::METHOD_NOT_ALLOWED),
                    req.info(),
                )
            }
            Resolution::NotFound => {
                let req = Request::new(parts, body, "", Values::new(), self.clone(), base.clone());
                match self.fallback() {
                    Some(handler) => self.process(base, handler, None, req).await,
                    None => self.handle_error(
                        StatusCode::NOT_FOUND,
                        reason(StatusCode::NOT_FOUND),
                        req.info(),
                    ),
                }
            }
        }
    }

    /// Reports `status` through the most specific error handler registered:
    /// the status-specific one, then the generic one, then a plain text
    /// response carrying the reason phrase.
    pub fn handle_error(&self, status: StatusCode, message: &str, info: &RequestInfo) -> Response {
        let handler: Option<Arc<dyn ErrorHandler>> = {
            let policy = self
                .inner
                .policy
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            let specific = match status {
                StatusCode::NOT_FOUND => policy.not_found.clone(),
                StatusCode::METHOD_NOT_ALLOWED => policy.method_not_allowed.clone(),
                StatusCode::INTERNAL_SERVER_ERROR => policy.internal_error.clone(),
                _ => None,
            };
            specific.or_else(|| policy.error.clone())
        };

        match handler {
            Some(handler) => handler.handle_error(status, message, info),
            None => plain_error(status),
        }
    }

    /// Runs middleware and the handler under the request timeout, turning a
    /// panic anywhere in the chain into a 500.
    async fn process(
        &self,
        base: Context,
        handler: Arc<dyn Handler>,
        route: Option<Arc<RouteHandler>>,
        req: Request,
    ) -> Response {
        let info = req.shared_info();
        let (ctx, _guard) = match self.timeout() {
            Some(timeout) => {
                let (ctx, guard) = base.with_timeout(timeout);
                (ctx, Some(guard))
            }
            None => (base, None),
        };
        let mut wares = self
            .inner
            .wares
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(route) = &route {
            wares.extend(route.wares());
        }

        let chain = async move {
            let mut scratch = Response::default();
            for ware in &wares {
                if !ware(&ctx, &mut scratch, &req) {
                    return scratch;
                }
            }
            let headers = std::mem::take(scratch.headers_mut());
            let mut res = handler.handle(ctx, req).await;
            for name in headers.keys() {
                if !res.headers().contains_key(name) {
                    for value in headers.get_all(name) {
                        res.headers_mut().append(name.clone(), value.clone());
                    }
                }
            }
            res
        };

        match AssertUnwindSafe(chain).catch_unwind().await {
            Ok(res) => res,
            Err(panic) => {
                let message = panic_message(&*panic);
                tracing::error!(
                    method = %info.method(),
                    path = %info.path(),
                    route = %info.route(),
                    panic = %message,
                    "handler panicked"
                );
                self.handle_error(StatusCode::INTERNAL_SERVER_ERROR, &message, &info)
            }
        }
    }

    fn fallback(&self) -> Option<Arc<dyn Handler>> {
        self.inner
            .policy
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .default
            .clone()
    }

    /// The root context when set, else a token carried by the inbound
    /// request, else a fresh one.
    fn base_context(&self, req: &http::Request<Body>) -> Context {
        let token = match self.inner.root.get() {
            Some(root) => root.child_token(),
            None => req
                .extensions()
                .get::<CancellationToken>()
                .map(CancellationToken::child_token)
                .unwrap_or_else(CancellationToken::new),
        };
        Context::from_token(token)
    }
}

impl Service<http::Request<Body>> for Mux {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<Body>) -> Self::Future {
        let mux = self.clone();
        Box::pin(async move { Ok(mux.serve(req).await) })
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

fn plain_error(status: StatusCode) -> Response {
    (
        status,
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8"),
            (X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        reason(status),
    )
        .into_response()
}

fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response(),
        Err(_) => plain_error(StatusCode::BAD_REQUEST),
    }
}

/// Renders a panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(err) = payload.downcast_ref::<crate::Error>() {
        err.to_string()
    } else if let Some(err) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        err.to_string()
    } else {
        "unknown panic".to_string()
    }
}
