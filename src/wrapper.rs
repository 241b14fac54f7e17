//! Handler adapters that decode the request body before the handler runs.
//!
//! [`wrap`] hands the handler the body as [`Content`]; [`marshal`] hands it a
//! deserialized value. Both can validate the body with a
//! [`Validate`](crate::val::Validate) implementation first. Decoding and
//! validation failures never reach the handler: they are reported as a 400
//! through [`Mux::handle_error`](crate::Mux::handle_error), with the error
//! text as message.
//!

use {
    crate::{Content, Context, Handler, Request, val::Validate},
    axum::{
        http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
        response::{IntoResponse, Response},
    },
    futures_util::future::BoxFuture,
    serde::{Serialize, de::DeserializeOwned},
    std::{future::Future, marker::PhantomData, sync::Arc},
};

/// A handler receiving the decoded body as [`Content`]. See [`wrap`].
pub struct Wrap<F> {
    validator: Option<Arc<dyn Validate>>,
    handler: Arc<F>,
}

/// Decodes the body as content, validates it, then calls `handler`.
///
/// ```rust
/// use regex_mux::{Mux, json, wrap, val::{Kind, Set, Validator}};
/// use axum::http::StatusCode;
///
/// let rules = Set::new().field(Validator::new("name", Kind::String));
/// let mux = Mux::new();
/// mux.must(
///     "create",
///     "^/items$",
///     wrap(rules, |_ctx, _req, content| async move {
///         json(StatusCode::CREATED, &content)
///     }),
///     &["POST"],
/// );
/// ```
pub fn wrap<V, F, Fut, R>(validator: V, handler: F) -> Wrap<F>
where
    V: Validate + 'static,
    F: Fn(Context, Request, Content) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Wrap {
        validator: Some(Arc::new(validator)),
        handler: Arc::new(handler),
    }
}

/// Like [`wrap`] without validation.
pub fn wrap_content<F, Fut, R>(handler: F) -> Wrap<F>
where
    F: Fn(Context, Request, Content) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Wrap {
        validator: None,
        handler: Arc::new(handler),
    }
}

impl<F, Fut, R> Handler for Wrap<F>
where
    F: Fn(Context, Request, Content) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn handle(&self, ctx: Context, mut req: Request) -> BoxFuture<'static, Response> {
        let validator = self.validator.clone();
        let handler = self.handler.clone();
        Box::pin(async move {
            let content = match &validator {
                Some(validator) => req.validate_content(validator.as_ref()).await,
                None => req.content().await,
            };
            match content {
                Ok(content) => handler(ctx, req, content).await.into_response(),
                Err(err) => bad_request(&req, &err),
            }
        })
    }
}

/// A handler receiving the body deserialized as `T`. See [`marshal`].
pub struct Marshal<T, F> {
    validator: Option<Arc<dyn Validate>>,
    handler: Arc<F>,
    _target: PhantomData<fn() -> T>,
}

/// Validates the body as content, deserializes it into `T`, then calls
/// `handler`. An empty body is rejected.
///
/// ```rust
/// use regex_mux::{Mux, marshal, val::{Kind, Set, Validator}};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct NewItem { name: String }
///
/// let rules = Set::new().field(Validator::new("name", Kind::String));
/// let mux = Mux::new();
/// mux.must(
///     "create",
///     "^/items$",
///     marshal(rules, |_ctx, _req, item: NewItem| async move { item.name }),
///     &["POST"],
/// );
/// ```
pub fn marshal<T, V, F, Fut, R>(validator: V, handler: F) -> Marshal<T, F>
where
    T: DeserializeOwned + Send + 'static,
    V: Validate + 'static,
    F: Fn(Context, Request, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Marshal {
        validator: Some(Arc::new(validator)),
        handler: Arc::new(handler),
        _target: PhantomData,
    }
}

/// Like [`marshal`] without validation.
pub fn marshal_body<T, F, Fut, R>(handler: F) -> Marshal<T, F>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(Context, Request, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    Marshal {
        validator: None,
        handler: Arc::new(handler),
        _target: PhantomData,
    }
}

impl<T, F, Fut, R> Handler for Marshal<T, F>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(Context, Request, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn handle(&self, ctx: Context, mut req: Request) -> BoxFuture<'static, Response> {
        let validator = self.validator.clone();
        let handler = self.handler.clone();
        Box::pin(async move {
            let target = match &validator {
                Some(validator) => req.validate_marshal::<T, _>(validator.as_ref()).await,
                None => req.marshal::<T>().await,
            };
            match target {
                Ok(target) => handler(ctx, req, target).await.into_response(),
                Err(err) => bad_request(&req, &err),
            }
        })
    }
}

fn bad_request(req: &Request, err: &crate::Error) -> Response {
    tracing::debug!(path = %req.path(), error = %err, "rejected request body");
    req.mux()
        .handle_error(StatusCode::BAD_REQUEST, &err.to_string(), req.info())
}

/// Serializes `value` as a JSON response with the given status.
///
/// Serialization failures are reported as a 500.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => {
            let mut res = (status, body).into_response();
            res.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            );
            res
        }
        Err(err) => crate::Error::from(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn json_sets_content_type() {
        let res = json(StatusCode::CREATED, &serde_json::json!({"id": 1}));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(
            res.headers()[CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
        let body = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"id":1}"#);
    }
}
