//! The request handed to handlers and middleware.
//!
//! A [`Request`] carries the immutable [`RequestInfo`] (method, URI, version,
//! headers, matched route name and capture values), the request extensions,
//! the not yet consumed body, the base [`Context`] and the owning [`Mux`].
//!
//! The body can be read once, bounded by `http.max_payload_size_bytes`:
//! as [`Content`] (optionally validated) or deserialized into a typed value.
//!

use {
    crate::{Content, Context, Error, Mux, Result, Values, val::Validate},
    axum::{
        body::{Body, Bytes},
        http::{self, Extensions, HeaderMap, Method, Uri, Version, request::Parts},
    },
    serde::de::DeserializeOwned,
    std::{fmt, sync::Arc},
};

/// Request data shared between the handler and the error handlers.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    route: String,
    values: Values,
}

impl RequestInfo {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Name of the matched route; empty when no route matched.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn values(&self) -> &Values {
        &self.values
    }
}

pub struct Request {
    info: Arc<RequestInfo>,
    extensions: Extensions,
    body: Option<Body>,
    mux: Mux,
    ctx: Context,
}

impl Request {
    pub(crate) fn new(
        parts: Parts,
        body: Body,
        route: &str,
        values: Values,
        mux: Mux,
        ctx: Context,
    ) -> Self {
        let info = RequestInfo {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            route: route.to_string(),
            values,
        };
        Request {
            info: Arc::new(info),
            extensions: parts.extensions,
            body: Some(body),
            mux,
            ctx,
        }
    }

    pub fn info(&self) -> &RequestInfo {
        &self.info
    }

    pub(crate) fn shared_info(&self) -> Arc<RequestInfo> {
        self.info.clone()
    }

    pub fn method(&self) -> &Method {
        &self.info.method
    }

    pub fn uri(&self) -> &Uri {
        &self.info.uri
    }

    pub fn path(&self) -> &str {
        self.info.path()
    }

    pub fn version(&self) -> Version {
        self.info.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.info.headers
    }

    pub fn route(&self) -> &str {
        &self.info.route
    }

    pub fn values(&self) -> &Values {
        &self.info.values
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// The base context of the request, before any timeout is applied.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The Mux serving this request.
    pub fn mux(&self) -> &Mux {
        &self.mux
    }

    pub fn is_get(&self) -> bool {
        self.info.method == Method::GET
    }

    pub fn is_post(&self) -> bool {
        self.info.method == Method::POST
    }

    pub fn is_put(&self) -> bool {
        self.info.method == Method::PUT
    }

    pub fn is_patch(&self) -> bool {
        self.info.method == Method::PATCH
    }

    pub fn is_delete(&self) -> bool {
        self.info.method == Method::DELETE
    }

    pub fn is_head(&self) -> bool {
        self.info.method == Method::HEAD
    }

    pub fn is_options(&self) -> bool {
        self.info.method == Method::OPTIONS
    }

    /// Takes the raw body, leaving none behind.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Reads the whole body, up to `http.max_payload_size_bytes`.
    ///
    /// Fails with [`ErrorKind::NoBody`](crate::ErrorKind::NoBody) once the
    /// body has been consumed.
    pub async fn bytes(&mut self) -> Result<Bytes> {
        let body = self.body.take().ok_or_else(Error::no_body)?;
        let limit = self.mux.config().http.max_payload_size();
        axum::body::to_bytes(body, limit)
            .await
            .map_err(|err| {
                Error::invalid_input(format!("reading body (limit {limit} bytes): {err}"))
            })
    }

    /// Decodes the body as a JSON object. An empty body yields empty content.
    pub async fn content(&mut self) -> Result<Content> {
        let bytes = self.bytes().await?;
        if bytes.is_empty() {
            return Ok(Content::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Decodes the body as content and checks it with `validator`.
    pub async fn validate_content<V>(&mut self, validator: &V) -> Result<Content>
    where
        V: Validate + ?Sized,
    {
        let content = self.content().await?;
        validator.validate(&content)?;
        Ok(content)
    }

    /// Deserializes the body into `T`. An empty body is an error.
    pub async fn marshal<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.non_empty_bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Validates the body as content, then deserializes it into `T`.
    pub async fn validate_marshal<T, V>(&mut self, validator: &V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Validate + ?Sized,
    {
        let bytes = self.non_empty_bytes().await?;
        let content: Content = serde_json::from_slice(&bytes)?;
        validator.validate(&content)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn non_empty_bytes(&mut self) -> Result<Bytes> {
        let bytes = self.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::no_body());
        }
        Ok(bytes)
    }

    /// Rebuilds the underlying `http::Request`, with the body if it was not
    /// consumed.
    pub fn into_http(self) -> http::Request<Body> {
        let info = Arc::unwrap_or_clone(self.info);
        let mut req = http::Request::new(self.body.unwrap_or_default());
        *req.method_mut() = info.method;
        *req.uri_mut() = info.uri;
        *req.version_mut() = info.version;
        *req.headers_mut() = info.headers;
        *req.extensions_mut() = self.extensions;
        req
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.info.method)
            .field("uri", &self.info.uri)
            .field("route", &self.info.route)
            .field("values", &self.info.values)
            .finish()
    }
}
