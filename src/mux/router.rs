use {
    super::{
        ErrorHandler, Handler, Middleware,
        route::{Entry, Route, RouteHandler},
    },
    crate::{Config, Context, Error, Request, Result},
    axum::{
        Router,
        http::Method,
        response::Response,
    },
    regex::Regex,
    std::{
        fmt,
        sync::{Arc, OnceLock, PoisonError, RwLock},
        time::Duration,
    },
    tokio::signal,
    tokio_util::sync::CancellationToken,
};

/// A regex path router.
///
/// Patterns are tried shortest first; the first one matching the whole
/// (cleaned) request path wins. Each pattern can hold a default handler plus
/// one handler per HTTP method. Cloning a `Mux` is cheap and all clones share
/// the same route table.
///
/// ```rust
/// use regex_mux::{Context, Mux, Request};
///
/// async fn item(_ctx: Context, req: Request) -> String {
///     format!("item {}", req.values().uint_or("id", 0))
/// }
///
/// let mux = Mux::new();
/// mux.must("item", r"^/items/(?P<id>[0-9]+)$", item, &["GET"]);
/// ```
#[derive(Clone)]
pub struct Mux {
    pub(crate) inner: Arc<MuxInner>,
}

pub(crate) struct MuxInner {
    pub(crate) config: Config,
    pub(crate) routes: RwLock<Vec<Entry>>,
    pub(crate) wares: RwLock<Vec<Middleware>>,
    pub(crate) policy: RwLock<Policy>,
    pub(crate) root: OnceLock<CancellationToken>,
}

/// Dispatch settings that may change after construction.
#[derive(Default)]
pub(crate) struct Policy {
    pub(crate) error: Option<Arc<dyn ErrorHandler>>,
    pub(crate) not_found: Option<Arc<dyn ErrorHandler>>,
    pub(crate) method_not_allowed: Option<Arc<dyn ErrorHandler>>,
    pub(crate) internal_error: Option<Arc<dyn ErrorHandler>>,
    pub(crate) default: Option<Arc<dyn Handler>>,
    pub(crate) timeout: Option<Duration>,
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

impl Mux {
    /// Creates a Mux using [`Config::default`].
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    pub fn from_config(config: Config) -> Self {
        Mux {
            inner: Arc::new(MuxInner {
                config,
                routes: RwLock::new(Vec::new()),
                wares: RwLock::new(Vec::new()),
                policy: RwLock::new(Policy::default()),
                root: OnceLock::new(),
            }),
        }
    }

    /// Derives the root context from `parent`.
    ///
    /// Every request context then descends from it instead of the inbound
    /// request, and [`Mux::close`] cancels all in-flight handlers. Has no
    /// effect if a root context was already set.
    pub fn with_context(self, parent: &CancellationToken) -> Self {
        if self.inner.root.set(parent.child_token()).is_err() {
            tracing::warn!("Mux root context already set, ignoring");
        }
        self
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Cancels the root context, if any. A Mux without one is unaffected.
    pub fn close(&self) {
        if let Some(root) = self.inner.root.get() {
            root.cancel();
        }
    }

    /// Compiles `pattern` and registers `handler` for it.
    ///
    /// With no `methods` the handler becomes the default handler of the
    /// pattern, used when no method-specific handler matches. Otherwise it is
    /// registered for each listed method, all sharing one [`Route`].
    /// Registering a pattern that already exists amends its entry.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::InvalidPath`](crate::ErrorKind::InvalidPath) for an empty pattern
    /// - [`ErrorKind::InvalidPattern`](crate::ErrorKind::InvalidPattern) if it fails to compile
    /// - [`ErrorKind::InvalidMethod`](crate::ErrorKind::InvalidMethod) for an empty or malformed method
    /// - [`ErrorKind::DuplicateRoute`](crate::ErrorKind::DuplicateRoute) for a second default handler
    ///
    /// A failed call leaves the route table unchanged.
    pub fn add<H: Handler>(
        &self,
        name: &str,
        pattern: &str,
        handler: H,
        methods: &[&str],
    ) -> Result<Route> {
        if pattern.is_empty() {
            return Err(Error::invalid_path());
        }
        let regex = Regex::new(pattern).map_err(|err| Error::invalid_pattern(pattern, err))?;
        self.add_exp(name, regex, handler, methods)
    }

    /// Like [`Mux::add`] with an already compiled expression.
    ///
    /// The expression is recompiled anchored at both ends. Verbose
    /// expressions (`(?x)`) ending in a `#` comment are supported.
    pub fn add_exp<H: Handler>(
        &self,
        name: &str,
        regex: Regex,
        handler: H,
        methods: &[&str],
    ) -> Result<Route> {
        let source = regex.as_str();
        if source.is_empty() {
            return Err(Error::invalid_path());
        }
        let methods = parse_methods(methods)?;
        let matcher = anchored(source)?;
        let handler = RouteHandler::new(Arc::new(handler));

        let mut routes = self
            .inner
            .routes
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let existing = routes.iter().position(|e| e.source == source);
        if methods.is_empty()
            && let Some(i) = existing
            && routes[i].base.is_some()
        {
            return Err(Error::duplicate_route(source));
        }

        let index = match existing {
            Some(i) => i,
            None => {
                routes.push(Entry::new(name, source, matcher));
                routes.len() - 1
            }
        };
        let entry = &mut routes[index];
        if methods.is_empty() {
            entry.base = Some(handler.clone());
        }
        for method in methods {
            entry.methods.insert(method, handler.clone());
        }
        let route = Route::new(&entry.name, source, handler);

        if existing.is_none() {
            routes.sort_by_key(|e| e.source.len());
        }
        tracing::debug!(route = %route.name(), pattern = %source, "route registered");
        Ok(route)
    }

    /// Like [`Mux::add`] but panics on error. Intended for static setup.
    pub fn must<H: Handler>(&self, name: &str, pattern: &str, handler: H, methods: &[&str]) -> Route {
        match self.add(name, pattern, handler, methods) {
            Ok(route) => route,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`Mux::add_exp`] but panics on error.
    pub fn must_exp<H: Handler>(&self, name: &str, regex: Regex, handler: H, methods: &[&str]) -> Route {
        match self.add_exp(name, regex, handler, methods) {
            Ok(route) => route,
            Err(err) => panic!("{err}"),
        }
    }

    /// Appends a global middleware. Global middleware runs before route
    /// middleware, in registration order.
    pub fn middleware<F>(&self, f: F) -> &Self
    where
        F: Fn(&Context, &mut Response, &Request) -> bool + Send + Sync + 'static,
    {
        self.inner
            .wares
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(f));
        self
    }

    /// The fallback reporter for any error status without a specific handler.
    pub fn error_handler(&self, h: impl ErrorHandler) -> &Self {
        self.update(|p| p.error = Some(Arc::new(h)))
    }

    pub fn not_found_handler(&self, h: impl ErrorHandler) -> &Self {
        self.update(|p| p.not_found = Some(Arc::new(h)))
    }

    pub fn method_not_allowed_handler(&self, h: impl ErrorHandler) -> &Self {
        self.update(|p| p.method_not_allowed = Some(Arc::new(h)))
    }

    pub fn internal_error_handler(&self, h: impl ErrorHandler) -> &Self {
        self.update(|p| p.internal_error = Some(Arc::new(h)))
    }

    /// Serves requests matching no pattern instead of a 404. Route
    /// middleware does not apply; global middleware and the timeout do.
    pub fn default_handler(&self, h: impl Handler) -> &Self {
        self.update(|p| p.default = Some(Arc::new(h)))
    }

    /// Bounds each handler with a cancellation deadline. Overrides
    /// `http.request_timeout`; a zero duration disables the timeout.
    pub fn set_timeout(&self, timeout: Duration) -> &Self {
        self.update(|p| p.timeout = Some(timeout))
    }

    /// The timeout in effect, if any.
    pub fn timeout(&self) -> Option<Duration> {
        let timeout = self
            .inner
            .policy
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .timeout;
        timeout
            .or(self.inner.config.http.request_timeout)
            .filter(|t| !t.is_zero())
    }

    fn update(&self, f: impl FnOnce(&mut Policy)) -> &Self {
        let mut policy = self
            .inner
            .policy
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut *policy);
        self
    }

    /// Hosts the Mux as the fallback of an `axum::Router`.
    pub fn into_router(self) -> Router {
        Router::new().fallback_service(self)
    }

    /// Binds `http.bind_addr:http.bind_port` and serves until SIGINT or
    /// SIGTERM.
    ///
    /// On a signal the root context is cancelled and in-flight requests get
    /// `http.shutdown_timeout` to drain before the server is dropped.
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.inner.config.http.full_bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("Bound to {}", &bind_addr);
        tracing::info!("Waiting for connections");

        let shutdown_timeout = self.inner.config.http.shutdown_timeout;
        let initiated = CancellationToken::new();

        let signal = {
            let mux = self.clone();
            let initiated = initiated.clone();
            async move {
                shutdown_signal().await;
                tracing::info!("Shutdown signal received, draining connections");
                mux.close();
                initiated.cancel();
            }
        };
        let serve_future = axum::serve(listener, self.into_router()).with_graceful_shutdown(signal);

        // The timeout only starts once the signal has been received.
        tokio::select! {
            result = serve_future => {
                tracing::info!("Graceful shutdown completed");
                result?;
            }
            _ = async {
                initiated.cancelled().await;
                tokio::time::sleep(shutdown_timeout).await;
            } => {
                tracing::warn!("Graceful shutdown timeout expired, forcing shutdown");
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Mux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes = self
            .inner
            .routes
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Mux")
            .field("routes", &*routes)
            .field("timeout", &self.timeout())
            .finish()
    }
}

/// Compiles `source` so that it has to match the whole path.
///
/// In verbose mode a trailing `# comment` would swallow the closing group,
/// so a failed first attempt is retried with the comment terminated.
fn anchored(source: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{source})$"))
        .or_else(|_| Regex::new(&format!("^(?:{source}\n)$")))
        .map_err(|err| Error::invalid_pattern(source, err))
}

fn parse_methods(methods: &[&str]) -> Result<Vec<Method>> {
    methods
        .iter()
        .map(|m| {
            if m.is_empty() {
                return Err(Error::invalid_method(m));
            }
            Method::from_bytes(m.as_bytes()).map_err(|_| Error::invalid_method(m))
        })
        .collect()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {
                tracing::debug!("Ctrl+C signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install Ctrl+C handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal_handler) => {
                signal_handler.recv().await;
                tracing::debug!("SIGTERM signal received");
            }
            Err(err) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
