use {
    super::{Handler, Middleware},
    crate::{Context, Request, Values},
    axum::{http::Method, response::Response},
    regex::Regex,
    std::{
        collections::HashMap,
        fmt,
        sync::{Arc, PoisonError, RwLock},
    },
};

/// A handler plus the middleware attached to it through its [`Route`].
pub(crate) struct RouteHandler {
    pub(crate) handler: Arc<dyn Handler>,
    wares: RwLock<Vec<Middleware>>,
}

impl RouteHandler {
    pub(crate) fn new(handler: Arc<dyn Handler>) -> Arc<Self> {
        Arc::new(RouteHandler {
            handler,
            wares: RwLock::new(Vec::new()),
        })
    }

    pub(crate) fn wares(&self) -> Vec<Middleware> {
        self.wares
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// One registered pattern.
///
/// `source` is the pattern as written; it identifies the entry and drives the
/// length ordering. `matcher` is the same pattern anchored at both ends.
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) source: String,
    pub(crate) matcher: Regex,
    pub(crate) base: Option<Arc<RouteHandler>>,
    pub(crate) methods: HashMap<Method, Arc<RouteHandler>>,
}

impl Entry {
    pub(crate) fn new(name: &str, source: &str, matcher: Regex) -> Self {
        Entry {
            name: name.to_string(),
            source: source.to_string(),
            matcher,
            base: None,
            methods: HashMap::new(),
        }
    }

    /// The `Allow` header value: sorted method names, or `*` when the entry
    /// only has a default handler.
    pub(crate) fn allow(&self) -> String {
        if self.methods.is_empty() {
            return "*".to_string();
        }
        let mut names: Vec<&str> = self.methods.keys().map(Method::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// Named captures of `path`, if it matches. Groups that did not take part
    /// in the match are present with an empty value.
    pub(crate) fn captures(&self, path: &str) -> Option<Values> {
        let caps = self.matcher.captures(path)?;
        let mut values = Values::new();
        for name in self.matcher.capture_names().flatten() {
            values.insert(name, caps.name(name).map_or("", |m| m.as_str()));
        }
        Some(values)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("pattern", &self.source)
            .field("default", &self.base.is_some())
            .field("methods", &self.allow())
            .finish()
    }
}

/// Handle to a registered handler, used to attach route middleware.
///
/// When one registration covers several methods, they share a single
/// handler, so middleware added here applies to all of them.
///
/// ```rust
/// use regex_mux::{Mux, func};
///
/// let mux = Mux::new();
/// mux.must("items", "^/items$", func(|_, _| async { "items" }), &["GET", "HEAD"])
///     .middleware(|_ctx, res, _req| {
///         res.headers_mut().insert("cache-control", "no-store".parse().unwrap());
///         true
///     });
/// ```
#[derive(Clone)]
pub struct Route {
    name: String,
    pattern: String,
    handler: Arc<RouteHandler>,
}

impl Route {
    pub(crate) fn new(name: &str, pattern: &str, handler: Arc<RouteHandler>) -> Self {
        Route {
            name: name.to_string(),
            pattern: pattern.to_string(),
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Appends a middleware that runs after the global ones, for this route
    /// only.
    pub fn middleware<F>(self, f: F) -> Self
    where
        F: Fn(&Context, &mut Response, &Request) -> bool + Send + Sync + 'static,
    {
        self.handler
            .wares
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(f));
        self
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .finish()
    }
}
