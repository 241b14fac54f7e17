//! The regex router.
//!
//! Dispatch of one request:
//!
//! 1. A `*` request target is answered with 400.
//! 2. The path is percent-decoded; one that is not valid UTF-8 gets 400.
//!    A decoded path that cleaning would change is redirected (301) to its
//!    clean form, re-encoded and keeping the query, unless
//!    `http.redirect_clean_paths` is off.
//! 3. The first pattern matching the whole path is selected. Its handler for
//!    the request method is used. Without one, OPTIONS gets 204 and an
//!    `Allow` header, and other methods fall back to the route's default
//!    handler or get 405. No matching pattern means the Mux default handler,
//!    or 404.
//! 4. Global middleware, then route middleware, then the handler run under
//!    the request timeout. A panic anywhere in that chain becomes a 500.
//!
//! Error statuses go through [`Mux::handle_error`].
//!
mod context;
mod dispatch;
mod handler;
mod route;
mod router;

pub use context::{Context, TimeoutGuard};
pub use handler::{Convert, ErrorHandler, Func, Handler, Middleware, func};
pub use route::Route;
pub use router::Mux;

#[cfg(test)]
mod tests;
