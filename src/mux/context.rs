use {
    std::time::Duration,
    tokio::time::Instant,
    tokio_util::{sync::CancellationToken, task::AbortOnDropHandle},
};

/// The cancellation context a handler runs under.
///
/// A `Context` is a [`CancellationToken`] plus an optional deadline. It is
/// derived from the Mux root context (see [`Mux::with_context`](crate::Mux::with_context)),
/// from a token placed in the inbound request extensions, or created fresh.
/// When the Mux has a timeout, the handler receives a child context that is
/// cancelled once the deadline passes.
///
/// Cancellation is cooperative: handlers observe it through
/// [`Context::cancelled`] or [`Context::is_cancelled`].
///
/// ```rust
/// use regex_mux::Context;
///
/// let parent = Context::background();
/// let child = parent.child();
/// parent.token().cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A fresh context that is never cancelled unless its token is.
    pub fn background() -> Self {
        Self::from_token(CancellationToken::new())
    }

    pub fn from_token(token: CancellationToken) -> Self {
        Context {
            token,
            deadline: None,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the context is cancelled or its deadline passes.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// A child context: cancelled with its parent, but cancelling it leaves
    /// the parent untouched.
    pub fn child(&self) -> Self {
        Context {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derives a child context cancelled after `timeout` (or at the parent
    /// deadline, whichever is sooner).
    ///
    /// The returned guard owns the timer; dropping it stops the timer and
    /// cancels the child context. Must be called within a Tokio runtime.
    pub fn with_timeout(&self, timeout: Duration) -> (Context, TimeoutGuard) {
        let now = Instant::now();
        let mut deadline = now.checked_add(timeout).unwrap_or(now + Duration::from_secs(86400 * 365 * 30));
        if let Some(parent) = self.deadline {
            deadline = deadline.min(parent);
        }
        let token = self.token.child_token();
        let timer = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                token.cancel();
            })
        };
        let ctx = Context {
            token: token.clone(),
            deadline: Some(deadline),
        };
        let guard = TimeoutGuard {
            token,
            _timer: AbortOnDropHandle::new(timer),
        };
        (ctx, guard)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

/// Releases a timeout context when dropped.
#[derive(Debug)]
pub struct TimeoutGuard {
    token: CancellationToken,
    _timer: AbortOnDropHandle<()>,
}

impl Drop for TimeoutGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
