use {
    crate::{Error, Result},
    serde::Deserialize,
    std::time::Duration,
};

///
/// Configuration for the HTTP side of the Mux
///
/// These settings control where `Mux::start` binds, how long a dispatch may
/// run, how much of a JSON body is read and how the server shuts down.
///
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// IP address to bind the HTTP server to
    /// The default `bind_addr` is "127.0.0.1".
    #[serde(default = "HttpConfig::default_bind_addr")]
    pub bind_addr: String,

    /// Port to bind the HTTP server to
    /// The default `bind_port` is 3000.
    #[serde(default = "HttpConfig::default_bind_port")]
    pub bind_port: u16,

    /// Time budget for a single dispatch (middleware plus handler).
    /// When set, the request context is cancelled once it elapses; handlers
    /// are expected to observe the cancellation cooperatively.
    /// By default `request_timeout` is None.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,

    /// Maximum body size read by the JSON content helpers.
    /// Larger bodies are rejected with an `InvalidInput` error.
    /// By default `max_payload_size_bytes` is set to 32KiB.
    #[serde(default = "HttpConfig::default_max_payload_size_bytes")]
    pub max_payload_size_bytes: byte_unit::Byte,

    /// Whether a request for a non-canonical path (e.g. `/a//b/../c`) is
    /// answered with a 301 to its cleaned form. When disabled the cleaned
    /// path is matched directly.
    /// By default `redirect_clean_paths` is set to true.
    #[serde(default = "HttpConfig::default_redirect_clean_paths")]
    pub redirect_clean_paths: bool,

    /// Maximum time to wait for graceful shutdown to complete.
    /// After this timeout, the server will force shutdown.
    /// By default `shutdown_timeout` is set to 30 seconds.
    #[serde(
        default = "HttpConfig::default_shutdown_timeout",
        with = "humantime_serde"
    )]
    pub shutdown_timeout: Duration,
}

impl HttpConfig {
    ///
    /// Returns the full bind address as a string in the format "IP:PORT".
    ///
    pub fn full_bind_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.bind_port)
    }

    /// The payload limit as a `usize`, saturating on 32-bit targets.
    pub fn max_payload_size(&self) -> usize {
        usize::try_from(self.max_payload_size_bytes.as_u64()).unwrap_or(usize::MAX)
    }

    fn default_bind_addr() -> String {
        "127.0.0.1".into()
    }

    fn default_bind_port() -> u16 {
        3000
    }

    fn default_max_payload_size_bytes() -> byte_unit::Byte {
        byte_unit::Byte::from_u64(32 * 1024)
    }

    fn default_redirect_clean_paths() -> bool {
        true
    }

    fn default_shutdown_timeout() -> Duration {
        Duration::from_secs(30)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(Error::config(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }

        if self.bind_addr.parse::<std::net::IpAddr>().is_err() {
            return Err(Error::config(
                "HTTP bind_addr must be a valid IP address. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
            ));
        }

        if self.bind_port == 0 {
            return Err(Error::config(
                "HTTP bind_port must be > 0. Set [http] bind_port = 3000 in config.",
            ));
        }

        if self.max_payload_size_bytes.as_u64() == 0 {
            return Err(Error::config(
                "HTTP max_payload_size_bytes must be > 0. Set [http] max_payload_size_bytes = \"32KiB\" in config.",
            ));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            tracing::warn!("HTTP request_timeout of 0s disables the dispatch timeout");
        }

        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            bind_addr: Self::default_bind_addr(),
            bind_port: Self::default_bind_port(),
            request_timeout: None,
            max_payload_size_bytes: Self::default_max_payload_size_bytes(),
            redirect_clean_paths: Self::default_redirect_clean_paths(),
            shutdown_timeout: Self::default_shutdown_timeout(),
        }
    }
}
