//!
//! Configuration structures and utilities for wiring up a Mux.
//!
//! A configuration can be created in many ways:
//! - From an environment-specific TOML file via `Config::from_rust_env` or `Config::from_toml_file`
//! - From a TOML string via `Config::from_toml`
//! - Constructed programmatically via the builder methods on `Config`
//!
//! In both TOML-based methods, environment variables can be referenced in the TOML
//! using the {{ VAR_NAME }} syntax, and they will be substituted with the corresponding
//! environment variable value. This is done via the `replace_handlebars_with_env`
//! function.
//!
//! Configuration is split into logical sections, each represented by their own struct:
//!
//! - `HttpConfig` for binding, dispatch timeout, payload limits and shutdown
//! - `LoggingConfig` for logging and tracing settings
//!
mod http;
mod logging;

pub use http::*;
pub use logging::*;

pub use byte_unit::Byte;

use {
    crate::{Error, Result, utils::replace_handlebars_with_env},
    serde::Deserialize,
    std::{env, fs, str::FromStr, time::Duration},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    ///
    /// Creates a default configuration.
    /// This will attempt to load configuration from the file based on the RUST_ENV
    /// environment variable falling back to a default configuration if the environment
    /// variable is not set. Configuration files should be located in the "config/"
    /// directory of your project.
    ///
    fn default() -> Self {
        match Self::from_rust_env() {
            Ok(config) => config,
            Err(_) => Config {
                http: HttpConfig::default(),
                logging: LoggingConfig::default(),
            },
        }
    }
}

impl Config {
    ///
    /// Loads the configuration from a file based on the RUST_ENV environment variable.
    /// Fails when RUST_ENV is not set or the file cannot be read.
    ///
    pub fn from_rust_env() -> Result<Config> {
        Self::from_toml_file(env::var("RUST_ENV")?)
    }

    ///
    /// Given an environment name, loads the corresponding configuration file,
    /// substitutes any environment variables, and returns a Config struct.
    /// The configuration file is expected to be located at "config/{env}.toml"
    /// where {env} is the provided environment name (e.g., "dev", "prod").
    ///
    pub fn from_toml_file(env: impl AsRef<str>) -> Result<Config> {
        let path = format!("config/{}.toml", env.as_ref());
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    ///
    /// Parses a configuration string in TOML format into a Config struct.
    ///
    pub fn from_toml(toml_str: &str) -> Result<Config> {
        toml_str.parse()
    }

    /// Sets the HTTP server bind address of the HttpConfig.
    pub fn with_bind_addr<S: AsRef<str>>(mut self, addr: S) -> Self {
        self.http.bind_addr = addr.as_ref().into();
        self
    }

    /// Sets the HTTP server bind port of the HttpConfig.
    pub fn with_bind_port(mut self, port: u16) -> Self {
        self.http.bind_port = port;
        self
    }

    /// Sets the dispatch timeout of the HttpConfig.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.http.request_timeout = Some(timeout);
        self
    }

    /// Sets the maximum payload size in bytes of the HttpConfig.
    pub fn with_max_payload_size_bytes(mut self, size: u64) -> Self {
        self.http.max_payload_size_bytes = Byte::from_u64(size);
        self
    }

    /// Enables or disables redirects to cleaned paths.
    pub fn with_redirect_clean_paths(mut self, enable: bool) -> Self {
        self.http.redirect_clean_paths = enable;
        self
    }

    /// Sets the graceful shutdown timeout of the HttpConfig.
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.http.shutdown_timeout = timeout;
        self
    }

    /// Sets the log format of the LoggingConfig.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.logging.format = format;
        self
    }

    /// Sets the fallback filter directives of the LoggingConfig.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.logging.filter = Some(filter.into());
        self
    }

    /// Ensures that the configuration is valid.
    /// Every value has a sensible default, so this only rejects values that
    /// would make the Mux unusable (unparsable address, zero port or payload
    /// limit, bad filter directives).
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    ///
    /// Sets up the tracing subscriber for logging based on the LoggingConfig.
    ///
    /// NOTE: This should be called early during startup to ensure logging is configured
    ///       before any log messages are emitted.
    ///
    pub fn setup_tracing(&self) {
        use tracing_subscriber::prelude::*;
        let env_filter = self.logging.env_filter();
        match self.logging.format {
            LogFormat::Json => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().json())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Default => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Compact => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().compact())
                    .with(env_filter)
                    .try_init();
            }
            LogFormat::Pretty => {
                let _ = tracing_subscriber::registry()
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .with(env_filter)
                    .try_init();
            }
        }
    }
}

///
/// Parses a configuration string with references to environment variables
/// into a Config struct by substituting the environment variables and then
/// parsing the resulting TOML.
///
impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let config_file = replace_handlebars_with_env(s);
        let config = toml::from_str::<Config>(&config_file)?;
        Ok(config)
    }
}
