use {
    crate::{Error, Result},
    serde::Deserialize,
    tracing_subscriber::EnvFilter,
};

///
/// Configuration for logging and tracing.
///
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Format for log output.
    /// The default format is `default`, which is "full" human-readable format.
    /// Other options are `json`, `compact`, and `pretty`.
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directives (e.g. `"regex_mux=debug,info"`) used when `RUST_LOG`
    /// is not set. Falls back to `info` when absent.
    #[serde(default)]
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(filter) = &self.filter {
            EnvFilter::try_new(filter).map_err(|err| {
                Error::config(format!("invalid [logging] filter \"{filter}\": {err}"))
            })?;
        }
        Ok(())
    }

    /// Builds the filter for the subscriber: `RUST_LOG` first, then the
    /// configured directives, then `info`.
    pub(crate) fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            self.filter
                .as_deref()
                .and_then(|f| EnvFilter::try_new(f).ok())
                .unwrap_or_else(|| EnvFilter::new("info"))
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Default,
    Compact,
    Pretty,
}
