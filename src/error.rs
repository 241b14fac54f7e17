//! Error types for route registration, request data access and dispatch.
//!
//! Like `std::io::Error`, the crate exposes an opaque [`Error`] paired with an
//! [`ErrorKind`] enum. Registration problems (bad patterns, empty methods,
//! duplicate default handlers) are returned synchronously from the `Mux::add*`
//! calls; data-access problems (missing capture values, wrong JSON types) are
//! returned from the [`crate::Values`] and [`crate::Content`] getters.
//!
//! Routing outcomes (404/405) are not errors; they are reported through the
//! Mux error handlers.
//!
//! # Example
//!
//! ```rust
//! use regex_mux::{Error, ErrorKind, Mux, func};
//!
//! let mux = Mux::new();
//! let err = mux
//!     .add("broken", "^/items/(?P<id>[0-9+$", func(|_, _| async { "" }), &[])
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidPattern);
//!
//! use axum::http::StatusCode;
//! assert_eq!(Error::no_body().status_code(), StatusCode::BAD_REQUEST);
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::val::ValidationError;

/// The kind of error that occurred.
///
/// # Stability
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// without breaking existing code. Always include a wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The route pattern was empty.
    #[error("invalid path")]
    InvalidPath,

    /// The route pattern failed to compile as a regular expression.
    #[error("invalid pattern")]
    InvalidPattern,

    /// A method name was empty or not a valid HTTP method token.
    #[error("invalid method")]
    InvalidMethod,

    /// A default handler already exists for the pattern.
    #[error("duplicate route")]
    DuplicateRoute,

    /// The request body was empty when content was required.
    #[error("missing body")]
    NoBody,

    /// A named value does not exist.
    #[error("value does not exist")]
    NotExists,

    /// A named value exists but has the wrong type or could not be parsed.
    #[error("invalid type")]
    InvalidType,

    /// A capture value was empty and cannot be converted.
    #[error("empty value")]
    EmptyValue,

    /// Request content failed validation.
    #[error("validation error")]
    Validation,

    /// JSON decoding or encoding failed.
    #[error("JSON error")]
    Json,

    /// Invalid input (bad header, unreadable body).
    #[error("invalid input")]
    InvalidInput,

    /// Configuration error (invalid TOML, missing values).
    #[error("configuration error")]
    Configuration,

    /// I/O error (file operations, network).
    #[error("I/O error")]
    Io,

    /// Internal/unexpected error.
    #[error("internal error")]
    Internal,
}

/// An error that can occur in the regex-mux library.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use regex_mux::{Error, ErrorKind};
///
/// let err = Error::not_exists("id");
/// assert_eq!(err.kind(), ErrorKind::NotExists);
/// assert_eq!(err.to_string(), "\"id\": value does not exist");
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error code string for this error.
    ///
    /// This is a stable identifier suitable for client-side error handling.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::InvalidPath => "INVALID_PATH",
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::InvalidMethod => "INVALID_METHOD",
            ErrorKind::DuplicateRoute => "DUPLICATE_ROUTE",
            ErrorKind::NoBody => "NO_BODY",
            ErrorKind::NotExists => "NOT_EXISTS",
            ErrorKind::InvalidType => "INVALID_TYPE",
            ErrorKind::EmptyValue => "EMPTY_VALUE",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Json => "JSON_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::NoBody
            | ErrorKind::NotExists
            | ErrorKind::InvalidType
            | ErrorKind::EmptyValue
            | ErrorKind::Validation
            | ErrorKind::Json
            | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidPath
            | ErrorKind::InvalidPattern
            | ErrorKind::InvalidMethod
            | ErrorKind::DuplicateRoute
            | ErrorKind::Configuration
            | ErrorKind::Io
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into a structured error response.
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.error_code(), self.to_string())
    }

    /// Returns the validation error carried by this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        self.source.downcast_ref::<ValidationError>()
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates an invalid path error.
    pub fn invalid_path() -> Self {
        Self::new(ErrorKind::InvalidPath, "supplied path is invalid")
    }

    /// Creates an invalid pattern error wrapping the regex compile failure.
    pub fn invalid_pattern(pattern: &str, err: regex::Error) -> Self {
        Self::new(
            ErrorKind::InvalidPattern,
            PatternError {
                pattern: pattern.to_string(),
                source: err,
            },
        )
    }

    /// Creates an invalid method error.
    pub fn invalid_method(method: &str) -> Self {
        if method.is_empty() {
            return Self::new(
                ErrorKind::InvalidMethod,
                "supplied methods contains an empty method name",
            );
        }
        Self::new(
            ErrorKind::InvalidMethod,
            format!("supplied method \"{method}\" is not a valid method name"),
        )
    }

    /// Creates a duplicate route error.
    pub fn duplicate_route(pattern: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateRoute,
            format!("matcher path \"{pattern}\" already exists"),
        )
    }

    /// Creates a missing body error.
    pub fn no_body() -> Self {
        Self::new(ErrorKind::NoBody, "missing HTTP body")
    }

    /// Creates a "value does not exist" error for the named value.
    pub fn not_exists(name: &str) -> Self {
        Self::new(ErrorKind::NotExists, format!("\"{name}\": value does not exist"))
    }

    /// Creates an "incorrect value type" error for the named value.
    pub fn invalid_type(name: &str) -> Self {
        Self::new(ErrorKind::InvalidType, format!("\"{name}\": incorrect value type"))
    }

    /// Creates an empty value error.
    pub fn empty_value() -> Self {
        Self::new(ErrorKind::EmptyValue, "value is empty")
    }

    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an I/O error from a message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg.into())
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

/// A route pattern that failed to compile.
#[derive(Debug, Error)]
#[error("path \"{pattern}\" compile: {source}")]
struct PatternError {
    pattern: String,
    source: regex::Error,
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        tracing::error!(
            error_code = %error_response.error_code,
            message = %error_response.message,
            status = %status.as_u16(),
            "Error occurred"
        );

        (status, Json(error_response)).into_response()
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Json, err)
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::new(ErrorKind::Validation, err)
    }
}

impl From<axum::Error> for Error {
    fn from(err: axum::Error) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

// ============================================================================
// ErrorResponse
// ============================================================================

/// Structured error response with error code and details.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Unique error code for client-side error handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Adds details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
