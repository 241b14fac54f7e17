//!
//! Utility functions shared by the router and the configuration loader.
//!
//! - [`clean_path`] - Lexical request path normalization used before matching
//! - [`decode_path`] / [`encode_path`] - Percent-decoding of request paths and
//!   re-encoding for redirect targets
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//!

use {
    percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode},
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
};

/// Regular expression pattern for matching handlebars-style environment variable references.
/// Matches patterns like `{{ VAR_NAME }}` with optional whitespace around the variable name.
/// Variable names must be uppercase letters, digits, or underscores (standard env var naming).
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Bytes escaped when a decoded path is written back into a URI.
const PATH_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-decodes a raw URI path. Returns `None` when the decoded bytes are
/// not valid UTF-8.
///
/// ```
/// use regex_mux::decode_path;
///
/// assert_eq!(decode_path("/users/ada%20lovelace").as_deref(), Some("/users/ada lovelace"));
/// assert_eq!(decode_path("/a/%2e%2e/b").as_deref(), Some("/a/../b"));
/// assert_eq!(decode_path("/%ff"), None);
/// ```
pub fn decode_path(raw: &str) -> Option<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|path| path.into_owned())
}

/// Percent-encodes a decoded path so it can be used as a URI path again.
///
/// ```
/// use regex_mux::encode_path;
///
/// assert_eq!(encode_path("/users/ada lovelace"), "/users/ada%20lovelace");
/// assert_eq!(encode_path("/100%/x"), "/100%25/x");
/// ```
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ESCAPES).to_string()
}

/// Returns the canonical form of a request path.
///
/// The path is made rooted, `.` and empty segments are dropped and `..`
/// removes the previous segment (never climbing above the root). A trailing
/// slash on the input is kept so `/items/` and `/items` stay distinct routes.
///
/// The function is idempotent: `clean_path(&clean_path(p)) == clean_path(p)`.
///
/// # Examples
///
/// ```
/// use regex_mux::clean_path;
///
/// assert_eq!(clean_path(""), "/");
/// assert_eq!(clean_path("items"), "/items");
/// assert_eq!(clean_path("/items/"), "/items/");
/// assert_eq!(clean_path("/a//b/./c/../d"), "/a/b/d");
/// assert_eq!(clean_path("/../x/"), "/x/");
/// ```
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return "/".to_string();
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if path.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}

///
/// Substitutes `{{ VAR }}` references with the value of the environment
/// variable `VAR`. Unset variables are replaced by an empty string and a
/// warning is logged.
///
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}
