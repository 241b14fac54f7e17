//! Named capture values extracted from a matched request path.
//!
//! Every capture is stored as a string; conversions happen on demand and
//! fail explicitly: an empty capture is [`ErrorKind::EmptyValue`], a malformed
//! one is [`ErrorKind::InvalidType`] and a missing name is
//! [`ErrorKind::NotExists`]. The `*_or` getters never fail and return the
//! supplied default instead.
//!

use {
    crate::{Error, ErrorKind, Result},
    std::{collections::HashMap, fmt, ops::Deref, str::FromStr},
};

/// A single captured path segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Value(String);

impl Value {
    pub fn new(s: impl Into<String>) -> Self {
        Value(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses `1`, `t`, `T`, `true`, `TRUE`, `True` and their false
    /// counterparts.
    pub fn to_bool(&self) -> Result<bool> {
        match self.non_empty()? {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            other => Err(Error::new(
                ErrorKind::InvalidType,
                format!("\"{other}\" is not a valid boolean"),
            )),
        }
    }

    pub fn to_int(&self) -> Result<i64> {
        self.parse()
    }

    pub fn to_uint(&self) -> Result<u64> {
        self.parse()
    }

    pub fn to_float(&self) -> Result<f64> {
        self.parse()
    }

    fn non_empty(&self) -> Result<&str> {
        if self.0.is_empty() {
            return Err(Error::empty_value());
        }
        Ok(&self.0)
    }

    fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.non_empty()?
            .parse()
            .map_err(|err| Error::new(ErrorKind::InvalidType, err))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Value {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value(s)
    }
}

/// The capture table of a matched route, keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Values(HashMap<String, Value>);

impl Values {
    pub fn new() -> Self {
        Values(HashMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.lookup(name).map(Value::as_str)
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.convert(name, Value::to_bool)
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.convert(name, Value::to_int)
    }

    pub fn uint(&self, name: &str) -> Result<u64> {
        self.convert(name, Value::to_uint)
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        self.convert(name, Value::to_float)
    }

    pub fn string_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).map_or(default, Value::as_str)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.bool(name).unwrap_or(default)
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.int(name).unwrap_or(default)
    }

    pub fn uint_or(&self, name: &str, default: u64) -> u64 {
        self.uint(name).unwrap_or(default)
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.float(name).unwrap_or(default)
    }

    fn lookup(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| Error::not_exists(name))
    }

    fn convert<T>(&self, name: &str, f: fn(&Value) -> Result<T>) -> Result<T> {
        f(self.lookup(name)?).map_err(|err| match err.kind() {
            ErrorKind::InvalidType => Error::invalid_type(name),
            _ => err,
        })
    }
}

impl FromIterator<(String, Value)> for Values {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Values(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Values {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        Values(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), Value::from(v)))
                .collect(),
        )
    }
}
