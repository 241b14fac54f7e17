//! Decoded JSON request content.
//!
//! [`Content`] is a JSON object with typed getters. Getters fail with
//! [`ErrorKind::NotExists`](crate::ErrorKind::NotExists) for a missing key and
//! [`ErrorKind::InvalidType`](crate::ErrorKind::InvalidType) for a value of
//! the wrong JSON type; the `*_or` variants fall back to a default instead.
//! Integer getters truncate the JSON number. A JSON `null` decodes to empty
//! content.

use {
    crate::{Error, Result},
    serde::{Deserialize, Deserializer, Serialize},
    serde_json::{Map, Value},
    std::ops::{Deref, DerefMut},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Content(Map<String, Value>);

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
        Ok(Content(map.unwrap_or_default()))
    }
}

impl Content {
    pub fn new() -> Self {
        Content(Map::new())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// The raw JSON value for a key, if present.
    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.typed(name, Value::as_bool)
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        self.typed(name, Value::as_f64)
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.float(name).map(|f| f as i64)
    }

    pub fn uint(&self, name: &str) -> Result<u64> {
        self.float(name).map(|f| f as u64)
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        self.typed(name, Value::as_str)
    }

    /// A nested object as its own `Content`.
    pub fn object(&self, name: &str) -> Result<Content> {
        self.typed(name, Value::as_object)
            .map(|map| Content(map.clone()))
    }

    pub fn bool_or(&self, name: &str, default: bool) -> bool {
        self.bool(name).unwrap_or(default)
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.float(name).unwrap_or(default)
    }

    pub fn int_or(&self, name: &str, default: i64) -> i64 {
        self.int(name).unwrap_or(default)
    }

    pub fn uint_or(&self, name: &str, default: u64) -> u64 {
        self.uint(name).unwrap_or(default)
    }

    pub fn string_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.string(name).unwrap_or(default)
    }

    pub fn object_or(&self, name: &str, default: Content) -> Content {
        self.object(name).unwrap_or(default)
    }

    fn typed<'a, T>(&'a self, name: &str, f: fn(&'a Value) -> Option<T>) -> Result<T> {
        let value = self.0.get(name).ok_or_else(|| Error::not_exists(name))?;
        f(value).ok_or_else(|| Error::invalid_type(name))
    }
}

impl Deref for Content {
    type Target = Map<String, Value>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Content {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Map<String, Value>> for Content {
    fn from(map: Map<String, Value>) -> Self {
        Content(map)
    }
}

/// Only JSON objects and `null` convert; anything else is an `InvalidType`
/// error.
impl TryFrom<Value> for Content {
    type Error = Error;
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Content(map)),
            Value::Null => Ok(Content::new()),
            _ => Err(Error::invalid_type("content")),
        }
    }
}

impl From<Content> for Value {
    fn from(content: Content) -> Self {
        Value::Object(content.0)
    }
}
