use {
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::fmt,
};

/// The JSON type a [`Validator`](super::Validator) expects for its field.
///
/// Kinds are ordered; every kind after [`Kind::None`] enforces a type check,
/// while `Any` and `None` only run the attached rules. The serialized form is
/// the same name used in error messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Accepts any value, including `null`.
    #[default]
    #[serde(rename = "any")]
    Any,
    /// The field is expected to be absent or `null`. An absent field is
    /// never reported as required.
    #[serde(rename = "null")]
    None,
    /// Any JSON number.
    #[serde(rename = "number")]
    Number,
    /// A JSON number without a fractional part.
    #[serde(rename = "integer")]
    Int,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "object")]
    Object,
    /// Any JSON array.
    #[serde(rename = "[]object")]
    List,
    /// A JSON array whose entries are all numbers.
    #[serde(rename = "[]number")]
    ListNumber,
    /// A JSON array whose entries are all strings.
    #[serde(rename = "[]string")]
    ListString,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::None => "null",
            Kind::Number => "number",
            Kind::Int => "integer",
            Kind::String => "string",
            Kind::Bool => "boolean",
            Kind::Object => "object",
            Kind::List => "[]object",
            Kind::ListNumber => "[]number",
            Kind::ListString => "[]string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the dynamic type of a decoded JSON value, as used in
/// type-mismatch messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "[]object",
        Value::Object(_) => "object",
    }
}

/// Whether a float has no fractional part.
pub(crate) fn is_integral(x: f64) -> bool {
    x.is_finite() && x.trunc() == x
}
