use {super::Kind, thiserror::Error};

/// A field-addressed failure returned by [`Set`](super::Set) and
/// [`Validator`](super::Validator) validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A validator in the set has an empty name.
    #[error("invalid name in set")]
    InvalidName,

    #[error("'{field}': required")]
    Required { field: String },

    #[error("'{field}': expected '{expected}' but got '{actual}'")]
    TypeMismatch {
        field: String,
        expected: Kind,
        actual: &'static str,
    },

    /// A typed list holds an entry of the wrong type.
    #[error("'{field}': '{kind}' contains invalid entry")]
    InvalidEntry { field: String, kind: Kind },

    /// A rule attached to the field rejected the value.
    #[error("'{field}': {source}")]
    Rule { field: String, source: RuleError },
}

impl ValidationError {
    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::InvalidName => None,
            ValidationError::Required { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::InvalidEntry { field, .. }
            | ValidationError::Rule { field, .. } => Some(field),
        }
    }
}

/// Error returned by a single [`Rule`](super::Rule).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("value is not a number")]
    NotNumber,

    #[error("value is not a string")]
    NotString,

    /// A nested set was applied to a value that is not an object.
    #[error("type '{0}' is not valid for SubSets")]
    NotObject(&'static str),

    #[error("{0}")]
    Violation(String),

    /// A nested set failed.
    #[error(transparent)]
    Nested(Box<ValidationError>),
}

impl RuleError {
    pub fn violation(msg: impl Into<String>) -> Self {
        RuleError::Violation(msg.into())
    }
}
