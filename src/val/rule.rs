use {
    super::{RuleError, RuleSchema},
    serde_json::Value,
    std::{fmt, sync::Arc},
};

/// A single constraint over one decoded JSON value.
///
/// Rules are pure predicates: they never mutate state and are shared
/// across requests. Implement this trait for custom constraints; return
/// `None` from [`Rule::schema`] when the rule has no serializable description.
///
/// ```rust
/// use regex_mux::val::{Rule, RuleError};
/// use serde_json::{Value, json};
///
/// #[derive(Debug)]
/// struct Even;
///
/// impl Rule for Even {
///     fn validate(&self, value: &Value) -> Result<(), RuleError> {
///         let x = value.as_f64().ok_or(RuleError::NotNumber)?;
///         if x % 2.0 == 0.0 {
///             Ok(())
///         } else {
///             Err(RuleError::violation(format!("value {x} must be even")))
///         }
///     }
/// }
///
/// assert!(Even.validate(&json!(4)).is_ok());
/// assert!(Even.validate(&json!(3)).is_err());
/// ```
pub trait Rule: fmt::Debug + Send + Sync {
    fn validate(&self, value: &Value) -> Result<(), RuleError>;

    /// Serializable description of the rule.
    fn schema(&self) -> Option<RuleSchema> {
        None
    }
}

/// An ordered list of rules, checked first to last.
pub type Rules = Vec<Arc<dyn Rule>>;

impl<R: Rule + ?Sized> Rule for Arc<R> {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        (**self).validate(value)
    }

    fn schema(&self) -> Option<RuleSchema> {
        (**self).schema()
    }
}

/// Builds a [`Rules`] list from rule values.
///
/// ```rust
/// use regex_mux::rules;
/// use regex_mux::val::{Integer, Min};
///
/// let r = rules![Integer, Min(1.0)];
/// assert_eq!(r.len(), 2);
/// ```
#[macro_export]
macro_rules! rules {
    ($($rule:expr),* $(,)?) => {
        vec![$(::std::sync::Arc::new($rule) as ::std::sync::Arc<dyn $crate::val::Rule>),*]
    };
}

/// Rules for an identifier: an integer greater than zero.
pub fn id() -> Rules {
    vec![Arc::new(super::Integer), Arc::new(super::GREATER_THAN_ZERO)]
}
