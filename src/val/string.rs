use {
    super::{Rule, RuleError, RuleSchema},
    regex::Regex,
    serde_json::Value,
};

/// Length bound for strings (in bytes), arrays and objects.
///
/// `max` is ignored when it is not greater than `min`, so `Length { min: 1, max: 0 }`
/// only enforces a minimum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Length {
    pub min: u64,
    pub max: u64,
}

impl Length {
    pub const fn new(min: u64, max: u64) -> Self {
        Length { min, max }
    }

    pub const fn at_least(min: u64) -> Self {
        Length { min, max: 0 }
    }
}

/// A string, array or object that cannot be empty.
pub const NO_EMPTY: Length = Length::at_least(1);

/// The value must be a string starting with the given text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix(pub String);

/// The value must be a string ending with the given text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix(pub String);

/// The value must be a string containing the given text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains(pub String);

impl Prefix {
    pub fn new(s: impl Into<String>) -> Self {
        Prefix(s.into())
    }
}

impl Suffix {
    pub fn new(s: impl Into<String>) -> Self {
        Suffix(s.into())
    }
}

impl Contains {
    pub fn new(s: impl Into<String>) -> Self {
        Contains(s.into())
    }
}

/// The value must be a string matching the regular expression.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(expr: &str) -> Result<Self, regex::Error> {
        Regex::new(expr).map(Pattern)
    }

    /// Like [`Pattern::new`] but panics on an invalid expression. Intended for
    /// sets built once at startup.
    pub fn must(expr: &str) -> Self {
        match Self::new(expr) {
            Ok(pattern) => pattern,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Pattern(re)
    }
}

fn string(value: &Value) -> Result<&str, RuleError> {
    value.as_str().ok_or(RuleError::NotString)
}

impl Rule for Length {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let len = match value {
            Value::String(s) => s.len(),
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            _ => return Err(RuleError::NotString),
        };
        let len = len as u64;
        if len < self.min {
            return Err(RuleError::violation(format!(
                "length {len} must be at least {}",
                self.min
            )));
        }
        if self.min >= self.max {
            return Ok(());
        }
        if len > self.max {
            return Err(RuleError::violation(format!(
                "length {len} cannot be more than {}",
                self.max
            )));
        }
        Ok(())
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Length {
            min: self.min,
            max: self.max,
        })
    }
}

impl Rule for Prefix {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        if string(value)?.starts_with(&self.0) {
            return Ok(());
        }
        Err(RuleError::violation(format!(
            "string does not have prefix '{}'",
            self.0
        )))
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Prefix {
            value: self.0.clone(),
        })
    }
}

impl Rule for Suffix {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        if string(value)?.ends_with(&self.0) {
            return Ok(());
        }
        Err(RuleError::violation(format!(
            "string does not have suffix '{}'",
            self.0
        )))
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Suffix {
            value: self.0.clone(),
        })
    }
}

impl Rule for Contains {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        if string(value)?.contains(self.0.as_str()) {
            return Ok(());
        }
        Err(RuleError::violation(format!(
            "string does not contain '{}'",
            self.0
        )))
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Contains {
            value: self.0.clone(),
        })
    }
}

impl Rule for Pattern {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        if self.0.is_match(string(value)?) {
            return Ok(());
        }
        Err(RuleError::violation(format!(
            "string does not match expression '{}'",
            self.0.as_str()
        )))
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Pattern {
            pattern: self.0.as_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn length_bounds_strings_by_bytes() {
        let rule = Length::new(6, 64);
        assert_eq!(
            rule.validate(&json!("ab")).unwrap_err().to_string(),
            "length 2 must be at least 6"
        );
        assert!(rule.validate(&json!("abcdef")).is_ok());
        assert_eq!(
            rule.validate(&json!("x".repeat(65))).unwrap_err().to_string(),
            "length 65 cannot be more than 64"
        );
        // "é" is two bytes.
        assert!(Length::new(2, 2).validate(&json!("é")).is_ok());
    }

    #[test]
    fn length_ignores_max_not_above_min() {
        assert!(Length::new(3, 2).validate(&json!("abcdefgh")).is_ok());
        assert!(NO_EMPTY.validate(&json!("a".repeat(1000))).is_ok());
        assert!(NO_EMPTY.validate(&json!("")).is_err());
    }

    #[test]
    fn length_counts_lists_and_objects() {
        assert!(NO_EMPTY.validate(&json!([])).is_err());
        assert!(Length::new(1, 2).validate(&json!([1, 2])).is_ok());
        assert!(Length::new(1, 2).validate(&json!({"a": 1, "b": 2, "c": 3})).is_err());
        assert_eq!(NO_EMPTY.validate(&json!(5)), Err(RuleError::NotString));
    }

    #[test]
    fn prefix_suffix_contains() {
        assert!(Prefix::new("ab").validate(&json!("abc")).is_ok());
        assert_eq!(
            Prefix::new("x").validate(&json!("abc")).unwrap_err().to_string(),
            "string does not have prefix 'x'"
        );
        assert!(Suffix::new("bc").validate(&json!("abc")).is_ok());
        assert!(Suffix::new("ab").validate(&json!("abc")).is_err());
        assert!(Contains::new("b").validate(&json!("abc")).is_ok());
        assert_eq!(
            Contains::new("z").validate(&json!("abc")).unwrap_err().to_string(),
            "string does not contain 'z'"
        );
        assert_eq!(
            Prefix::new("a").validate(&json!(1)),
            Err(RuleError::NotString)
        );
    }

    #[test]
    fn pattern_matches() {
        let rule = Pattern::must("^[a-z]+@[a-z]+$");
        assert!(rule.validate(&json!("me@host")).is_ok());
        assert_eq!(
            rule.validate(&json!("nope")).unwrap_err().to_string(),
            "string does not match expression '^[a-z]+@[a-z]+$'"
        );
        assert!(Pattern::new("(").is_err());
    }

    #[test]
    #[should_panic]
    fn pattern_must_panics_on_bad_expression() {
        let _ = Pattern::must("[");
    }
}
