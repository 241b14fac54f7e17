//! Numeric rules. Every rule here fails with [`RuleError::NotNumber`] when
//! the value is not a JSON number.

use {
    super::{Rule, RuleError, RuleSchema, kind::is_integral},
    serde_json::Value,
};

/// The value must be at least the given bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Min(pub f64);

/// The value must be at most the given bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Max(pub f64);

/// The value must have no fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Integer;

/// The value must have a fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Float;

/// The value must be zero or greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positive;

/// The value must be less than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Negative;

/// The value must be at least one.
pub const GREATER_THAN_ZERO: Min = Min(1.0);

fn number(value: &Value) -> Result<f64, RuleError> {
    value.as_f64().ok_or(RuleError::NotNumber)
}

impl Rule for Min {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let x = number(value)?;
        if x < self.0 {
            return Err(RuleError::violation(format!(
                "value {x:.0} cannot be less than {:.0}",
                self.0
            )));
        }
        Ok(())
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Min { value: self.0 })
    }
}

impl Rule for Max {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let x = number(value)?;
        if x > self.0 {
            return Err(RuleError::violation(format!(
                "value {x:.0} cannot be more than {:.0}",
                self.0
            )));
        }
        Ok(())
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Max { value: self.0 })
    }
}

impl Rule for Integer {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let x = number(value)?;
        if !is_integral(x) {
            return Err(RuleError::violation(format!(
                "value {x:.2} must be an integer"
            )));
        }
        Ok(())
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Integer)
    }
}

impl Rule for Float {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let x = number(value)?;
        if is_integral(x) {
            return Err(RuleError::violation(format!("value {x:.0} must be a float")));
        }
        Ok(())
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Float)
    }
}

impl Rule for Positive {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let x = number(value)?;
        if x < 0.0 {
            return Err(RuleError::violation(format!("value {x:.0} must be positive")));
        }
        Ok(())
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Positive)
    }
}

impl Rule for Negative {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let x = number(value)?;
        if x >= 0.0 {
            return Err(RuleError::violation(format!("value {x:.0} must be negative")));
        }
        Ok(())
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::Negative)
    }
}
