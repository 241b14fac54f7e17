use {
    super::{
        Kind, Rule, RuleError, RuleSchema, Rules, ValidationError,
        kind::{is_integral, type_name},
        schema,
    },
    crate::Content,
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    std::sync::Arc,
};

/// Something that can check decoded request content.
///
/// Implemented by [`Set`], [`OrEmpty`] and by closures
/// `Fn(&Content) -> Result<(), ValidationError>`.
pub trait Validate: Send + Sync {
    fn validate(&self, content: &Content) -> Result<(), ValidationError>;
}

impl<F> Validate for F
where
    F: Fn(&Content) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, content: &Content) -> Result<(), ValidationError> {
        self(content)
    }
}

/// Descriptor for one named field: the expected [`Kind`] plus rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validator {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Kind,
    #[serde(default, with = "schema::rules")]
    pub rules: Rules,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

impl Validator {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Validator {
            name: name.into(),
            kind,
            rules: Rules::new(),
            optional: false,
        }
    }

    /// Appends a rule.
    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Appends a list of rules, e.g. [`id()`](super::id).
    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Marks the field as optional: an absent field is skipped.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Checks one value: the kind first, then each rule in order, stopping
    /// at the first failure.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        if self.kind > Kind::None {
            self.check_kind(value)?;
        }
        for rule in &self.rules {
            rule.validate(value).map_err(|source| ValidationError::Rule {
                field: self.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    fn check_kind(&self, value: &Value) -> Result<(), ValidationError> {
        let matches = match (self.kind, value) {
            (_, Value::Null) => false,
            (Kind::Bool, Value::Bool(_)) => true,
            (Kind::String, Value::String(_)) => true,
            (Kind::Number, Value::Number(_)) => true,
            (Kind::Int, Value::Number(n)) => {
                if n.as_f64().is_some_and(is_integral) {
                    true
                } else {
                    return Err(ValidationError::TypeMismatch {
                        field: self.name.clone(),
                        expected: Kind::Int,
                        actual: "float",
                    });
                }
            }
            (Kind::Object, Value::Object(_)) => true,
            (Kind::List, Value::Array(_)) => true,
            (Kind::ListNumber, Value::Array(items)) => {
                return self.check_entries(items, Value::is_number);
            }
            (Kind::ListString, Value::Array(items)) => {
                return self.check_entries(items, Value::is_string);
            }
            _ => false,
        };
        if matches {
            return Ok(());
        }
        Err(ValidationError::TypeMismatch {
            field: self.name.clone(),
            expected: self.kind,
            actual: type_name(value),
        })
    }

    fn check_entries(
        &self,
        items: &[Value],
        valid: fn(&Value) -> bool,
    ) -> Result<(), ValidationError> {
        if items.iter().all(valid) {
            return Ok(());
        }
        Err(ValidationError::InvalidEntry {
            field: self.name.clone(),
            kind: self.kind,
        })
    }
}

/// An ordered list of [`Validator`]s checked against a decoded object.
///
/// Sets are built once at startup and shared read-only across requests.
///
/// ```rust
/// use regex_mux::val::{Kind, Length, Set, Validator, id};
/// use regex_mux::Content;
/// use serde_json::json;
///
/// let set = Set::new()
///     .field(Validator::new("id", Kind::Int).with_rules(id()))
///     .field(Validator::new("name", Kind::String).rule(Length::new(6, 64)))
///     .field(Validator::new("note", Kind::String).optional());
///
/// let ok = Content::try_from(json!({"id": 4, "name": "abcdef"})).unwrap();
/// assert!(set.validate(&ok).is_ok());
///
/// let bad = Content::try_from(json!({"id": 4, "name": "ab"})).unwrap();
/// assert_eq!(
///     set.validate(&bad).unwrap_err().to_string(),
///     "'name': length 2 must be at least 6"
/// );
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Set(Vec<Validator>);

impl Set {
    pub fn new() -> Self {
        Set(Vec::new())
    }

    /// Appends a validator, builder style.
    pub fn field(mut self, validator: Validator) -> Self {
        self.0.push(validator);
        self
    }

    pub fn push(&mut self, validator: Validator) {
        self.0.push(validator);
    }

    pub fn validators(&self) -> &[Validator] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks every validator in declaration order.
    ///
    /// An absent field is skipped when its validator is optional or of kind
    /// [`Kind::None`]; otherwise it is reported as required.
    pub fn validate(&self, content: &Content) -> Result<(), ValidationError> {
        validate_fields(&self.0, content.as_map())
    }

    /// Like [`Set::validate`] but an empty object is always valid.
    pub fn validate_empty(&self, content: &Content) -> Result<(), ValidationError> {
        if content.is_empty() {
            return Ok(());
        }
        self.validate(content)
    }

    /// Wraps the set so that an empty object is accepted.
    pub fn or_empty(self) -> OrEmpty {
        OrEmpty(self)
    }
}

impl From<Vec<Validator>> for Set {
    fn from(validators: Vec<Validator>) -> Self {
        Set(validators)
    }
}

impl FromIterator<Validator> for Set {
    fn from_iter<I: IntoIterator<Item = Validator>>(iter: I) -> Self {
        Set(iter.into_iter().collect())
    }
}

impl Validate for Set {
    fn validate(&self, content: &Content) -> Result<(), ValidationError> {
        Set::validate(self, content)
    }
}

/// A [`Set`] for optional bodies: an empty object passes.
#[derive(Debug, Clone)]
pub struct OrEmpty(pub Set);

impl Validate for OrEmpty {
    fn validate(&self, content: &Content) -> Result<(), ValidationError> {
        self.0.validate_empty(content)
    }
}

/// A rule validating a nested object with its own set of validators.
#[derive(Debug, Clone)]
pub struct SubSet(pub Set);

impl Rule for SubSet {
    fn validate(&self, value: &Value) -> Result<(), RuleError> {
        let Value::Object(map) = value else {
            return Err(RuleError::NotObject(type_name(value)));
        };
        validate_fields(&self.0.0, map).map_err(|err| RuleError::Nested(Box::new(err)))
    }

    fn schema(&self) -> Option<RuleSchema> {
        Some(RuleSchema::SubSet {
            fields: self.0.clone(),
        })
    }
}

fn validate_fields(
    validators: &[Validator],
    map: &Map<String, Value>,
) -> Result<(), ValidationError> {
    for validator in validators {
        if validator.name.is_empty() {
            return Err(ValidationError::InvalidName);
        }
        match map.get(&validator.name) {
            Some(value) => validator.validate(value)?,
            None if validator.optional || validator.kind == Kind::None => {}
            None => {
                return Err(ValidationError::Required {
                    field: validator.name.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::val::{Integer, Length, Min, NO_EMPTY, Positive, id};
    use serde_json::json;

    fn content(value: Value) -> Content {
        Content::try_from(value).unwrap()
    }

    fn mismatch(field: &str, expected: Kind, actual: &'static str) -> ValidationError {
        ValidationError::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    #[test]
    fn kind_checks_report_expected_and_actual() {
        let v = Validator::new("age", Kind::Number);
        assert!(v.validate(&json!(3.5)).is_ok());
        assert_eq!(v.validate(&json!("3")), Err(mismatch("age", Kind::Number, "string")));
        assert_eq!(
            v.validate(&json!(null)).unwrap_err().to_string(),
            "'age': expected 'number' but got 'null'"
        );
        assert_eq!(
            Validator::new("ok", Kind::Bool).validate(&json!(1)),
            Err(mismatch("ok", Kind::Bool, "number"))
        );
        assert_eq!(
            Validator::new("tags", Kind::Object).validate(&json!([])),
            Err(mismatch("tags", Kind::Object, "[]object"))
        );
        assert_eq!(
            Validator::new("tags", Kind::List).validate(&json!({})),
            Err(mismatch("tags", Kind::List, "object"))
        );
    }

    #[test]
    fn int_kind_rejects_fractions() {
        let v = Validator::new("count", Kind::Int);
        assert!(v.validate(&json!(4)).is_ok());
        assert!(v.validate(&json!(4.0)).is_ok());
        assert_eq!(
            v.validate(&json!(4.5)).unwrap_err().to_string(),
            "'count': expected 'integer' but got 'float'"
        );
    }

    #[test]
    fn typed_lists_check_every_entry() {
        let numbers = Validator::new("n", Kind::ListNumber);
        assert!(numbers.validate(&json!([1, 2.5, -3])).is_ok());
        assert!(numbers.validate(&json!([])).is_ok());
        assert_eq!(
            numbers.validate(&json!([1, "2"])).unwrap_err().to_string(),
            "'n': '[]number' contains invalid entry"
        );

        let strings = Validator::new("s", Kind::ListString);
        assert!(strings.validate(&json!(["a", "b"])).is_ok());
        assert_eq!(
            strings.validate(&json!(["a", null])),
            Err(ValidationError::InvalidEntry {
                field: "s".into(),
                kind: Kind::ListString
            })
        );
        assert!(Validator::new("l", Kind::List).validate(&json!([1, "a", {}])).is_ok());
    }

    #[test]
    fn any_and_none_skip_type_checks() {
        for value in [json!(null), json!(1), json!("x"), json!({})] {
            assert!(Validator::new("v", Kind::Any).validate(&value).is_ok());
            assert!(Validator::new("v", Kind::None).validate(&value).is_ok());
        }
    }

    #[test]
    fn rules_run_in_order_and_fail_fast() {
        let v = Validator::new("id", Kind::Any).rule(Integer).rule(Min(10.0));
        assert_eq!(
            v.validate(&json!(2.5)).unwrap_err().to_string(),
            "'id': value 2.50 must be an integer"
        );
        assert_eq!(
            v.validate(&json!(2)).unwrap_err().to_string(),
            "'id': value 2 cannot be less than 10"
        );
        assert!(v.validate(&json!(12)).is_ok());
    }

    #[test]
    fn set_presence_rules() {
        let required = Set::new().field(Validator::new("name", Kind::String).rule(Length::new(6, 64)));
        assert!(required.validate(&content(json!({"name": "abcdef"}))).is_ok());
        assert!(required.validate(&content(json!({"name": "ab"}))).is_err());
        assert_eq!(
            required.validate(&content(json!({}))),
            Err(ValidationError::Required { field: "name".into() })
        );

        let optional = Set::new().field(
            Validator::new("name", Kind::String)
                .rule(Length::new(6, 64))
                .optional(),
        );
        assert!(optional.validate(&content(json!({}))).is_ok());
        assert!(optional.validate(&content(json!({"name": "ab"}))).is_err());
    }

    #[test]
    fn none_kind_is_never_required_but_present_values_pass() {
        let set = Set::new().field(Validator::new("legacy", Kind::None));
        assert!(set.validate(&content(json!({}))).is_ok());
        assert!(set.validate(&content(json!({"legacy": 5}))).is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let set = Set::new()
            .field(Validator::new("a", Kind::Any).optional())
            .field(Validator::new("", Kind::Any));
        assert_eq!(
            set.validate(&content(json!({}))),
            Err(ValidationError::InvalidName)
        );
        assert_eq!(ValidationError::InvalidName.to_string(), "invalid name in set");
    }

    #[test]
    fn empty_set_accepts_anything() {
        assert!(Set::new().validate(&content(json!({"x": 1}))).is_ok());
    }

    #[test]
    fn validate_empty_and_or_empty() {
        let set = Set::new().field(Validator::new("name", Kind::String));
        let empty = content(json!({}));
        assert!(set.validate(&empty).is_err());
        assert!(set.validate_empty(&empty).is_ok());
        assert!(set.validate_empty(&content(json!({"other": 1}))).is_err());

        let optional_body = set.or_empty();
        assert!(Validate::validate(&optional_body, &empty).is_ok());
    }

    #[test]
    fn subset_validates_nested_objects() {
        let address = Set::new()
            .field(Validator::new("city", Kind::String).rule(NO_EMPTY))
            .field(Validator::new("zip", Kind::Int).with_rules(id()));
        let set = Set::new().field(Validator::new("address", Kind::Object).rule(SubSet(address)));

        assert!(
            set.validate(&content(json!({"address": {"city": "Oslo", "zip": 150}})))
                .is_ok()
        );
        assert_eq!(
            set.validate(&content(json!({"address": {"city": "Oslo"}})))
                .unwrap_err()
                .to_string(),
            "'address': 'zip': required"
        );
        assert_eq!(
            set.validate(&content(json!({"address": {"city": "", "zip": 1}})))
                .unwrap_err()
                .to_string(),
            "'address': 'city': length 0 must be at least 1"
        );

        let loose = Validator::new("address", Kind::Any).rule(SubSet(Set::new()));
        assert_eq!(
            loose.validate(&json!("Oslo")).unwrap_err().to_string(),
            "'address': type 'string' is not valid for SubSets"
        );
    }

    #[test]
    fn closures_implement_validate() {
        let check = |c: &Content| {
            if c.contains_key("token") {
                Ok(())
            } else {
                Err(ValidationError::Required {
                    field: "token".into(),
                })
            }
        };
        assert!(Validate::validate(&check, &content(json!({"token": "t"}))).is_ok());
        assert!(Validate::validate(&check, &content(json!({}))).is_err());
    }

    #[test]
    fn schema_round_trips_through_json() {
        let set = Set::new()
            .field(
                Validator::new("name", Kind::String)
                    .rule(Length::new(6, 64))
                    .optional(),
            )
            .field(Validator::new("id", Kind::Int).with_rules(id()))
            .field(Validator::new("age", Kind::Number).rule(Positive));

        let described = serde_json::to_value(&set).unwrap();
        assert_eq!(
            described,
            json!([
                {"name": "name", "type": "string", "rules": [{"rule": "length", "min": 6, "max": 64}], "optional": true},
                {"name": "id", "type": "integer", "rules": [{"rule": "integer"}, {"rule": "min", "value": 1.0}]},
                {"name": "age", "type": "number", "rules": [{"rule": "positive"}]}
            ])
        );

        let decoded: Set = serde_json::from_value(described).unwrap();
        assert_eq!(decoded.len(), 3);
        assert!(decoded.validators()[0].optional);
        assert_eq!(decoded.validators()[1].kind, Kind::Int);
        assert!(decoded.validate(&content(json!({"id": 0, "age": 1}))).is_err());
        assert!(decoded.validate(&content(json!({"id": 7, "age": 1}))).is_ok());
    }

    #[test]
    fn schema_defaults_and_bad_patterns() {
        let v: Validator = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(v.kind, Kind::Any);
        assert!(v.rules.is_empty());
        assert!(!v.optional);

        let bad = serde_json::from_value::<Validator>(json!({
            "name": "x",
            "rules": [{"rule": "pattern", "pattern": "("}]
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn custom_rules_are_skipped_in_schema() {
        #[derive(Debug)]
        struct Always;
        impl Rule for Always {
            fn validate(&self, _: &Value) -> Result<(), RuleError> {
                Ok(())
            }
        }

        let v = Validator::new("x", Kind::Any).rule(Always).rule(Integer);
        let described = serde_json::to_value(&v).unwrap();
        assert_eq!(described["rules"], json!([{"rule": "integer"}]));
    }
}
