use {
    super::{
        Contains, Float, Integer, Length, Max, Min, Negative, Pattern, Positive, Prefix, Rule,
        Rules, Set, SubSet, Suffix,
    },
    serde::{Deserialize, Serialize},
    std::sync::Arc,
};

/// Serializable description of a built-in rule.
///
/// This is the `rules` entry format of the JSON schema description of a
/// [`Set`], tagged by `rule`:
///
/// ```json
/// [{"rule": "length", "min": 6, "max": 64}, {"rule": "prefix", "value": "usr_"}]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleSchema {
    Min {
        value: f64,
    },
    Max {
        value: f64,
    },
    Integer,
    Float,
    Positive,
    Negative,
    Length {
        #[serde(default)]
        min: u64,
        #[serde(default)]
        max: u64,
    },
    Prefix {
        value: String,
    },
    Suffix {
        value: String,
    },
    Contains {
        value: String,
    },
    Pattern {
        pattern: String,
    },
    #[serde(rename = "subset")]
    SubSet {
        fields: Set,
    },
}

impl RuleSchema {
    /// Builds the rule described. Only `pattern` can fail.
    pub fn into_rule(self) -> Result<Arc<dyn Rule>, regex::Error> {
        let rule: Arc<dyn Rule> = match self {
            RuleSchema::Min { value } => Arc::new(Min(value)),
            RuleSchema::Max { value } => Arc::new(Max(value)),
            RuleSchema::Integer => Arc::new(Integer),
            RuleSchema::Float => Arc::new(Float),
            RuleSchema::Positive => Arc::new(Positive),
            RuleSchema::Negative => Arc::new(Negative),
            RuleSchema::Length { min, max } => Arc::new(Length { min, max }),
            RuleSchema::Prefix { value } => Arc::new(Prefix(value)),
            RuleSchema::Suffix { value } => Arc::new(Suffix(value)),
            RuleSchema::Contains { value } => Arc::new(Contains(value)),
            RuleSchema::Pattern { pattern } => Arc::new(Pattern::new(&pattern)?),
            RuleSchema::SubSet { fields } => Arc::new(SubSet(fields)),
        };
        Ok(rule)
    }
}

/// `#[serde(with)]` adapter for [`Rules`]. Rules without a schema are
/// skipped when serializing.
pub(crate) mod rules {
    use super::*;
    use serde::{Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(rules: &Rules, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(rules.iter().filter_map(|rule| rule.schema()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rules, D::Error> {
        Vec::<RuleSchema>::deserialize(deserializer)?
            .into_iter()
            .map(|schema| schema.into_rule().map_err(D::Error::custom))
            .collect()
    }
}
