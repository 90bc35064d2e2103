//! Rule document types for cronscribe
//!
//! These mirror the on-disk rule documents field for field (snake_case keys)
//! and are compiled into [`crate::rule::RuleSet`] before use.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One language's rule document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Language code (e.g., "en", "ru")
    pub language: String,

    /// Rules in matching order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Dictionary name → (raw value → translated value)
    #[serde(default)]
    pub dictionaries: HashMap<String, DictionaryConfig>,
}

/// Raw value → translated value
///
/// Values may be written as plain YAML scalars (`monday: 1`); a null value
/// (`monday: ~`) reads as an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictionaryConfig(#[serde(deserialize_with = "scalar_map")] pub HashMap<String, String>);

/// A single conversion rule as written in a rule document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule name, used in diagnostics
    pub name: String,

    /// Regular expression with capturing groups
    pub pattern: String,

    /// Variable name → capture group index (1-based)
    #[serde(default)]
    pub variables: HashMap<String, usize>,

    /// Variable name → dictionary name
    #[serde(default)]
    pub dictionaries: HashMap<String, String>,

    /// Output template with `%variable` placeholders
    pub format: String,

    /// Fallback values for absent or empty variables
    #[serde(default, deserialize_with = "scalar_map")]
    pub default_values: HashMap<String, String>,

    /// Alternate templates, first true condition wins
    #[serde(default)]
    pub special_cases: Vec<SpecialCaseConfig>,

    /// Variable name → rewrite steps, applied in document order
    #[serde(default)]
    pub transformations: IndexMap<String, Vec<TransformationConfig>>,
}

/// Alternate output template selected by a condition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialCaseConfig {
    pub condition: String,
    pub format: String,
}

/// Conditional rewrite step for one variable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformationConfig {
    pub condition: String,
    pub operation: String,
}

/// Conversion policy when an external generator is configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Only the local rules are consulted
    #[default]
    LocalOnly,
    /// Ask the generator first, fall back to local rules
    AiFirst,
    /// Use local rules, ask the generator when nothing matches
    AiFallback,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::LocalOnly => write!(f, "local_only"),
            Policy::AiFirst => write!(f, "ai_first"),
            Policy::AiFallback => write!(f, "ai_fallback"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null(()),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Str(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null(()) => String::new(),
        }
    }
}

fn scalar_map<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, Scalar> = HashMap::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k, v.into())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_document_from_yaml() {
        let yaml = r#"
language: en
rules:
  - name: weekday
    pattern: "^every (monday|friday)$"
    variables:
      dow: 1
    dictionaries:
      dow: weekdays
    format: "0 0 * * %dow"
    default_values:
      hour: 0
    transformations:
      offset:
        - condition: "period == 'pm'"
          operation: "'12'"
      hour:
        - condition: "hour < 12"
          operation: "hour + offset"
dictionaries:
  weekdays:
    monday: 1
    friday: "5"
"#;
        let doc: RuleSetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(doc.language, "en");
        assert_eq!(doc.rules.len(), 1);

        let rule = &doc.rules[0];
        assert_eq!(rule.variables["dow"], 1);
        assert_eq!(rule.default_values["hour"], "0");
        assert!(rule.special_cases.is_empty());

        let order: Vec<&str> = rule.transformations.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["offset", "hour"]);

        assert_eq!(doc.dictionaries["weekdays"].0["monday"], "1");
        assert_eq!(doc.dictionaries["weekdays"].0["friday"], "5");
    }

    #[test]
    fn test_null_values_read_as_empty() {
        let yaml = r#"
language: xx
rules:
  - name: ordinal
    pattern: "^(\\d)$"
    variables:
      n: 1
    dictionaries:
      n: nums
    default_values:
      suffix: ~
    format: "%n%suffix"
dictionaries:
  nums:
    "1": first
    "2": ~
"#;
        let doc: RuleSetConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(doc.dictionaries["nums"].0["1"], "first");
        assert_eq!(doc.dictionaries["nums"].0["2"], "");
        assert_eq!(doc.rules[0].default_values["suffix"], "");
    }

    #[test]
    fn test_rule_document_from_json() {
        let json = r#"{
            "language": "en",
            "rules": [{"name": "hourly", "pattern": "^every hour$", "format": "0 * * * *"}]
        }"#;
        let doc: RuleSetConfig = serde_json::from_str(json).unwrap();
        assert_eq!(doc.rules[0].format, "0 * * * *");
        assert!(doc.dictionaries.is_empty());
    }

    #[test]
    fn test_policy_serde() {
        let policy: Policy = serde_yaml::from_str("ai_fallback").unwrap();
        assert_eq!(policy, Policy::AiFallback);
        assert_eq!(Policy::default(), Policy::LocalOnly);
        assert_eq!(Policy::AiFirst.to_string(), "ai_first");
    }
}
