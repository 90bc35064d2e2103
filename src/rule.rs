//! Compiled rules and rule sets
//!
//! A [`Rule`] is built once from a [`RuleConfig`]: its pattern is compiled
//! and every condition and operation is parsed up front, so a broken rule
//! fails at load time and never during matching.

use crate::error::{Result, ScribeError};
use crate::expr::{Condition, Operation};
use crate::types::{RuleConfig, RuleSetConfig};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Variable name → current value for one match attempt
pub type Bindings = BTreeMap<String, String>;

/// Raw value → translated value
pub type Dictionary = HashMap<String, String>;

/// Dictionary name → dictionary, shared by all rules of a language
pub type Dictionaries = HashMap<String, Dictionary>;

/// Variables whose integer values are re-rendered in canonical form
const NUMERIC_VARIABLES: [&str; 3] = ["hour", "minute", "day"];

/// Alternate output template chosen when its condition holds
#[derive(Debug, Clone)]
pub struct SpecialCase {
    pub condition: Condition,
    pub format: String,
}

/// One conditional rewrite step
#[derive(Debug, Clone)]
pub struct Transformation {
    pub condition: Condition,
    pub operation: Operation,
}

/// A compiled conversion rule
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    pattern: Regex,
    variables: BTreeMap<String, usize>,
    default_values: BTreeMap<String, String>,
    transformations: Vec<(String, Vec<Transformation>)>,
    special_cases: Vec<SpecialCase>,
    format: String,
    dictionaries: HashMap<String, String>,
}

impl Rule {
    /// Compile a rule document
    pub fn compile(config: RuleConfig) -> Result<Self> {
        let pattern = Regex::new(&config.pattern).map_err(|source| ScribeError::PatternCompile {
            rule: config.name.clone(),
            source,
        })?;

        let groups = pattern.captures_len();
        for (variable, index) in &config.variables {
            if *index >= groups {
                tracing::warn!(
                    rule = %config.name,
                    variable = %variable,
                    index = *index,
                    groups = groups - 1,
                    "Variable index exceeds capture groups; it will only take its default"
                );
            }
        }

        let transformations = config
            .transformations
            .into_iter()
            .map(|(variable, steps)| {
                let steps = steps
                    .into_iter()
                    .map(|t| Transformation {
                        condition: Condition::parse(&t.condition),
                        operation: Operation::parse(&t.operation),
                    })
                    .collect();
                (variable, steps)
            })
            .collect();

        let special_cases = config
            .special_cases
            .into_iter()
            .map(|s| SpecialCase {
                condition: Condition::parse(&s.condition),
                format: s.format,
            })
            .collect();

        Ok(Self {
            name: config.name,
            pattern,
            variables: config.variables.into_iter().collect(),
            default_values: config.default_values.into_iter().collect(),
            transformations,
            special_cases,
            format: config.format,
            dictionaries: config.dictionaries,
        })
    }

    /// Rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled pattern
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Default output template
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Special cases in evaluation order
    pub fn special_cases(&self) -> &[SpecialCase] {
        &self.special_cases
    }

    /// Transformation steps per variable, in document order
    pub fn transformations(&self) -> &[(String, Vec<Transformation>)] {
        &self.transformations
    }

    /// Dictionary name a variable is mapped through, if any
    pub fn dictionary_for(&self, variable: &str) -> Option<&str> {
        self.dictionaries.get(variable).map(String::as_str)
    }

    /// Match a normalized input against the pattern
    ///
    /// Returns the whole match at index 0 followed by every capture group.
    /// Groups that did not participate in the match are empty strings.
    pub fn capture(&self, input: &str) -> Option<Vec<String>> {
        let caps = self.pattern.captures(input)?;
        Some(
            caps.iter()
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    /// Bind variables from captured groups and apply defaults
    pub fn extract(&self, captured: &[String]) -> Bindings {
        let mut bindings = Bindings::new();
        for (name, index) in &self.variables {
            if let Some(value) = captured.get(*index) {
                bindings.insert(name.clone(), value.clone());
            }
        }

        for (name, value) in &self.default_values {
            let missing = bindings.get(name).map_or(true, String::is_empty);
            if missing {
                bindings.insert(name.clone(), value.clone());
            }
        }

        for name in NUMERIC_VARIABLES {
            if let Some(value) = bindings.get_mut(name) {
                if let Ok(n) = value.parse::<i64>() {
                    *value = n.to_string();
                }
            }
        }

        bindings
    }
}

/// All rules and dictionaries for one language
#[derive(Debug, Clone)]
pub struct RuleSet {
    language: String,
    rules: Vec<Rule>,
    dictionaries: Dictionaries,
}

impl RuleSet {
    /// Create a rule set from already compiled rules
    pub fn new(language: impl Into<String>, rules: Vec<Rule>, dictionaries: Dictionaries) -> Self {
        Self {
            language: language.into(),
            rules,
            dictionaries,
        }
    }

    /// Compile a rule document, failing on the first invalid rule
    pub fn compile(config: RuleSetConfig) -> Result<Self> {
        if config.language.trim().is_empty() {
            return Err(ScribeError::Config(
                "Rule set language cannot be empty".to_string(),
            ));
        }

        let dictionaries: Dictionaries = config
            .dictionaries
            .into_iter()
            .map(|(name, dict)| (name, dict.0))
            .collect();

        let mut rules = Vec::with_capacity(config.rules.len());
        for rule in config.rules {
            for (variable, dictionary) in &rule.dictionaries {
                if !dictionaries.contains_key(dictionary) {
                    tracing::warn!(
                        language = %config.language,
                        rule = %rule.name,
                        variable = %variable,
                        dictionary = %dictionary,
                        "Rule references an undefined dictionary"
                    );
                }
            }
            rules.push(Rule::compile(rule)?);
        }

        tracing::debug!(
            language = %config.language,
            rules = rules.len(),
            dictionaries = dictionaries.len(),
            "Rule set compiled"
        );

        Ok(Self::new(config.language, rules, dictionaries))
    }

    /// Language code
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Rules in matching order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Shared dictionaries
    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dictionaries
    }

    /// First rule whose pattern matches, with its captures
    pub fn find(&self, input: &str) -> Option<(&Rule, Vec<String>)> {
        self.rules
            .iter()
            .find_map(|rule| rule.capture(input).map(|captured| (rule, captured)))
    }
}
