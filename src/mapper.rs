//! Expression → cron mapping over per-language rule sets
//!
//! The mapper owns the rule store and the currently selected language.
//! Conversion is a pure function of the selected rule set and the input;
//! the only mutations are language selection and adding rule sets.

use crate::error::{Result, ScribeError};
use crate::loader;
use crate::rule::RuleSet;
use crate::store::RuleStore;
use crate::translator;
use std::path::Path;

/// Language selected when present
pub const DEFAULT_LANGUAGE: &str = "en";

/// Lowercase and trim an expression before matching
pub fn normalize(expression: &str) -> String {
    expression.trim().to_lowercase()
}

/// Rule-based converter from schedule phrases to cron expressions
#[derive(Debug, Clone)]
pub struct Mapper {
    store: RuleStore,
    current: Option<String>,
}

impl Mapper {
    /// Create a mapper over a store
    ///
    /// Selects `en` when present, otherwise the first language in code order.
    pub fn new(store: RuleStore) -> Self {
        let current = if store.contains(DEFAULT_LANGUAGE) {
            Some(DEFAULT_LANGUAGE.to_string())
        } else {
            store.languages().into_iter().next()
        };
        Self { store, current }
    }

    /// Mapper over the built-in rule sets
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(loader::builtin()?))
    }

    /// Mapper over every rule document in a directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(loader::load_dir(dir)?))
    }

    /// Select the language used by [`Mapper::convert`]
    ///
    /// On failure the current language is unchanged.
    pub fn set_language(&mut self, language: &str) -> Result<()> {
        if !self.store.contains(language) {
            return Err(ScribeError::UnsupportedLanguage(language.to_string()));
        }
        self.current = Some(language.to_string());
        tracing::info!(language = %language, "Language selected");
        Ok(())
    }

    /// Currently selected language code
    pub fn current_language(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Convert using the current language
    ///
    /// The first rule whose pattern matches decides the outcome: if its
    /// translation fails, that error is returned and no later rule is tried.
    pub fn convert(&self, expression: &str) -> Result<String> {
        let rule_set = self.current_rule_set()?;
        let input = normalize(expression);

        match rule_set.find(&input) {
            Some((rule, captured)) => {
                tracing::debug!(
                    language = %rule_set.language(),
                    rule = %rule.name(),
                    pattern = %rule.pattern().as_str(),
                    input = %input,
                    "Rule matched"
                );
                translator::translate(rule, &captured, rule_set.dictionaries())
            }
            None => Err(ScribeError::NoMatch(expression.to_string())),
        }
    }

    /// Convert by trying every language in code order
    ///
    /// Unlike [`Mapper::convert`], a translation failure moves on to the next
    /// matching rule (in this or a later language).
    pub fn auto_detect_and_convert(&self, expression: &str) -> Result<String> {
        let input = normalize(expression);

        for rule_set in self.store.iter() {
            for rule in rule_set.rules() {
                let Some(captured) = rule.capture(&input) else {
                    continue;
                };
                match translator::translate(rule, &captured, rule_set.dictionaries()) {
                    Ok(cron) => {
                        tracing::debug!(
                            language = %rule_set.language(),
                            rule = %rule.name(),
                            "Language detected"
                        );
                        return Ok(cron);
                    }
                    Err(e) => {
                        tracing::debug!(
                            language = %rule_set.language(),
                            rule = %rule.name(),
                            error = %e,
                            "Candidate rule failed to translate"
                        );
                    }
                }
            }
        }

        Err(ScribeError::NoMatch(expression.to_string()))
    }

    /// Insert or replace the rule set for its language
    ///
    /// Replacing the selected language takes effect immediately; the first
    /// rule set added to an empty mapper becomes the selected language.
    pub fn add_rule_set(&mut self, rule_set: RuleSet) {
        let language = rule_set.language().to_string();
        let replaced = self.store.insert(rule_set).is_some();
        if self.current.is_none() {
            self.current = Some(language.clone());
        }
        tracing::info!(language = %language, replaced, "Rule set added");
    }

    /// Load a rule document and add it
    pub fn add_rules_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let rule_set = loader::load_rule_set(path)?;
        self.add_rule_set(rule_set);
        Ok(())
    }

    /// Snapshot of the configured language codes, sorted
    pub fn supported_languages(&self) -> Vec<String> {
        self.store.languages()
    }

    /// The underlying store
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    fn current_rule_set(&self) -> Result<&RuleSet> {
        let language = self
            .current
            .as_deref()
            .ok_or_else(|| ScribeError::Config("no rule sets loaded".to_string()))?;
        self.store
            .get(language)
            .ok_or_else(|| ScribeError::UnsupportedLanguage(language.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_rule_set_yaml;

    const FALLBACK_POLICY: &str = r#"
language: xx
rules:
  - name: broken
    pattern: "^every (\\w+)$"
    variables:
      dow: 1
    dictionaries:
      dow: weekdays
    format: "0 0 * * %dow"
  - name: catch_all
    pattern: "^every (\\w+)$"
    format: "@daily"
dictionaries:
  weekdays:
    monday: "1"
"#;

    fn mapper() -> Mapper {
        let store: RuleStore = vec![parse_rule_set_yaml(FALLBACK_POLICY).unwrap()]
            .into_iter()
            .collect();
        Mapper::new(store)
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Every DAY  "), "every day");
        assert_eq!(normalize("КАЖДЫЙ День"), "каждый день");
    }

    #[test]
    fn test_default_language_falls_back_to_first_code() {
        let m = mapper();
        assert_eq!(m.current_language(), Some("xx"));
    }

    #[test]
    fn test_convert_stops_at_first_matching_rule() {
        let m = mapper();
        assert_eq!(m.convert("every monday").unwrap(), "0 0 * * 1");

        let err = m.convert("every funday").unwrap_err();
        assert!(
            matches!(err, ScribeError::ValueNotFound { ref value, .. } if value == "funday"),
            "expected dictionary error, got {err}"
        );
    }

    #[test]
    fn test_auto_detect_continues_after_translation_failure() {
        let m = mapper();
        assert_eq!(m.auto_detect_and_convert("every funday").unwrap(), "@daily");
    }

    #[test]
    fn test_auto_detect_prefers_first_language_code() {
        let tick = |language: &str, format: &str| {
            parse_rule_set_yaml(&format!(
                "language: {language}\nrules:\n  - name: tick\n    pattern: '^tick$'\n    format: '{format}'\n"
            ))
            .unwrap()
        };

        let mut m = Mapper::new(RuleStore::new());
        m.add_rule_set(tick("zz", "0 0 * * *"));
        m.add_rule_set(tick("bb", "0 12 * * *"));
        m.add_rule_set(tick("mm", "0 6 * * *"));

        // "zz" was added first and is current, but detection walks codes in order
        assert_eq!(m.current_language(), Some("zz"));
        assert_eq!(m.convert("tick").unwrap(), "0 0 * * *");
        assert_eq!(m.auto_detect_and_convert("tick").unwrap(), "0 12 * * *");
    }

    #[test]
    fn test_no_match() {
        let m = mapper();
        assert!(m.convert("nonsense string").unwrap_err().is_no_match());
        assert!(m.auto_detect_and_convert("nonsense string").unwrap_err().is_no_match());
    }

    #[test]
    fn test_set_language_unknown_keeps_current() {
        let mut m = mapper();
        let err = m.set_language("zz").unwrap_err();
        assert!(matches!(err, ScribeError::UnsupportedLanguage(ref code) if code == "zz"));
        assert_eq!(m.current_language(), Some("xx"));
    }

    #[test]
    fn test_empty_mapper() {
        let mut m = Mapper::new(RuleStore::new());
        assert!(m.current_language().is_none());
        assert!(matches!(m.convert("every day"), Err(ScribeError::Config(_))));
        assert!(m.auto_detect_and_convert("every day").unwrap_err().is_no_match());

        m.add_rule_set(parse_rule_set_yaml(FALLBACK_POLICY).unwrap());
        assert_eq!(m.current_language(), Some("xx"));
        assert_eq!(m.supported_languages(), vec!["xx"]);
    }

    #[test]
    fn test_add_rule_set_replaces_current() {
        let mut m = mapper();
        let replacement = FALLBACK_POLICY.replace("\"1\"", "\"7\"");
        m.add_rule_set(parse_rule_set_yaml(&replacement).unwrap());
        assert_eq!(m.convert("every monday").unwrap(), "0 0 * * 7");
        assert_eq!(m.supported_languages().len(), 1);
    }
}
