//! Rule set store keyed by language code
//!
//! Iteration is sorted by language code, which fixes the order in which
//! auto-detection tries languages. Compiled rule sets are shared, so cloning
//! a store never recompiles or copies rules.

use crate::rule::RuleSet;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Language code → compiled rule set
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rule_sets: BTreeMap<String, Arc<RuleSet>>,
}

impl RuleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule set, returning the one it replaced
    pub fn insert(&mut self, rule_set: RuleSet) -> Option<Arc<RuleSet>> {
        self.rule_sets
            .insert(rule_set.language().to_string(), Arc::new(rule_set))
    }

    /// Rule set for a language
    pub fn get(&self, language: &str) -> Option<&RuleSet> {
        self.rule_sets.get(language).map(Arc::as_ref)
    }

    /// Shared handle to a language's rule set
    pub fn shared(&self, language: &str) -> Option<Arc<RuleSet>> {
        self.rule_sets.get(language).cloned()
    }

    /// Whether a language is present
    pub fn contains(&self, language: &str) -> bool {
        self.rule_sets.contains_key(language)
    }

    /// Sorted language codes
    pub fn languages(&self) -> Vec<String> {
        self.rule_sets.keys().cloned().collect()
    }

    /// Rule sets in language code order
    pub fn iter(&self) -> impl Iterator<Item = &RuleSet> {
        self.rule_sets.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.rule_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_sets.is_empty()
    }
}

impl FromIterator<RuleSet> for RuleStore {
    fn from_iter<I: IntoIterator<Item = RuleSet>>(iter: I) -> Self {
        let mut store = Self::new();
        for rule_set in iter {
            store.insert(rule_set);
        }
        store
    }
}
