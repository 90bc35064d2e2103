//! Special-case selection and template substitution
//!
//! Turns a rule match into the final schedule string: extract bindings,
//! run transformations, pick the first special case whose condition holds
//! (or the rule's default format) and substitute `%variable` placeholders,
//! routing dictionary-mapped variables through the language dictionaries.

use crate::error::{Result, ScribeError};
use crate::rule::{Bindings, Dictionaries, Rule};
use crate::transform;
use std::collections::BTreeMap;

/// Translate a successful match into an output string
pub fn translate(rule: &Rule, captured: &[String], dictionaries: &Dictionaries) -> Result<String> {
    let mut bindings = rule.extract(captured);
    transform::apply(rule, &mut bindings)?;
    let template = select_template(rule, &bindings);
    render(template, rule, &bindings, dictionaries)
}

/// First special case whose condition holds, else the default format
pub fn select_template<'a>(rule: &'a Rule, bindings: &Bindings) -> &'a str {
    for (index, case) in rule.special_cases().iter().enumerate() {
        if case.condition.evaluate(bindings) {
            tracing::debug!(rule = %rule.name(), case = index, "Special case selected");
            return &case.format;
        }
    }
    rule.format()
}

/// Substitute bound variables into a template
///
/// Every bound dictionary-mapped variable is resolved first, whether or not
/// the template references it. A placeholder binds to the longest variable
/// name it starts with, so `%dowL` renders `%dow` followed by `L`.
/// Placeholders with no bound variable are left as written.
pub fn render(
    template: &str,
    rule: &Rule,
    bindings: &Bindings,
    dictionaries: &Dictionaries,
) -> Result<String> {
    let mut values: BTreeMap<&str, &str> = BTreeMap::new();
    for (name, value) in bindings {
        let resolved = match rule.dictionary_for(name) {
            Some(dictionary) => lookup(dictionaries, dictionary, value)?,
            None => value.as_str(),
        };
        values.insert(name.as_str(), resolved);
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let placeholder = values
            .iter()
            .filter(|(name, _)| !name.is_empty() && after.starts_with(*name))
            .max_by_key(|(name, _)| name.len());

        match placeholder {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len()..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    Ok(out)
}

fn lookup<'a>(dictionaries: &'a Dictionaries, dictionary: &str, value: &str) -> Result<&'a str> {
    let dict = dictionaries
        .get(dictionary)
        .ok_or_else(|| ScribeError::DictionaryNotFound {
            dictionary: dictionary.to_string(),
        })?;

    dict.get(value)
        .map(String::as_str)
        .ok_or_else(|| ScribeError::ValueNotFound {
            value: value.to_string(),
            dictionary: dictionary.to_string(),
        })
}
