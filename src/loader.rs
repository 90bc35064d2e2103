//! Rule document loading
//!
//! Reads YAML or JSON rule documents and compiles them into rule sets.
//! Any read, parse or compile failure is reported against the file it came
//! from; nothing is skipped silently.

use crate::error::{Result, ScribeError};
use crate::rule::RuleSet;
use crate::store::RuleStore;
use crate::types::RuleSetConfig;
use std::path::{Path, PathBuf};

/// Rule documents shipped with the crate
const BUILTIN_RULES: [(&str, &str); 3] = [
    ("en.yaml", include_str!("../rules/en.yaml")),
    ("nl.yaml", include_str!("../rules/nl.yaml")),
    ("ru.yaml", include_str!("../rules/ru.yaml")),
];

/// Compile a YAML rule document
pub fn parse_rule_set_yaml(text: &str) -> Result<RuleSet> {
    let config: RuleSetConfig = serde_yaml::from_str(text)?;
    RuleSet::compile(config)
}

/// Compile a JSON rule document
pub fn parse_rule_set_json(text: &str) -> Result<RuleSet> {
    let config: RuleSetConfig = serde_json::from_str(text)?;
    RuleSet::compile(config)
}

/// Load one rule document, choosing the format by extension
pub fn load_rule_set(path: impl AsRef<Path>) -> Result<RuleSet> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| ScribeError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parsed = match extension(path).as_deref() {
        Some("yaml") | Some("yml") => parse_rule_set_yaml(&text),
        Some("json") => parse_rule_set_json(&text),
        _ => {
            return Err(ScribeError::Load {
                path: path.to_path_buf(),
                reason: "unsupported rule document extension".to_string(),
            })
        }
    };

    parsed.map_err(|e| ScribeError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load every rule document in a directory
///
/// Files are read in name order; a later file for the same language replaces
/// an earlier one.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<RuleStore> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| ScribeError::Load {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_rule_document(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut store = RuleStore::new();
    for file in &files {
        let rule_set = load_rule_set(file)?;
        if let Some(previous) = store.insert(rule_set) {
            tracing::warn!(
                language = %previous.language(),
                path = %file.display(),
                "Rule set replaced by a later document"
            );
        }
    }

    tracing::info!(
        dir = %dir.display(),
        files = files.len(),
        languages = ?store.languages(),
        "Rule directory loaded"
    );
    Ok(store)
}

/// Compile the rule sets shipped with the crate
pub fn builtin() -> Result<RuleStore> {
    let mut store = RuleStore::new();
    for (name, text) in BUILTIN_RULES {
        let rule_set = parse_rule_set_yaml(text).map_err(|e| ScribeError::Load {
            path: PathBuf::from(name),
            reason: e.to_string(),
        })?;
        store.insert(rule_set);
    }
    Ok(store)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn is_rule_document(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("yaml" | "yml" | "json"))
}
