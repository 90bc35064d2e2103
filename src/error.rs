//! Error types for cronscribe

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading rules or converting expressions
#[derive(Debug, Error)]
pub enum ScribeError {
    /// A rule's pattern is not a valid regular expression (load time)
    #[error("Failed to compile pattern for rule '{rule}': {source}")]
    PatternCompile {
        rule: String,
        #[source]
        source: regex::Error,
    },

    /// No rule set is registered for the requested language code
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// No rule pattern matched the expression
    #[error("Unsupported expression format: {0}")]
    NoMatch(String),

    /// A rule maps a variable through a dictionary the rule set does not define
    #[error("Dictionary '{dictionary}' not found")]
    DictionaryNotFound { dictionary: String },

    /// A dictionary-mapped variable holds a value the dictionary does not know
    #[error("Value '{value}' not found in dictionary '{dictionary}'")]
    ValueNotFound { value: String, dictionary: String },

    /// Reserved for fallible transformation operations
    #[error("Invalid operation '{operation}': {reason}")]
    Transformation { operation: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule document could not be read or parsed
    #[error("Failed to load rules from {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization failure
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External generator failure
    #[error("Generator error: {0}")]
    Generator(String),

    /// External generator returned something that is not a 5-field cron expression
    #[error("Invalid cron candidate: {0}")]
    InvalidCandidate(String),

    /// Timeout
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl ScribeError {
    /// True when no rule pattern matched the expression
    pub fn is_no_match(&self) -> bool {
        matches!(self, ScribeError::NoMatch(_))
    }

    /// True for dictionary resolution failures during template substitution
    pub fn is_dictionary_error(&self) -> bool {
        matches!(
            self,
            ScribeError::DictionaryNotFound { .. } | ScribeError::ValueNotFound { .. }
        )
    }
}

/// Result type alias for cronscribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;
