//! External cron generator trait
//!
//! A `CronGenerator` turns free text into a candidate cron expression using
//! something other than the local rules (typically a language model). The
//! orchestrator in [`crate::scribe`] decides when to call it and always
//! checks the candidate with [`validate_candidate`] before accepting it.

use crate::error::{Result, ScribeError};
use async_trait::async_trait;

pub mod memory;
#[cfg(feature = "openai")]
pub mod openai;

/// Core trait for external generators
///
/// Calls may perform network I/O. Cancellation is by dropping the future;
/// the orchestrator bounds every call with a timeout.
#[async_trait]
pub trait CronGenerator: Send + Sync {
    /// Produce a candidate cron expression for human text
    async fn generate_cron(&self, input: &str) -> Result<String>;

    /// Generator name (e.g., "static", "openai")
    fn name(&self) -> &str;
}

/// System prompt for chat models asked to produce cron expressions
pub fn recommended_system_prompt() -> &'static str {
    "You are a helpful assistant that converts human-readable schedule descriptions \
     to cron expressions. Only respond with the valid cron expression, without any explanations."
}

/// User prompt wrapping the schedule description
pub fn recommended_user_prompt(input: &str) -> String {
    format!(
        "Convert the following human-readable schedule description to a cron expression:\n\
         \"{input}\"\n\n\
         The response should be ONLY the valid cron expression in the standard 5-field format \
         (minute hour day-of-month month day-of-week).\n\
         Do not include any explanations or additional text."
    )
}

/// Accept a generator answer only if it is a 5-field expression
///
/// Surrounding whitespace and quote characters are stripped; the cleaned
/// expression is returned.
pub fn validate_candidate(raw: &str) -> Result<String> {
    let cleaned = raw.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
    let fields = cleaned.split_whitespace().count();
    if fields != 5 {
        return Err(ScribeError::InvalidCandidate(format!(
            "expected 5 fields, got {fields}: '{}'",
            raw.trim()
        )));
    }
    Ok(cleaned.to_string())
}
