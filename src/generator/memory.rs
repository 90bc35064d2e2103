//! In-memory generator with canned answers
//!
//! Useful for tests and offline use. Answers are looked up by the exact
//! input text; unknown inputs get the default answer if one is set.

use crate::error::{Result, ScribeError};
use crate::generator::CronGenerator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Generator answering from a fixed table
#[derive(Debug, Default)]
pub struct StaticGenerator {
    responses: HashMap<String, String>,
    default_response: Option<String>,
    calls: AtomicUsize,
}

impl StaticGenerator {
    /// Create an empty generator that fails every request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canned answer
    pub fn with_response(mut self, input: impl Into<String>, cron: impl Into<String>) -> Self {
        self.responses.insert(input.into(), cron.into());
        self
    }

    /// Answer used for unknown inputs
    pub fn with_default(mut self, cron: impl Into<String>) -> Self {
        self.default_response = Some(cron.into());
        self
    }

    /// Number of requests served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CronGenerator for StaticGenerator {
    async fn generate_cron(&self, input: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.responses
            .get(input)
            .or(self.default_response.as_ref())
            .cloned()
            .ok_or_else(|| ScribeError::Generator(format!("no canned answer for '{input}'")))
    }

    fn name(&self) -> &str {
        "static"
    }
}
