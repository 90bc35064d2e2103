//! Conversion front end with optional external generator
//!
//! `CronScribe` wraps a [`Mapper`] behind a single lock so it can be shared
//! across threads, and optionally pairs it with a [`CronGenerator`] under an
//! explicit [`Policy`]:
//!
//! - `LocalOnly`: rules only
//! - `AiFirst`: generator first, rules when the generator fails or returns
//!   an invalid expression
//! - `AiFallback`: rules first, generator when no rule matches
//!
//! [`CronScribe::resolve_auto`] detects the language first and falls back to
//! the generator under either non-local policy.

use crate::config::ScribeConfig;
use crate::error::{Result, ScribeError};
use crate::generator::{validate_candidate, CronGenerator};
use crate::mapper::{Mapper, DEFAULT_LANGUAGE};
use crate::rule::RuleSet;
use crate::types::Policy;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

/// Default upper bound for one generator call
const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Thread-safe converter with an optional external generator
pub struct CronScribe {
    mapper: RwLock<Mapper>,
    generator: Option<Arc<dyn CronGenerator>>,
    policy: Policy,
    generator_timeout: Duration,
}

impl CronScribe {
    /// Rules-only converter around a mapper
    pub fn new(mapper: Mapper) -> Self {
        Self {
            mapper: RwLock::new(mapper),
            generator: None,
            policy: Policy::LocalOnly,
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }

    /// Rules-only converter over the built-in rule sets
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Mapper::builtin()?))
    }

    /// Build from configuration
    ///
    /// A language other than the default must exist in the loaded rules.
    /// The configured policy only takes effect once a generator is attached
    /// with [`CronScribe::with_generator`].
    pub fn from_config(config: &ScribeConfig) -> Result<Self> {
        let mut mapper = match &config.rules_dir {
            Some(dir) => Mapper::from_dir(dir)?,
            None => Mapper::builtin()?,
        };

        if mapper.store().contains(&config.language) || config.language != DEFAULT_LANGUAGE {
            mapper.set_language(&config.language)?;
        }

        Ok(Self {
            mapper: RwLock::new(mapper),
            generator: None,
            policy: config.policy,
            generator_timeout: config.generator_timeout(),
        })
    }

    /// Attach an external generator with the policy for using it
    pub fn with_generator(mut self, generator: Arc<dyn CronGenerator>, policy: Policy) -> Self {
        self.generator = Some(generator);
        self.policy = policy;
        self
    }

    /// Bound each generator call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout = timeout;
        self
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Name of the attached generator
    pub fn generator_name(&self) -> Option<&str> {
        self.generator.as_deref().map(|g| g.name())
    }

    /// Convert with local rules in the current language
    pub fn convert(&self, expression: &str) -> Result<String> {
        self.read()?.convert(expression)
    }

    /// Convert with local rules, trying every language
    pub fn auto_detect(&self, expression: &str) -> Result<String> {
        self.read()?.auto_detect_and_convert(expression)
    }

    pub fn set_language(&self, language: &str) -> Result<()> {
        self.write()?.set_language(language)
    }

    pub fn current_language(&self) -> Result<Option<String>> {
        Ok(self.read()?.current_language().map(str::to_string))
    }

    pub fn supported_languages(&self) -> Result<Vec<String>> {
        Ok(self.read()?.supported_languages())
    }

    pub fn add_rule_set(&self, rule_set: RuleSet) -> Result<()> {
        self.write()?.add_rule_set(rule_set);
        Ok(())
    }

    /// Load a rule document and add it
    ///
    /// The file is read and compiled before the lock is taken.
    pub fn add_rules_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let rule_set = crate::loader::load_rule_set(path)?;
        self.add_rule_set(rule_set)
    }

    /// Convert according to the configured policy
    pub async fn resolve(&self, expression: &str) -> Result<String> {
        let Some(generator) = self.generator.as_deref() else {
            return self.convert(expression);
        };

        match self.policy {
            Policy::LocalOnly => self.convert(expression),
            Policy::AiFirst => match self.generate(generator, expression).await {
                Ok(cron) => Ok(cron),
                Err(e) => {
                    tracing::warn!(
                        generator = %generator.name(),
                        error = %e,
                        "Generator failed, using local rules"
                    );
                    self.convert(expression)
                }
            },
            Policy::AiFallback => match self.convert(expression) {
                Err(e) if e.is_no_match() => {
                    self.generate(generator, expression).await.map_err(|ge| {
                        tracing::warn!(
                            generator = %generator.name(),
                            error = %ge,
                            "Generator fallback failed"
                        );
                        ScribeError::NoMatch(expression.to_string())
                    })
                }
                other => other,
            },
        }
    }

    /// Convert with every language, then the generator when none matches
    ///
    /// Local detection always runs first. The generator is consulted only on
    /// `NoMatch`, only when one is attached and the policy is not
    /// `LocalOnly`; a failed fallback reports the original `NoMatch`.
    pub async fn resolve_auto(&self, expression: &str) -> Result<String> {
        let local = self.auto_detect(expression);
        let generator = match self.generator.as_deref() {
            Some(generator) if self.policy != Policy::LocalOnly => generator,
            _ => return local,
        };

        match local {
            Err(e) if e.is_no_match() => {
                self.generate(generator, expression).await.map_err(|ge| {
                    tracing::warn!(
                        generator = %generator.name(),
                        error = %ge,
                        "Generator fallback after detection failed"
                    );
                    ScribeError::NoMatch(expression.to_string())
                })
            }
            other => other,
        }
    }

    async fn generate(&self, generator: &dyn CronGenerator, expression: &str) -> Result<String> {
        let raw = tokio::time::timeout(self.generator_timeout, generator.generate_cron(expression))
            .await
            .map_err(|_| {
                ScribeError::Timeout(format!(
                    "generator '{}' did not answer within {}ms",
                    generator.name(),
                    self.generator_timeout.as_millis()
                ))
            })??;

        let cron = validate_candidate(&raw)?;
        tracing::debug!(generator = %generator.name(), cron = %cron, "Generator candidate accepted");
        Ok(cron)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Mapper>> {
        self.mapper
            .read()
            .map_err(|e| ScribeError::Config(format!("Mapper lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Mapper>> {
        self.mapper
            .write()
            .map_err(|e| ScribeError::Config(format!("Mapper lock poisoned: {}", e)))
    }
}
