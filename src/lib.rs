//! # cronscribe
//!
//! Rule-driven conversion of human-readable schedule phrases into cron
//! expressions, per configured language.
//!
//! ## Overview
//!
//! Each language is a rule document: an ordered list of regex rules with
//! variable bindings, conditional rewrites, special-case templates and shared
//! dictionaries. The first rule whose pattern matches the lowercased, trimmed
//! input produces the output string.
//!
//! ## Quick Start
//!
//! ```rust
//! use cronscribe::Mapper;
//!
//! # fn example() -> cronscribe::Result<()> {
//! let mut mapper = Mapper::builtin()?;
//!
//! assert_eq!(mapper.convert("every day at noon")?, "0 12 * * *");
//! assert_eq!(mapper.convert("Each first Monday of month")?, "0 0 * * 1#1");
//!
//! mapper.set_language("ru")?;
//! assert_eq!(mapper.convert("каждый день в 10:30")?, "30 10 * * *");
//!
//! // try every language
//! assert_eq!(mapper.auto_detect_and_convert("elke dag om 10:30")?, "30 10 * * *");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Architecture
//!
//! - **RuleSet / Rule**: compiled rule documents (`rule`, `types`, `loader`)
//! - **expr**: typed condition/operation mini-language
//! - **transform / translator**: variable rewrites, special cases, templates
//! - **Mapper**: language selection and rule iteration
//! - **CronScribe**: shareable front end with an optional `CronGenerator`

pub mod config;
pub mod error;
pub mod expr;
pub mod generator;
pub mod loader;
pub mod mapper;
pub mod rule;
pub mod scribe;
pub mod store;
pub mod transform;
pub mod translator;
pub mod types;

// Re-export core types
pub use config::ScribeConfig;
pub use error::{Result, ScribeError};
pub use generator::memory::StaticGenerator;
pub use generator::{validate_candidate, CronGenerator};
pub use mapper::{normalize, Mapper};
pub use rule::{Bindings, Dictionaries, Rule, RuleSet};
pub use scribe::CronScribe;
pub use store::RuleStore;
pub use types::{Policy, RuleConfig, RuleSetConfig, SpecialCaseConfig, TransformationConfig};

#[cfg(feature = "openai")]
pub use generator::openai::OpenAiGenerator;
