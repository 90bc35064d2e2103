//! Conditional variable rewrites
//!
//! Each transformed variable walks its steps in order; the first step whose
//! condition holds rewrites the variable and ends processing for it.
//! Variables are processed in document order, so a later variable sees the
//! rewritten value of an earlier one.

use crate::error::Result;
use crate::rule::{Bindings, Rule};

/// Apply a rule's transformations to freshly extracted bindings
pub fn apply(rule: &Rule, bindings: &mut Bindings) -> Result<()> {
    for (variable, steps) in rule.transformations() {
        if !bindings.contains_key(variable) {
            continue;
        }

        for step in steps {
            if !step.condition.evaluate(bindings) {
                continue;
            }

            let value = step.operation.evaluate(bindings)?;
            tracing::debug!(
                rule = %rule.name(),
                variable = %variable,
                value = %value,
                "Transformation applied"
            );
            bindings.insert(variable.clone(), value);
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleConfig, TransformationConfig};

    fn step(condition: &str, operation: &str) -> TransformationConfig {
        TransformationConfig {
            condition: condition.to_string(),
            operation: operation.to_string(),
        }
    }

    fn clock_rule() -> Rule {
        let mut config = RuleConfig {
            name: "clock".to_string(),
            pattern: r"^(\d+)\s*(am|pm)?$".to_string(),
            format: "0 %hour * * *".to_string(),
            ..Default::default()
        };
        config.variables.insert("hour".to_string(), 1);
        config.variables.insert("period".to_string(), 2);
        config
            .default_values
            .insert("offset".to_string(), "0".to_string());
        config.transformations.insert(
            "offset".to_string(),
            vec![step("period == 'pm'", "'12'")],
        );
        config.transformations.insert(
            "hour".to_string(),
            vec![step("hour == 12", "offset"), step("hour < 12", "hour + offset")],
        );
        Rule::compile(config).unwrap()
    }

    fn run(rule: &Rule, input: &str) -> Bindings {
        let mut vars = rule.extract(&rule.capture(input).unwrap());
        apply(rule, &mut vars).unwrap();
        vars
    }

    #[test]
    fn test_twelve_hour_clock() {
        let rule = clock_rule();
        assert_eq!(run(&rule, "3 pm")["hour"], "15");
        assert_eq!(run(&rule, "3 am")["hour"], "3");
        assert_eq!(run(&rule, "12 pm")["hour"], "12");
        assert_eq!(run(&rule, "12 am")["hour"], "0");
        assert_eq!(run(&rule, "18")["hour"], "18");
    }

    #[test]
    fn test_first_true_step_wins() {
        let mut config = RuleConfig {
            name: "nth".to_string(),
            pattern: r"^(\d+)$".to_string(),
            format: "%n".to_string(),
            ..Default::default()
        };
        config.variables.insert("n".to_string(), 1);
        config.transformations.insert(
            "n".to_string(),
            vec![
                step("n > 0", "'positive'"),
                step("n > 5", "'large'"),
            ],
        );
        let rule = Rule::compile(config).unwrap();
        assert_eq!(run(&rule, "9")["n"], "positive");
        // no true step leaves the value untouched
        assert_eq!(run(&rule, "0")["n"], "0");
    }

    #[test]
    fn test_unbound_variable_is_not_transformed() {
        let mut config = RuleConfig {
            name: "skip".to_string(),
            pattern: "^tick$".to_string(),
            format: "* * * * *".to_string(),
            ..Default::default()
        };
        config
            .transformations
            .insert("ghost".to_string(), vec![step("1 == 1", "'boo'")]);
        let rule = Rule::compile(config).unwrap();
        assert!(!run(&rule, "tick").contains_key("ghost"));
    }
}
