//! Condition and operation mini-language
//!
//! Rule documents describe transformations and special cases with tiny
//! expressions such as `hour < 12`, `period == 'pm'` or `hour + offset`.
//! They are tokenized once when a rule is compiled; identifiers are
//! resolved against the current bindings by exact name at evaluation
//! time, so a variable called `a` never touches other tokens.
//!
//! Supported forms:
//! - conditions: `==` (string compare after trim), then `<`, then `>`
//!   (both sides as integers, unparseable sides count as 0). A condition
//!   with none of these operators is false.
//! - operations: `left + right` (integer sum, unparseable sides count as 0);
//!   anything else evaluates to its rendered text, so `'first'` yields
//!   `first` and `minute` yields the bound value.

use crate::error::Result;
use crate::rule::Bindings;

/// Binary operators recognized by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
    Plus,
}

impl Operator {
    fn symbol(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    /// Identifier, resolved against bindings
    Ident(String),
    /// Quoted literal, inner text only
    Literal(String),
    /// Numbers and any other verbatim text
    Raw(String),
    Op(Operator),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    /// Whitespace preceded this token in the source
    spaced: bool,
}

/// A run of tokens between operators
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Term(Vec<Token>);

impl Term {
    /// Render the term with identifiers replaced by their bound values
    pub fn render(&self, bindings: &Bindings) -> String {
        let mut out = String::new();
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 && token.spaced {
                out.push(' ');
            }
            match &token.kind {
                TokenKind::Ident(name) => match bindings.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(name),
                },
                TokenKind::Literal(text) | TokenKind::Raw(text) => out.push_str(text),
                TokenKind::Op(op) => out.push_str(op.symbol()),
            }
        }
        out
    }

    fn integer(&self, bindings: &Bindings) -> i64 {
        self.render(bindings).trim().parse().unwrap_or(0)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Comparison used by a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Less,
    Greater,
}

/// Parsed condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Compare {
        comparison: Comparison,
        left: Term,
        right: Term,
    },
    /// No supported operator; always false
    Never,
}

impl Condition {
    /// Parse a condition; never fails
    pub fn parse(source: &str) -> Self {
        let tokens = tokenize(source);
        let candidates = [
            (Operator::Eq, Comparison::Equal),
            (Operator::Lt, Comparison::Less),
            (Operator::Gt, Comparison::Greater),
        ];
        for (op, comparison) in candidates {
            if let Some((left, right)) = split_at_first(&tokens, op) {
                return Condition::Compare {
                    comparison,
                    left,
                    right,
                };
            }
        }
        Condition::Never
    }

    /// Evaluate against the current bindings
    pub fn evaluate(&self, bindings: &Bindings) -> bool {
        match self {
            Condition::Never => false,
            Condition::Compare {
                comparison: Comparison::Equal,
                left,
                right,
            } => left.render(bindings).trim() == right.render(bindings).trim(),
            Condition::Compare {
                comparison: Comparison::Less,
                left,
                right,
            } => left.integer(bindings) < right.integer(bindings),
            Condition::Compare {
                comparison: Comparison::Greater,
                left,
                right,
            } => left.integer(bindings) > right.integer(bindings),
        }
    }
}

/// Parsed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Sum(Term, Term),
    Value(Term),
}

impl Operation {
    /// Parse an operation; never fails
    pub fn parse(source: &str) -> Self {
        let tokens = tokenize(source);
        match split_at_first(&tokens, Operator::Plus) {
            Some((left, right)) => Operation::Sum(left, right),
            None => Operation::Value(Term(tokens)),
        }
    }

    /// Evaluate against the current bindings
    ///
    /// Every operation defined today is total; the `Result` leaves room for
    /// operations that can fail with [`crate::ScribeError::Transformation`].
    pub fn evaluate(&self, bindings: &Bindings) -> Result<String> {
        match self {
            Operation::Sum(left, right) => {
                let sum = left.integer(bindings).saturating_add(right.integer(bindings));
                Ok(sum.to_string())
            }
            Operation::Value(term) if term.is_empty() => Ok(String::new()),
            Operation::Value(term) => Ok(term.render(bindings)),
        }
    }
}

fn split_at_first(tokens: &[Token], op: Operator) -> Option<(Term, Term)> {
    let pos = tokens.iter().position(|t| t.kind == TokenKind::Op(op))?;
    let left = tokens[..pos].to_vec();
    let mut right = tokens[pos + 1..].to_vec();
    if let Some(first) = right.first_mut() {
        first.spaced = false;
    }
    Some((Term(left), Term(right)))
}

fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    let mut spaced = false;

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            spaced = true;
            continue;
        }

        let kind = if c == '\'' || c == '"' {
            chars.next();
            let mut text = String::new();
            for (_, ch) in chars.by_ref() {
                if ch == c {
                    break;
                }
                text.push(ch);
            }
            TokenKind::Literal(text)
        } else if c == '=' && source[start..].starts_with("==") {
            chars.next();
            chars.next();
            TokenKind::Op(Operator::Eq)
        } else if c == '<' {
            chars.next();
            TokenKind::Op(Operator::Lt)
        } else if c == '>' {
            chars.next();
            TokenKind::Op(Operator::Gt)
        } else if c == '+' {
            chars.next();
            TokenKind::Op(Operator::Plus)
        } else if c.is_alphabetic() || c == '_' {
            let mut name = String::new();
            while let Some(&(_, ch)) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                name.push(ch);
                chars.next();
            }
            TokenKind::Ident(name)
        } else if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&(_, ch)) = chars.peek() {
                if !ch.is_ascii_digit() {
                    break;
                }
                digits.push(ch);
                chars.next();
            }
            TokenKind::Raw(digits)
        } else {
            chars.next();
            TokenKind::Raw(c.to_string())
        };

        tokens.push(Token { kind, spaced });
        spaced = false;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_equality_against_literal() {
        let vars = bindings(&[("period", "pm")]);
        assert!(Condition::parse("period == 'pm'").evaluate(&vars));
        assert!(Condition::parse("period == \"pm\"").evaluate(&vars));
        assert!(!Condition::parse("period == 'am'").evaluate(&vars));
    }

    #[test]
    fn test_equality_trims_sides() {
        let vars = bindings(&[("hour", "12")]);
        assert!(Condition::parse("hour==12").evaluate(&vars));
        assert!(Condition::parse("  hour   ==   12  ").evaluate(&vars));
    }

    #[test]
    fn test_numeric_comparisons() {
        let vars = bindings(&[("hour", "3")]);
        assert!(Condition::parse("hour < 12").evaluate(&vars));
        assert!(!Condition::parse("hour > 12").evaluate(&vars));
        assert!(Condition::parse("hour > 2").evaluate(&vars));
    }

    #[test]
    fn test_non_numeric_side_counts_as_zero() {
        let vars = bindings(&[("hour", "noon")]);
        assert!(Condition::parse("hour < 1").evaluate(&vars));
        assert!(!Condition::parse("hour > 0").evaluate(&vars));
    }

    #[test]
    fn test_equality_takes_priority_over_less_than() {
        // `==` wins even though `<` appears first
        let vars = bindings(&[("a", "1"), ("b", "2")]);
        assert!(Condition::parse("a < b == '1 < 2'").evaluate(&vars));
    }

    #[test]
    fn test_condition_without_operator_is_false() {
        let vars = bindings(&[("flag", "true")]);
        assert_eq!(Condition::parse("flag"), Condition::Never);
        assert!(!Condition::parse("flag").evaluate(&vars));
        assert!(!Condition::parse("flag != 'x'").evaluate(&vars));
    }

    #[test]
    fn test_names_resolve_as_whole_tokens() {
        // Substring replacement would turn `day` into `"15"` inside `days`
        let vars = bindings(&[("day", "15"), ("days", "3")]);
        assert!(Condition::parse("days == 3").evaluate(&vars));
        assert!(Condition::parse("day == 15").evaluate(&vars));

        let vars = bindings(&[("a", "x")]);
        assert!(Condition::parse("a == 'x'").evaluate(&vars));
        assert!(Condition::parse("cat == 'cat'").evaluate(&vars));
    }

    #[test]
    fn test_unbound_identifier_renders_as_name() {
        let vars = Bindings::new();
        assert!(Condition::parse("period == period").evaluate(&vars));
        assert!(!Condition::parse("period == 'pm'").evaluate(&vars));
    }

    #[test]
    fn test_sum_operation() {
        let vars = bindings(&[("hour", "3"), ("offset", "12")]);
        assert_eq!(Operation::parse("hour + 12").evaluate(&vars).unwrap(), "15");
        assert_eq!(Operation::parse("hour + offset").evaluate(&vars).unwrap(), "15");
        assert_eq!(Operation::parse("offset+0").evaluate(&vars).unwrap(), "12");
    }

    #[test]
    fn test_sum_splits_on_first_plus() {
        let vars = bindings(&[("hour", "3")]);
        // right side "1 + 1" does not parse as an integer
        assert_eq!(Operation::parse("hour + 1 + 1").evaluate(&vars).unwrap(), "3");
    }

    #[test]
    fn test_sum_with_non_numeric_side() {
        let vars = bindings(&[("hour", "noon")]);
        assert_eq!(Operation::parse("hour + 12").evaluate(&vars).unwrap(), "12");
    }

    #[test]
    fn test_quoted_literal_operation() {
        let vars = bindings(&[("nth", "1")]);
        assert_eq!(Operation::parse("'first'").evaluate(&vars).unwrap(), "first");
        assert_eq!(Operation::parse("'  spaced  '").evaluate(&vars).unwrap(), "  spaced  ");
        assert_eq!(Operation::parse("'первый'").evaluate(&vars).unwrap(), "первый");
    }

    #[test]
    fn test_plain_operation_passes_through() {
        let vars = bindings(&[("minute", "30")]);
        assert_eq!(Operation::parse("minute").evaluate(&vars).unwrap(), "30");
        assert_eq!(Operation::parse("1-5").evaluate(&vars).unwrap(), "1-5");
        assert_eq!(Operation::parse("*/minute").evaluate(&vars).unwrap(), "*/30");
        assert_eq!(Operation::parse("").evaluate(&vars).unwrap(), "");
    }
}
