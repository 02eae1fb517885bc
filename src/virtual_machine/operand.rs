//! Operand token syntax.
//!
//! An operand token is one of three forms, recognized in this order:
//!
//! 1. identifier: `[A-Za-z0-9_]+`, not starting with a digit
//! 2. array element: `name[index]`, where `index` is a literal or an identifier
//! 3. integer literal: optional `-`, then at most 20 decimal digits
//!
//! Everything here is pure string handling; looking names up in the symbol table
//! happens in the VM's resolver.

use crate::virtual_machine::errors::{
    IDENTIFIER_QUOTE_LIMIT, QUOTE_LIMIT, RuntimeFault, compress,
};

/// Longest accepted run of literal digits (sign excluded).
pub const MAX_LITERAL_DIGITS: usize = 20;

/// Syntactic form of an operand token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperandSyntax<'a> {
    /// A valid identifier.
    Identifier(&'a str),
    /// `array[index]`; neither part is validated yet.
    Element { array: &'a str, index: &'a str },
    /// Anything else, to be parsed as an integer literal.
    Literal(&'a str),
}

impl<'a> OperandSyntax<'a> {
    /// Classifies a token using the fixed precedence identifier, element, literal.
    pub fn classify(token: &'a str) -> Self {
        if is_identifier(token) {
            return OperandSyntax::Identifier(token);
        }
        if let Some((array, index)) = split_element(token) {
            return OperandSyntax::Element { array, index };
        }
        OperandSyntax::Literal(token)
    }
}

/// Checks that `name` may be used as a variable name.
pub fn validate_identifier(name: &str) -> Result<(), RuntimeFault> {
    if !name.bytes().all(|b| b == b'_' || b.is_ascii_alphanumeric()) {
        return Err(RuntimeFault::InvalidCharacters {
            name: compress(name, IDENTIFIER_QUOTE_LIMIT),
        });
    }
    match name.bytes().next() {
        Some(first) if !first.is_ascii_digit() => Ok(()),
        _ => Err(RuntimeFault::LeadingDigit {
            name: compress(name, QUOTE_LIMIT),
        }),
    }
}

/// Returns whether `name` is a valid identifier.
pub fn is_identifier(name: &str) -> bool {
    validate_identifier(name).is_ok()
}

/// Splits `name[index]` at the first `[` and the trailing `]`.
fn split_element(token: &str) -> Option<(&str, &str)> {
    let body = token.strip_suffix(']')?;
    let bracket = body.find('[')?;
    Some((&body[..bracket], &body[bracket + 1..]))
}

/// Parses a signed decimal literal.
///
/// Digits accumulate with 64-bit wraparound, so 20-digit literals beyond the
/// `i64` range wrap rather than fault.
pub fn parse_integer_literal(text: &str) -> Result<i64, RuntimeFault> {
    match text.strip_prefix('-') {
        Some(digits) => parse_digits(digits).map(|value| (value as i64).wrapping_neg()),
        None => parse_digits(text).map(|value| value as i64),
    }
}

fn parse_digits(digits: &str) -> Result<u64, RuntimeFault> {
    let mut value: u64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return Err(RuntimeFault::MalformedInteger {
                literal: compress(digits, QUOTE_LIMIT),
            });
        }
        value = value.wrapping_mul(10).wrapping_add(u64::from(b - b'0'));
    }
    if digits.len() > MAX_LITERAL_DIGITS {
        return Err(RuntimeFault::IntegerTooLong {
            literal: compress(digits, QUOTE_LIMIT),
        });
    }
    if digits.is_empty() {
        return Err(RuntimeFault::EmptyInteger);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        assert!(is_identifier("a"));
        assert!(is_identifier("_"));
        assert!(is_identifier("snake_case_2"));
        assert!(is_identifier("CamelCase"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a[0]"));
        assert!(!is_identifier("héllo"));
    }

    #[test]
    fn identifier_faults_distinguish_reason() {
        assert!(matches!(
            validate_identifier("x$y"),
            Err(RuntimeFault::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_identifier("9lives"),
            Err(RuntimeFault::LeadingDigit { .. })
        ));
    }

    #[test]
    fn invalid_character_names_are_quoted_short() {
        let name = format!("{}!", "a".repeat(40));
        match validate_identifier(&name) {
            Err(RuntimeFault::InvalidCharacters { name }) => {
                assert_eq!(name.chars().count(), IDENTIFIER_QUOTE_LIMIT)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn classify_precedence() {
        assert_eq!(OperandSyntax::classify("x"), OperandSyntax::Identifier("x"));
        assert_eq!(
            OperandSyntax::classify("arr[i]"),
            OperandSyntax::Element {
                array: "arr",
                index: "i"
            }
        );
        assert_eq!(OperandSyntax::classify("-12"), OperandSyntax::Literal("-12"));
        assert_eq!(OperandSyntax::classify("12"), OperandSyntax::Literal("12"));
        assert_eq!(OperandSyntax::classify("arr[i"), OperandSyntax::Literal("arr[i"));
    }

    #[test]
    fn element_splits_at_first_bracket() {
        assert_eq!(split_element("a[b[0]]"), Some(("a", "b[0]")));
        assert_eq!(split_element("[]"), Some(("", "")));
        assert_eq!(split_element("a]"), None);
    }

    #[test]
    fn literals() {
        assert_eq!(parse_integer_literal("0"), Ok(0));
        assert_eq!(parse_integer_literal("42"), Ok(42));
        assert_eq!(parse_integer_literal("-42"), Ok(-42));
        assert_eq!(parse_integer_literal("007"), Ok(7));
        assert_eq!(
            parse_integer_literal("9223372036854775807"),
            Ok(i64::MAX)
        );
        assert_eq!(
            parse_integer_literal("-9223372036854775808"),
            Ok(i64::MIN)
        );
    }

    #[test]
    fn twenty_digit_literals_wrap() {
        assert_eq!(parse_integer_literal("18446744073709551615"), Ok(-1));
        assert_eq!(parse_integer_literal("18446744073709551616"), Ok(0));
        assert_eq!(parse_integer_literal("00000000000000000001"), Ok(1));
    }

    #[test]
    fn literal_faults() {
        assert_eq!(parse_integer_literal(""), Err(RuntimeFault::EmptyInteger));
        assert_eq!(parse_integer_literal("-"), Err(RuntimeFault::EmptyInteger));
        assert!(matches!(
            parse_integer_literal("+1"),
            Err(RuntimeFault::MalformedInteger { .. })
        ));
        assert!(matches!(
            parse_integer_literal("--1"),
            Err(RuntimeFault::MalformedInteger { .. })
        ));
        assert!(matches!(
            parse_integer_literal("12a"),
            Err(RuntimeFault::MalformedInteger { .. })
        ));
        assert!(matches!(
            parse_integer_literal("000000000000000000001"),
            Err(RuntimeFault::IntegerTooLong { .. })
        ));
        assert!(matches!(
            parse_integer_literal("-000000000000000000001"),
            Err(RuntimeFault::IntegerTooLong { .. })
        ));
    }
}
