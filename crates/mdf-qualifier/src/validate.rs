//! Operand validators.
//!
//! A validator checks the operator/operand pair a query supplies for a
//! scope, before any file work begins. Each scope family has one:
//! string-or-regex scopes, the comparable scopes (number, size, date),
//! and boolean scopes. Custom qualifiers may reuse these or supply their
//! own with the same signature.

use regex::Regex;

use crate::{error::QualifierError, value::OperandKind};

/// Operators accepted by string and regex scopes.
const STRING_OPERATORS: &[&str] = &[":", "=", "!="];

/// Operators accepted by comparable scopes (size, time, counts).
const COMPARE_OPERATORS: &[&str] = &["=", "!=", ">=", "<=", ">", "<"];

/// Operators accepted by boolean scopes.
const BOOL_OPERATORS: &[&str] = &["=", "!="];

/// Validator for string scopes: `:`, `=`, `!=`; a regex operand must use
/// `:` and must compile.
pub fn string_or_regex(
    scope: &str,
    operator: &str,
    operand: &str,
    kind: OperandKind,
) -> Result<(), QualifierError> {
    supported_operator(scope, operator, STRING_OPERATORS)?;
    if kind == OperandKind::Regexp {
        if operator != ":" {
            return Err(QualifierError::new(
                scope,
                "Regular expression operand requires the「:」operator",
            ));
        }
        compiles(scope, operand)?;
    }
    Ok(())
}

/// Validator for plain numeric scopes (linenum, charnum, chinesenum).
pub fn number(
    scope: &str,
    operator: &str,
    operand: &str,
    kind: OperandKind,
) -> Result<(), QualifierError> {
    comparable(scope, operator, kind)?;
    if operand.parse::<f64>().is_err() {
        return Err(QualifierError::new(scope, "Operand must be a number"));
    }
    Ok(())
}

/// Validator for the size scope: a number followed by a binary unit.
pub fn size(
    scope: &str,
    operator: &str,
    operand: &str,
    kind: OperandKind,
) -> Result<(), QualifierError> {
    comparable(scope, operator, kind)?;
    if crate::cast::parse_size(operand).is_none() {
        return Err(QualifierError::new(
            scope,
            "Operand must be a number followed by a unit: mb|gb|kb|k|m|g",
        ));
    }
    Ok(())
}

/// Validator for the time scope: any parseable calendar date.
pub fn date(
    scope: &str,
    operator: &str,
    operand: &str,
    kind: OperandKind,
) -> Result<(), QualifierError> {
    comparable(scope, operator, kind)?;
    if crate::cast::parse_date(operand).is_none() {
        return Err(QualifierError::new(
            scope,
            "Operand must be a calendar date, e.g. 2024-03-12",
        ));
    }
    Ok(())
}

/// Validator for boolean scopes: `=`/`!=` with a `true`/`false` operand.
pub fn boolean(
    scope: &str,
    operator: &str,
    operand: &str,
    kind: OperandKind,
) -> Result<(), QualifierError> {
    supported_operator(scope, operator, BOOL_OPERATORS)?;
    reject_regex(scope, kind)?;
    if !operand.eq_ignore_ascii_case("true") && !operand.eq_ignore_ascii_case("false") {
        return Err(QualifierError::new(
            scope,
            "Operand must be「true」or「false」",
        ));
    }
    Ok(())
}

/// Shared checks for comparable scopes: ordering operators only, no
/// regex operands.
fn comparable(scope: &str, operator: &str, kind: OperandKind) -> Result<(), QualifierError> {
    supported_operator(scope, operator, COMPARE_OPERATORS)?;
    reject_regex(scope, kind)
}

/// Rejects operators outside the allowed set.
fn supported_operator(
    scope: &str,
    operator: &str,
    allowed: &[&str],
) -> Result<(), QualifierError> {
    if allowed.contains(&operator) {
        Ok(())
    } else {
        Err(QualifierError::new(
            scope,
            format!("Unsupported operator:「{operator}」"),
        ))
    }
}

/// Rejects regex operands on scopes that cannot compare them.
fn reject_regex(scope: &str, kind: OperandKind) -> Result<(), QualifierError> {
    if kind == OperandKind::Regexp {
        return Err(QualifierError::new(
            scope,
            "Regular expression operand is not supported",
        ));
    }
    Ok(())
}

/// Checks that a regex operand compiles.
fn compiles(scope: &str, operand: &str) -> Result<(), QualifierError> {
    Regex::new(operand)
        .map(|_| ())
        .map_err(|err| QualifierError::new(scope, format!("Invalid regular expression: {err}")))
}
