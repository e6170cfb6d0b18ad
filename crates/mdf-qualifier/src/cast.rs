//! Operand coercion.
//!
//! A cast turns a validated operand string into the [`CastValue`] its
//! scope compares with. Validators run first, so casts only see operands
//! their validator accepted; the parse helpers are still shared so the
//! two stay in agreement.

use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::QualifierError,
    value::{CastValue, OperandKind},
};

/// A number with a mandatory binary unit, e.g. `10kb`, `1.5m`.
static SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)(kb|mb|gb|k|m|g)$").unwrap());

/// Date formats accepted by the time scope.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

/// Default cast for string scopes: keywords and phrases stay strings,
/// regex operands are compiled.
pub fn string_or_pattern(
    scope: &str,
    operand: &str,
    kind: OperandKind,
) -> Result<CastValue, QualifierError> {
    match kind {
        OperandKind::Keyword | OperandKind::Phrase => Ok(CastValue::Str(operand.to_string())),
        OperandKind::Regexp => Regex::new(operand).map(CastValue::Pattern).map_err(|err| {
            QualifierError::new(scope, format!("Invalid regular expression: {err}"))
        }),
    }
}

/// Cast for plain numeric scopes.
pub fn number(scope: &str, operand: &str, _kind: OperandKind) -> Result<CastValue, QualifierError> {
    operand
        .parse::<f64>()
        .map(CastValue::Num)
        .map_err(|_| QualifierError::new(scope, "Operand must be a number"))
}

/// Cast for the size scope: value times its binary unit, in bytes.
pub fn size(scope: &str, operand: &str, _kind: OperandKind) -> Result<CastValue, QualifierError> {
    parse_size(operand).map(CastValue::Num).ok_or_else(|| {
        QualifierError::new(
            scope,
            "Operand must be a number followed by a unit: mb|gb|kb|k|m|g",
        )
    })
}

/// Cast for the time scope: a calendar date as local-midnight epoch
/// milliseconds.
pub fn date(scope: &str, operand: &str, _kind: OperandKind) -> Result<CastValue, QualifierError> {
    let day = parse_date(operand).ok_or_else(|| {
        QualifierError::new(scope, "Operand must be a calendar date, e.g. 2024-03-12")
    })?;
    day_to_millis(day)
        .map(CastValue::Day)
        .ok_or_else(|| QualifierError::new(scope, "Date is not representable in the local timezone"))
}

/// Cast for boolean scopes.
pub fn boolean(scope: &str, operand: &str, _kind: OperandKind) -> Result<CastValue, QualifierError> {
    if operand.eq_ignore_ascii_case("true") {
        Ok(CastValue::Bool(true))
    } else if operand.eq_ignore_ascii_case("false") {
        Ok(CastValue::Bool(false))
    } else {
        Err(QualifierError::new(
            scope,
            "Operand must be「true」or「false」",
        ))
    }
}

/// Parses a size operand into bytes. Unit multipliers are binary powers
/// of 1024.
pub(crate) fn parse_size(operand: &str) -> Option<f64> {
    let captures = SIZE.captures(operand)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    let multiplier = match captures.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "k" | "kb" => 1024.0,
        "m" | "mb" => 1024.0 * 1024.0,
        _ => 1024.0 * 1024.0 * 1024.0,
    };
    Some(value * multiplier)
}

/// Parses a calendar-date operand.
pub(crate) fn parse_date(operand: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(operand, format).ok())
}

/// Epoch milliseconds of the local midnight beginning `day`.
fn day_to_millis(day: NaiveDate) -> Option<i64> {
    day.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|moment| moment.timestamp_millis())
}

/// Truncates a modification time to its local midnight, in epoch
/// milliseconds. Falls back to 0 for times the local calendar cannot
/// represent.
pub fn local_midnight_millis(time: SystemTime) -> i64 {
    let day = DateTime::<Local>::from(time).date_naive();
    day_to_millis(day).unwrap_or(0)
}
