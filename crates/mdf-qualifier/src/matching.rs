//! Match functions: cast value versus query value.
//!
//! Two defaults cover every built-in scope. [`primitive`] handles
//! keyword and phrase operands (substring, equality, ordering); its
//! `List` arms give array-producing scopes their element-wise
//! behaviour. [`pattern`] handles regex operands the same way. A pair
//! of mismatched tags never matches.

use crate::value::{CastValue, QueryValue};

/// Keyword/phrase comparison.
///
/// `:` is substring inclusion, `=`/`!=` equality, and the ordering
/// operators apply to numeric and day values. For lists, `:` and `=`
/// match when any element does; `!=` matches when no element is equal.
pub fn primitive(operator: &str, cast: &CastValue, query: &QueryValue) -> bool {
    match (cast, query) {
        (CastValue::Str(operand), QueryValue::Str(value)) => {
            compare_str(operator, operand, value)
        }
        (CastValue::Str(operand), QueryValue::List(items)) => {
            compare_list(operator, operand, items)
        }
        (CastValue::Num(operand), QueryValue::Num(value)) => {
            compare_ord(operator, *value, *operand)
        }
        (CastValue::Day(operand), QueryValue::Day(value)) => {
            compare_ord(operator, *value, *operand)
        }
        (CastValue::Bool(operand), QueryValue::Bool(value)) => match operator {
            "=" => value == operand,
            "!=" => value != operand,
            _ => false,
        },
        _ => false,
    }
}

/// Regex comparison: the pattern must match the string, or any element
/// of a list.
pub fn pattern(_operator: &str, cast: &CastValue, query: &QueryValue) -> bool {
    let CastValue::Pattern(pattern) = cast else {
        return false;
    };
    match query {
        QueryValue::Str(value) => pattern.is_match(value),
        QueryValue::List(items) => items.iter().any(|item| pattern.is_match(item)),
        QueryValue::Num(_) | QueryValue::Bool(_) | QueryValue::Day(_) => false,
    }
}

/// String comparison for a single value.
fn compare_str(operator: &str, operand: &str, value: &str) -> bool {
    match operator {
        ":" => value.contains(operand),
        "=" => value == operand,
        "!=" => value != operand,
        _ => false,
    }
}

/// String comparison over list elements.
fn compare_list(operator: &str, operand: &str, items: &[String]) -> bool {
    match operator {
        ":" => items.iter().any(|item| item.contains(operand)),
        "=" => items.iter().any(|item| item == operand),
        "!=" => !items.iter().any(|item| item == operand),
        _ => false,
    }
}

/// Ordered comparison; `value` is the file's side, `operand` the query's.
fn compare_ord<T: PartialOrd>(operator: &str, value: T, operand: T) -> bool {
    match operator {
        "=" => value == operand,
        "!=" => value != operand,
        ">=" => value >= operand,
        "<=" => value <= operand,
        ">" => value > operand,
        "<" => value < operand,
        _ => false,
    }
}
