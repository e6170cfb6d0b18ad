//! Error type for qualifier validation and casting.

use thiserror::Error;

/// Error raised by a qualifier's validate or cast step.
///
/// Displays as `In <SCOPE>: <message>`, e.g.
/// `In SIZE: Operand must be a number followed by a unit: mb|gb|kb|k|m|g`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("In {scope}: {message}")]
pub struct QualifierError {
    /// The offending scope, uppercased for display.
    scope: String,
    /// What was wrong with the operator or operand.
    message: String,
}

impl QualifierError {
    /// Creates an error for `scope` with the given message.
    pub fn new(scope: &str, message: impl Into<String>) -> Self {
        Self {
            scope: scope.to_uppercase(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uppercases_scope() {
        let err = QualifierError::new(
            "size",
            "Operand must be a number followed by a unit: mb|gb|kb|k|m|g",
        );
        assert_eq!(
            err.to_string(),
            "In SIZE: Operand must be a number followed by a unit: mb|gb|kb|k|m|g"
        );
    }
}
