//! Error types for polyres

use std::fmt;

use thiserror::Error;

/// Main error type for polyres operations
#[derive(Debug, Error)]
pub enum PolyresError {
    /// Malformed identifier, out-of-range priority, or invalid configuration
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reference to an unknown qualifier or qualifier type
    #[error("Reference error: {0}")]
    Reference(String),

    /// Resolution found no matching candidate and no default
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate name/token, or an attempt to re-assign an immutable index
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Several validation errors collected from one declaration tree
    #[error("{}", format_multiple(.0))]
    Multiple(Vec<PolyresError>),
}

impl PolyresError {
    /// Creates a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        PolyresError::Validation(msg.into())
    }

    /// Creates a reference error.
    pub fn reference(msg: impl Into<String>) -> Self {
        PolyresError::Reference(msg.into())
    }

    /// Creates a not-found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        PolyresError::NotFound(msg.into())
    }

    /// Creates a conflict error.
    pub fn conflict(msg: impl Into<String>) -> Self {
        PolyresError::Conflict(msg.into())
    }
}

fn format_multiple(errors: &[PolyresError]) -> String {
    let mut out = format!("{} errors:", errors.len());
    for e in errors {
        out.push_str("\n  - ");
        out.push_str(&e.to_string());
    }
    out
}

/// Result type alias for polyres operations
pub type Result<T> = std::result::Result<T, PolyresError>;

/// Collects validation errors across a declaration tree so a whole
/// configuration can be reported in one pass instead of failing on the
/// first problem.
///
/// # Example
///
/// ```
/// use polyres_core::{ErrorAggregator, PolyresError};
///
/// let mut errors = ErrorAggregator::new();
/// errors.push(PolyresError::validation("bad name 'x y'"));
/// errors.push(PolyresError::conflict("duplicate qualifier 'lang'"));
/// assert!(errors.ok_or_report(()).is_err());
/// ```
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    errors: Vec<PolyresError>,
}

impl ErrorAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one error.
    pub fn push(&mut self, error: PolyresError) {
        match error {
            PolyresError::Multiple(inner) => self.errors.extend(inner),
            other => self.errors.push(other),
        }
    }

    /// Records the error of a result, if any, returning the success value.
    pub fn capture<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Returns true if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `value` if no errors were recorded, otherwise the merged
    /// error report (a single error stays unwrapped).
    pub fn ok_or_report<T>(self, value: T) -> Result<T> {
        let mut errors = self.errors;
        match errors.len() {
            0 => Ok(value),
            1 => Err(errors.remove(0)),
            _ => Err(PolyresError::Multiple(errors)),
        }
    }
}

impl fmt::Display for ErrorAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors collected", self.errors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregator_is_ok() {
        let errors = ErrorAggregator::new();
        assert!(errors.is_empty());
        assert_eq!(errors.ok_or_report(42).unwrap(), 42);
    }

    #[test]
    fn test_single_error_stays_unwrapped() {
        let mut errors = ErrorAggregator::new();
        errors.push(PolyresError::validation("bad"));
        match errors.ok_or_report(()) {
            Err(PolyresError::Validation(msg)) => assert_eq!(msg, "bad"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_errors_merge() {
        let mut errors = ErrorAggregator::new();
        errors.push(PolyresError::validation("one"));
        errors.push(PolyresError::conflict("two"));
        match errors.ok_or_report(()) {
            Err(PolyresError::Multiple(inner)) => assert_eq!(inner.len(), 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_multiple_flattens() {
        let mut outer = ErrorAggregator::new();
        outer.push(PolyresError::Multiple(vec![
            PolyresError::validation("a"),
            PolyresError::validation("b"),
        ]));
        outer.push(PolyresError::reference("c"));
        assert_eq!(outer.len(), 3);
    }

    #[test]
    fn test_capture() {
        let mut errors = ErrorAggregator::new();
        assert_eq!(errors.capture(Ok(1)), Some(1));
        assert_eq!(errors.capture::<i32>(Err(PolyresError::validation("x"))), None);
        assert_eq!(errors.len(), 1);
    }
}
