//! Identifier grammar validation.
//!
//! Qualifier-type names, qualifier names, tokens, and resource id segments
//! all share one grammar: `[A-Za-z_][A-Za-z0-9_-]*`. Validation happens at
//! construction time so the rest of the engine can assume well-formed names.

use crate::error::{PolyresError, Result};

/// Validates a single identifier against `[A-Za-z_][A-Za-z0-9_-]*`.
///
/// # Example
///
/// ```
/// use polyres_core::validate_identifier;
///
/// assert!(validate_identifier("home_territory").is_ok());
/// assert!(validate_identifier("lang-2").is_ok());
/// assert!(validate_identifier("9lives").is_err());
/// assert!(validate_identifier("").is_err());
/// ```
pub fn validate_identifier(s: &str) -> Result<()> {
    let mut chars = s.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(PolyresError::validation(format!(
            "'{s}' is not a valid identifier"
        )))
    }
}

/// Validates a resource id: one or more identifier segments joined by `.`.
pub fn validate_resource_id(s: &str) -> Result<()> {
    if s.is_empty() {
        return Err(PolyresError::validation("resource id must not be empty"));
    }
    for segment in s.split('.') {
        validate_identifier(segment).map_err(|_| {
            PolyresError::validation(format!("'{s}' is not a valid resource id"))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        for name in ["a", "_x", "language", "home-territory", "q_1", "A9"] {
            assert!(validate_identifier(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for name in ["", "9a", "-x", "a b", "é", "a.b", "a=b"] {
            assert!(validate_identifier(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn test_resource_ids() {
        assert!(validate_resource_id("greeting").is_ok());
        assert!(validate_resource_id("app.menu.title").is_ok());
        assert!(validate_resource_id("").is_err());
        assert!(validate_resource_id("app..title").is_err());
        assert!(validate_resource_id(".app").is_err());
    }
}
