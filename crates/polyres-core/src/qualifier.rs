//! Qualifiers - named, typed, priority-weighted axes of variation.

use crate::error::{PolyresError, Result};
use crate::ident::validate_identifier;

/// Highest allowed condition/qualifier priority.
pub const MAX_PRIORITY: u16 = 999;

/// One named axis of variation (e.g. `language`, priority 800), bound to
/// a qualifier type by name. Immutable once collected; owned exclusively
/// by its [`QualifierCollector`](crate::QualifierCollector).
///
/// # Example
///
/// ```
/// use polyres_core::Qualifier;
///
/// let q = Qualifier::new("language", "language", 600)
///     .unwrap()
///     .with_token("lang")
///     .unwrap();
/// assert_eq!(q.token(), Some("lang"));
/// ```
#[derive(Debug, Clone)]
pub struct Qualifier {
    name: String,
    type_name: String,
    default_priority: u16,
    token: Option<String>,
    default_value: Option<String>,
    index: Option<usize>,
}

impl Qualifier {
    /// Creates a qualifier, validating the name grammar and priority
    /// range. The type reference is checked against a collector when the
    /// qualifier is added to one.
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        default_priority: u16,
    ) -> Result<Qualifier> {
        let name = name.into();
        let type_name = type_name.into();
        validate_identifier(&name)
            .map_err(|_| PolyresError::validation(format!("'{name}' is not a valid qualifier name")))?;
        validate_identifier(&type_name).map_err(|_| {
            PolyresError::validation(format!("'{type_name}' is not a valid qualifier type name"))
        })?;
        if default_priority > MAX_PRIORITY {
            return Err(PolyresError::validation(format!(
                "priority {default_priority} for qualifier '{name}' exceeds {MAX_PRIORITY}"
            )));
        }
        Ok(Qualifier {
            name,
            type_name,
            default_priority,
            token: None,
            default_value: None,
            index: None,
        })
    }

    /// Sets a short alias used by compact serializations.
    pub fn with_token(mut self, token: impl Into<String>) -> Result<Qualifier> {
        let token = token.into();
        validate_identifier(&token).map_err(|_| {
            PolyresError::validation(format!(
                "'{token}' is not a valid token for qualifier '{}'",
                self.name
            ))
        })?;
        self.token = Some(token);
        Ok(self)
    }

    /// Sets the default context value.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Qualifier {
        self.default_value = Some(value.into());
        self
    }

    /// Returns the qualifier name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the qualifier type this qualifier uses.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the priority conditions inherit when they don't set one.
    pub fn default_priority(&self) -> u16 {
        self.default_priority
    }

    /// Returns the compact-serialization alias, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the default context value, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Returns the collector-assigned index, if assigned.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) -> Result<()> {
        match self.index {
            None => {
                self.index = Some(index);
                Ok(())
            }
            Some(existing) if existing == index => Ok(()),
            Some(existing) => Err(PolyresError::conflict(format!(
                "qualifier '{}' already has index {existing}, cannot set {index}",
                self.name
            ))),
        }
    }
}
