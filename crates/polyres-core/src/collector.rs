//! Arena-style collectors for qualifier types and qualifiers.
//!
//! Collectors own their entries, assign immutable integer indexes, and
//! resolve name/token references. They are passed explicitly to every
//! construction and resolution call so multiple independent
//! configurations can coexist.

use crate::error::{PolyresError, Result};
use crate::qualifier::Qualifier;
use crate::qualifier_type::QualifierType;

/// Owns all qualifier types of one configuration, indexed by insertion
/// order and looked up by name.
#[derive(Debug, Clone, Default)]
pub struct QualifierTypeCollector {
    types: Vec<QualifierType>,
}

impl QualifierTypeCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a qualifier type, assigning its index. Duplicate names are
    /// rejected.
    pub fn add(&mut self, mut qualifier_type: QualifierType) -> Result<usize> {
        if self.get(qualifier_type.name()).is_some() {
            return Err(PolyresError::conflict(format!(
                "duplicate qualifier type '{}'",
                qualifier_type.name()
            )));
        }
        let index = self.types.len();
        qualifier_type.set_index(index)?;
        self.types.push(qualifier_type);
        Ok(index)
    }

    /// Looks up a qualifier type by name.
    pub fn get(&self, name: &str) -> Option<&QualifierType> {
        self.types.iter().find(|t| t.name() == name)
    }

    /// Looks up a qualifier type by index.
    pub fn get_by_index(&self, index: usize) -> Option<&QualifierType> {
        self.types.get(index)
    }

    /// Returns the number of collected types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types were collected.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over the collected types in index order.
    pub fn iter(&self) -> impl Iterator<Item = &QualifierType> {
        self.types.iter()
    }
}

/// Owns all qualifiers of one configuration, looked up by name or token.
#[derive(Debug, Clone, Default)]
pub struct QualifierCollector {
    qualifiers: Vec<Qualifier>,
}

impl QualifierCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a qualifier, assigning its index. The type reference must
    /// resolve in `types`; the name and token must not collide with any
    /// existing qualifier's name or token.
    pub fn add(&mut self, mut qualifier: Qualifier, types: &QualifierTypeCollector) -> Result<usize> {
        if types.get(qualifier.type_name()).is_none() {
            return Err(PolyresError::reference(format!(
                "qualifier '{}' references unknown type '{}'",
                qualifier.name(),
                qualifier.type_name()
            )));
        }
        for existing in &self.qualifiers {
            let names = [Some(existing.name()), existing.token()];
            if names.contains(&Some(qualifier.name())) {
                return Err(PolyresError::conflict(format!(
                    "duplicate qualifier name '{}'",
                    qualifier.name()
                )));
            }
            if let Some(token) = qualifier.token() {
                if names.contains(&Some(token)) {
                    return Err(PolyresError::conflict(format!(
                        "token '{token}' of qualifier '{}' collides with qualifier '{}'",
                        qualifier.name(),
                        existing.name()
                    )));
                }
            }
        }
        let index = self.qualifiers.len();
        qualifier.set_index(index)?;
        self.qualifiers.push(qualifier);
        Ok(index)
    }

    /// Looks up a qualifier by name.
    pub fn get(&self, name: &str) -> Option<&Qualifier> {
        self.qualifiers.iter().find(|q| q.name() == name)
    }

    /// Looks up a qualifier by name or token.
    pub fn get_by_name_or_token(&self, key: &str) -> Option<&Qualifier> {
        self.qualifiers
            .iter()
            .find(|q| q.name() == key || q.token() == Some(key))
    }

    /// Looks up a qualifier by index.
    pub fn get_by_index(&self, index: usize) -> Option<&Qualifier> {
        self.qualifiers.get(index)
    }

    /// Resolves a qualifier's type through the type collector.
    pub fn qualifier_type<'a>(
        &self,
        name: &str,
        types: &'a QualifierTypeCollector,
    ) -> Option<&'a QualifierType> {
        self.get(name).and_then(|q| types.get(q.type_name()))
    }

    /// Returns the number of collected qualifiers.
    pub fn len(&self) -> usize {
        self.qualifiers.len()
    }

    /// Returns true if no qualifiers were collected.
    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty()
    }

    /// Iterates over the collected qualifiers in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Qualifier> {
        self.qualifiers.iter()
    }
}
