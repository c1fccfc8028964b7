//! Resolution contexts - the caller's qualifier values, validated at the
//! parsing boundary.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use polyres_core::{PolyresError, QualifierCollector, QualifierTypeCollector, Result};

type Values = SmallVec<[String; 2]>;

/// A validated map of qualifier name to one or more context values.
///
/// Contexts are built either from structured pairs or from the compact
/// token form `name=v1[,v2]*(|name2=...)*`. All validation (unknown
/// qualifiers, malformed clauses, list values for single-value types)
/// happens here; scoring assumes a valid context.
///
/// # Example
///
/// ```
/// use polyres_core::{Qualifier, QualifierCollector, QualifierType, QualifierTypeCollector};
/// use polyres_resolve::ResolutionContext;
///
/// let mut types = QualifierTypeCollector::new();
/// types.add(QualifierType::language("language", true).unwrap()).unwrap();
/// let mut qualifiers = QualifierCollector::new();
/// qualifiers
///     .add(Qualifier::new("language", "language", 600).unwrap(), &types)
///     .unwrap();
///
/// let context = ResolutionContext::parse("language=fr,en", &qualifiers, &types).unwrap();
/// assert_eq!(context.values("language"), vec!["fr", "en"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    values: BTreeMap<String, Values>,
}

impl ResolutionContext {
    /// An empty context.
    pub fn new() -> ResolutionContext {
        ResolutionContext::default()
    }

    /// Builds a context from `(qualifier, values)` pairs with the same
    /// validation as [`ResolutionContext::parse`].
    pub fn from_pairs<I, V>(
        pairs: I,
        qualifiers: &QualifierCollector,
        types: &QualifierTypeCollector,
    ) -> Result<ResolutionContext>
    where
        I: IntoIterator<Item = (String, V)>,
        V: IntoIterator<Item = String>,
    {
        let mut context = ResolutionContext::new();
        for (name, values) in pairs {
            let values: Values = values.into_iter().collect();
            context.insert(name, values, qualifiers, types)?;
        }
        Ok(context)
    }

    /// Parses the compact token form, e.g.
    /// `"language=en-US,en|homeTerritory=CA"`.
    pub fn parse(
        token: &str,
        qualifiers: &QualifierCollector,
        types: &QualifierTypeCollector,
    ) -> Result<ResolutionContext> {
        let mut context = ResolutionContext::new();
        if token.is_empty() {
            return Ok(context);
        }
        for clause in token.split('|') {
            let (name, values) = clause.split_once('=').ok_or_else(|| {
                PolyresError::validation(format!("malformed context clause '{clause}'"))
            })?;
            if values.is_empty() {
                return Err(PolyresError::validation(format!(
                    "context clause '{clause}' has no value"
                )));
            }
            let values: Values = values.split(',').map(str::to_string).collect();
            if values.iter().any(String::is_empty) {
                return Err(PolyresError::validation(format!(
                    "context clause '{clause}' has an empty value"
                )));
            }
            context.insert(name.to_string(), values, qualifiers, types)?;
        }
        Ok(context)
    }

    fn insert(
        &mut self,
        name: String,
        values: Values,
        qualifiers: &QualifierCollector,
        types: &QualifierTypeCollector,
    ) -> Result<()> {
        let qualifier = qualifiers.get_by_name_or_token(&name).ok_or_else(|| {
            PolyresError::reference(format!("context references unknown qualifier '{name}'"))
        })?;
        let qualifier_type = types.get(qualifier.type_name()).ok_or_else(|| {
            PolyresError::reference(format!(
                "qualifier '{}' references unknown type '{}'",
                qualifier.name(),
                qualifier.type_name()
            ))
        })?;
        if values.is_empty() {
            return Err(PolyresError::validation(format!(
                "no values supplied for qualifier '{}'",
                qualifier.name()
            )));
        }
        if values.len() > 1 && !qualifier_type.allow_context_list() {
            return Err(PolyresError::validation(format!(
                "qualifier '{}' does not accept a value list",
                qualifier.name()
            )));
        }
        if self.values.contains_key(qualifier.name()) {
            return Err(PolyresError::validation(format!(
                "duplicate context clause for qualifier '{}'",
                qualifier.name()
            )));
        }
        self.values.insert(qualifier.name().to_string(), values);
        Ok(())
    }

    /// Returns the values supplied for a qualifier; empty when absent.
    pub fn values(&self, qualifier_name: &str) -> Vec<&str> {
        self.values
            .get(qualifier_name)
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns true if the context supplies no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(qualifier, values)` in qualifier-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
