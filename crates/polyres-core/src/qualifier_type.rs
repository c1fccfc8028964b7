//! Qualifier types - pluggable matching strategies for one semantic
//! category of context (language, territory, literal enum).
//!
//! The set of strategies is closed, so dispatch is a plain `match` over
//! [`TypeMatcher`] rather than trait objects.

use std::fmt;

use crate::error::{ErrorAggregator, PolyresError, Result};
use crate::hierarchy::Hierarchy;
use crate::ident::validate_identifier;
use crate::language::LanguageTag;
use crate::score::MatchScore;

/// How a condition compares its value to the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ConditionOperator {
    /// Run the qualifier type's matching algorithm.
    #[default]
    Matches,
    /// Match unconditionally, even when the qualifier is absent from the
    /// context.
    Always,
    /// Never match.
    Never,
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConditionOperator::Matches => "matches",
            ConditionOperator::Always => "always",
            ConditionOperator::Never => "never",
        };
        f.write_str(s)
    }
}

/// Territory matching configuration: exact or hierarchical containment,
/// optional case normalization, optional closed allow-list.
#[derive(Debug, Clone, Default)]
pub struct TerritoryMatcher {
    allowed: Option<Vec<String>>,
    accept_lowercase: bool,
    hierarchy: Hierarchy,
}

impl TerritoryMatcher {
    /// Validates and builds a territory matcher. Allow-list members and
    /// hierarchy nodes must be well-formed territory codes; when an
    /// allow-list is present, every hierarchy node must be a member.
    pub fn new(
        allowed: Option<Vec<String>>,
        accept_lowercase: bool,
        hierarchy: impl IntoIterator<Item = (String, String)>,
    ) -> Result<TerritoryMatcher> {
        let mut errors = ErrorAggregator::new();

        let normalize = |v: &str| {
            if accept_lowercase {
                v.to_ascii_uppercase()
            } else {
                v.to_string()
            }
        };

        let allowed = allowed.map(|list| {
            list.iter()
                .map(|v| {
                    if !is_territory_code(v) {
                        errors.push(PolyresError::validation(format!(
                            "'{v}' is not a valid territory code"
                        )));
                    }
                    normalize(v)
                })
                .collect::<Vec<_>>()
        });

        let entries: Vec<(String, String)> = hierarchy
            .into_iter()
            .map(|(child, parent)| {
                for v in [&child, &parent] {
                    if !is_territory_code(v) {
                        errors.push(PolyresError::validation(format!(
                            "'{v}' is not a valid territory code"
                        )));
                    }
                    if let Some(allowed) = &allowed {
                        if !allowed.contains(&normalize(v)) {
                            errors.push(PolyresError::validation(format!(
                                "hierarchy territory '{v}' is not in the allowed list"
                            )));
                        }
                    }
                }
                (normalize(&child), normalize(&parent))
            })
            .collect();

        let hierarchy = errors.capture(Hierarchy::new(entries)).unwrap_or_default();
        errors.ok_or_report(TerritoryMatcher {
            allowed,
            accept_lowercase,
            hierarchy,
        })
    }

    fn normalize(&self, value: &str) -> String {
        if self.accept_lowercase {
            value.to_ascii_uppercase()
        } else {
            value.to_string()
        }
    }

    fn is_valid_value(&self, value: &str) -> bool {
        if !is_territory_code(value) {
            return false;
        }
        match &self.allowed {
            Some(allowed) => allowed.contains(&self.normalize(value)),
            None => true,
        }
    }

    fn score(&self, condition_value: &str, context_value: &str) -> MatchScore {
        let condition = self.normalize(condition_value);
        let context = self.normalize(context_value);
        if let Some(allowed) = &self.allowed {
            if !allowed.contains(&condition) || !allowed.contains(&context) {
                return MatchScore::NO_MATCH;
            }
        }
        if condition == context {
            return MatchScore::PERFECT;
        }
        // Only a condition declared broader than the context can fall
        // back; a narrow condition is never satisfied by a broad context.
        match self.hierarchy.ancestor_distance(&condition, &context) {
            Some(depth) => Hierarchy::partial_score(depth),
            None => MatchScore::NO_MATCH,
        }
    }
}

/// Literal matching configuration: membership in an enumerated value set,
/// optional case-insensitivity, optional hierarchy.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    values: Vec<String>,
    case_sensitive: bool,
    hierarchy: Hierarchy,
}

impl LiteralMatcher {
    /// Validates and builds a literal matcher. The value set must be
    /// non-empty and free of duplicates; hierarchy nodes must be members
    /// of the value set.
    pub fn new(
        values: Vec<String>,
        case_sensitive: bool,
        hierarchy: impl IntoIterator<Item = (String, String)>,
    ) -> Result<LiteralMatcher> {
        let mut errors = ErrorAggregator::new();

        let normalize = |v: &str| {
            if case_sensitive {
                v.to_string()
            } else {
                v.to_ascii_lowercase()
            }
        };

        if values.is_empty() {
            errors.push(PolyresError::validation(
                "literal type requires at least one value",
            ));
        }
        let mut normalized: Vec<String> = Vec::with_capacity(values.len());
        for v in &values {
            if !is_literal_value(v) {
                errors.push(PolyresError::validation(format!(
                    "'{v}' is not a valid literal value"
                )));
            }
            let n = normalize(v);
            if normalized.contains(&n) {
                errors.push(PolyresError::conflict(format!(
                    "duplicate literal value '{v}'"
                )));
            } else {
                normalized.push(n);
            }
        }

        let entries: Vec<(String, String)> = hierarchy
            .into_iter()
            .map(|(child, parent)| {
                for v in [&child, &parent] {
                    if !normalized.contains(&normalize(v)) {
                        errors.push(PolyresError::validation(format!(
                            "hierarchy value '{v}' is not in the value set"
                        )));
                    }
                }
                (normalize(&child), normalize(&parent))
            })
            .collect();

        let hierarchy = errors.capture(Hierarchy::new(entries)).unwrap_or_default();
        errors.ok_or_report(LiteralMatcher {
            values: normalized,
            case_sensitive,
            hierarchy,
        })
    }

    fn normalize(&self, value: &str) -> String {
        if self.case_sensitive {
            value.to_string()
        } else {
            value.to_ascii_lowercase()
        }
    }

    fn is_valid_value(&self, value: &str) -> bool {
        self.values.contains(&self.normalize(value))
    }

    fn score(&self, condition_value: &str, context_value: &str) -> MatchScore {
        let condition = self.normalize(condition_value);
        let context = self.normalize(context_value);
        if !self.values.contains(&condition) || !self.values.contains(&context) {
            return MatchScore::NO_MATCH;
        }
        if condition == context {
            return MatchScore::PERFECT;
        }
        match self.hierarchy.ancestor_distance(&condition, &context) {
            Some(depth) => Hierarchy::partial_score(depth),
            None => MatchScore::NO_MATCH,
        }
    }
}

/// The matching strategy of a qualifier type. Closed set; one variant per
/// system type.
#[derive(Debug, Clone)]
pub enum TypeMatcher {
    /// BCP-47 tag distance scoring.
    Language,
    /// Exact or hierarchical territory containment.
    Territory(TerritoryMatcher),
    /// Exact membership in an enumerated value set.
    Literal(LiteralMatcher),
}

/// A class of matchable context values: a named matching strategy plus a
/// collector-assigned index.
///
/// # Example
///
/// ```
/// use polyres_core::{ConditionOperator, MatchScore, QualifierType};
///
/// let qt = QualifierType::language("language", true).unwrap();
/// assert!(qt.is_valid_condition_value("en-US"));
/// let score = qt.matches("en", "en", ConditionOperator::Matches);
/// assert_eq!(score, MatchScore::PERFECT);
/// ```
#[derive(Debug, Clone)]
pub struct QualifierType {
    name: String,
    index: Option<usize>,
    allow_context_list: bool,
    matcher: TypeMatcher,
}

impl QualifierType {
    /// Creates a language qualifier type.
    pub fn language(name: impl Into<String>, allow_context_list: bool) -> Result<QualifierType> {
        Self::new(name, allow_context_list, TypeMatcher::Language)
    }

    /// Creates a territory qualifier type.
    pub fn territory(
        name: impl Into<String>,
        allow_context_list: bool,
        matcher: TerritoryMatcher,
    ) -> Result<QualifierType> {
        Self::new(name, allow_context_list, TypeMatcher::Territory(matcher))
    }

    /// Creates a literal qualifier type.
    pub fn literal(
        name: impl Into<String>,
        allow_context_list: bool,
        matcher: LiteralMatcher,
    ) -> Result<QualifierType> {
        Self::new(name, allow_context_list, TypeMatcher::Literal(matcher))
    }

    fn new(
        name: impl Into<String>,
        allow_context_list: bool,
        matcher: TypeMatcher,
    ) -> Result<QualifierType> {
        let name = name.into();
        validate_identifier(&name).map_err(|_| {
            PolyresError::validation(format!("'{name}' is not a valid qualifier type name"))
        })?;
        Ok(QualifierType {
            name,
            index: None,
            allow_context_list,
            matcher,
        })
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the collector-assigned index, if assigned.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Returns true if the runtime context may supply multiple values for
    /// qualifiers of this type (e.g. a language preference list).
    pub fn allow_context_list(&self) -> bool {
        self.allow_context_list
    }

    /// Returns the matching strategy.
    pub fn matcher(&self) -> &TypeMatcher {
        &self.matcher
    }

    /// Assigns the collector index. Set-once: re-setting to the same
    /// value is idempotent, any other value is a conflict.
    pub fn set_index(&mut self, index: usize) -> Result<()> {
        match self.index {
            None => {
                self.index = Some(index);
                Ok(())
            }
            Some(existing) if existing == index => Ok(()),
            Some(existing) => Err(PolyresError::conflict(format!(
                "qualifier type '{}' already has index {existing}, cannot set {index}",
                self.name
            ))),
        }
    }

    /// Returns true if `value` is acceptable as a condition value for
    /// this type.
    pub fn is_valid_condition_value(&self, value: &str) -> bool {
        match &self.matcher {
            TypeMatcher::Language => LanguageTag::parse(value).is_ok(),
            TypeMatcher::Territory(m) => m.is_valid_value(value),
            TypeMatcher::Literal(m) => m.is_valid_value(value),
        }
    }

    /// Scores one context value against one condition value. Pure and
    /// total for valid inputs; `Always` and `Never` bypass the value
    /// comparison entirely.
    pub fn matches(
        &self,
        condition_value: &str,
        context_value: &str,
        operator: ConditionOperator,
    ) -> MatchScore {
        match operator {
            ConditionOperator::Always => return MatchScore::PERFECT,
            ConditionOperator::Never => return MatchScore::NO_MATCH,
            ConditionOperator::Matches => {}
        }
        match &self.matcher {
            TypeMatcher::Language => {
                match (
                    LanguageTag::parse(condition_value),
                    LanguageTag::parse(context_value),
                ) {
                    (Ok(condition), Ok(context)) => condition.similarity(&context),
                    _ => MatchScore::NO_MATCH,
                }
            }
            TypeMatcher::Territory(m) => m.score(condition_value, context_value),
            TypeMatcher::Literal(m) => m.score(condition_value, context_value),
        }
    }
}

fn is_territory_code(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_literal_value(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_ascii_whitespace() || matches!(c, '|' | ',' | '='))
}

#[cfg(test)]
mod tests;
