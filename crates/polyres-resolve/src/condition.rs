//! Conditions - a single qualifier-value test with operator and priority.

use std::fmt;

use polyres_core::qualifier::MAX_PRIORITY;
use polyres_core::{
    ConditionOperator, MatchScore, PolyresError, QualifierCollector, QualifierType,
    QualifierTypeCollector, Result,
};

/// Unvalidated condition fields as they arrive from declarations.
#[derive(Debug, Clone, Default)]
pub struct ConditionDecl {
    /// Name of the qualifier being tested.
    pub qualifier_name: String,
    /// Comparison value.
    pub value: String,
    /// Comparison operator; defaults to `Matches`.
    pub operator: ConditionOperator,
    /// Priority override; defaults to the qualifier's default priority.
    pub priority: Option<u16>,
    /// Whether a match should rank as a default rather than a genuine match.
    pub score_as_default: bool,
}

impl ConditionDecl {
    /// Shorthand for the common `qualifier = value` case.
    pub fn matches(qualifier_name: impl Into<String>, value: impl Into<String>) -> ConditionDecl {
        ConditionDecl {
            qualifier_name: qualifier_name.into(),
            value: value.into(),
            ..ConditionDecl::default()
        }
    }
}

/// A validated test of one qualifier against one comparison value.
///
/// Conditions reference their qualifier by name, resolved through the
/// collectors at construction time; they hold no live pointer.
///
/// # Example
///
/// ```
/// use polyres_core::{Qualifier, QualifierCollector, QualifierType, QualifierTypeCollector};
/// use polyres_resolve::{Condition, ConditionDecl};
///
/// let mut types = QualifierTypeCollector::new();
/// types.add(QualifierType::language("language", true).unwrap()).unwrap();
/// let mut qualifiers = QualifierCollector::new();
/// qualifiers
///     .add(Qualifier::new("language", "language", 600).unwrap(), &types)
///     .unwrap();
///
/// let c = Condition::new(ConditionDecl::matches("language", "en"), &qualifiers, &types).unwrap();
/// assert_eq!(c.canonical_string(), "language-en@600");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    qualifier_name: String,
    value: String,
    operator: ConditionOperator,
    priority: u16,
    score_as_default: bool,
}

impl Condition {
    /// Validates a declaration against the collectors. The qualifier must
    /// exist; for the `Matches` operator the value must pass the
    /// qualifier type's validator. An unspecified priority defaults to
    /// the qualifier's.
    pub fn new(
        decl: ConditionDecl,
        qualifiers: &QualifierCollector,
        types: &QualifierTypeCollector,
    ) -> Result<Condition> {
        let qualifier = qualifiers.get(&decl.qualifier_name).ok_or_else(|| {
            PolyresError::reference(format!(
                "condition references unknown qualifier '{}'",
                decl.qualifier_name
            ))
        })?;
        let qualifier_type = types.get(qualifier.type_name()).ok_or_else(|| {
            PolyresError::reference(format!(
                "qualifier '{}' references unknown type '{}'",
                qualifier.name(),
                qualifier.type_name()
            ))
        })?;

        if decl.operator == ConditionOperator::Matches
            && !qualifier_type.is_valid_condition_value(&decl.value)
        {
            return Err(PolyresError::validation(format!(
                "'{}' is not a valid condition value for qualifier '{}'",
                decl.value,
                qualifier.name()
            )));
        }

        let priority = match decl.priority {
            Some(p) if p > MAX_PRIORITY => {
                return Err(PolyresError::validation(format!(
                    "priority {p} for condition on '{}' exceeds {MAX_PRIORITY}",
                    qualifier.name()
                )));
            }
            Some(p) => p,
            None => qualifier.default_priority(),
        };

        Ok(Condition {
            qualifier_name: decl.qualifier_name,
            value: decl.value,
            operator: decl.operator,
            priority,
            score_as_default: decl.score_as_default,
        })
    }

    /// Returns the tested qualifier's name.
    pub fn qualifier_name(&self) -> &str {
        &self.qualifier_name
    }

    /// Returns the comparison value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the comparison operator.
    pub fn operator(&self) -> ConditionOperator {
        self.operator
    }

    /// Returns the effective priority.
    pub fn priority(&self) -> u16 {
        self.priority
    }

    /// Returns true if a match should rank as a default.
    pub fn score_as_default(&self) -> bool {
        self.score_as_default
    }

    /// Returns true if this condition matches without consulting the
    /// context (operator `Always` or marked `score_as_default`).
    pub fn is_unconditional(&self) -> bool {
        self.operator == ConditionOperator::Always || self.score_as_default
    }

    /// Canonical string form, `"{qualifierName}-{value}@{priority}"`,
    /// used for condition-set keys and hashes.
    pub fn canonical_string(&self) -> String {
        format!("{}-{}@{}", self.qualifier_name, self.value, self.priority)
    }

    /// Scores the supplied context values for this condition's qualifier.
    /// Multi-value lists take the best per-value score, but only when the
    /// qualifier's type allows a context list; otherwise the first value
    /// decides. An empty slice (qualifier absent from the context) is
    /// `NO_MATCH` unless the operator is `Always`.
    pub fn score(&self, context_values: &[&str], qualifier_type: &QualifierType) -> MatchScore {
        if context_values.is_empty() {
            return match self.operator {
                ConditionOperator::Always => MatchScore::PERFECT,
                _ => MatchScore::NO_MATCH,
            };
        }
        if qualifier_type.allow_context_list() {
            context_values
                .iter()
                .map(|v| qualifier_type.matches(&self.value, v, self.operator))
                .fold(MatchScore::NO_MATCH, MatchScore::max)
        } else {
            qualifier_type.matches(&self.value, context_values[0], self.operator)
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_string())
    }
}
