//! Condition sets - AND-combinations of conditions with a canonical,
//! order-independent identity.

use std::fmt;

use polyres_core::{
    MatchScore, PolyresError, QualifierCollector, QualifierTypeCollector, Result, SetScore,
};

use crate::condition::Condition;
use crate::context::ResolutionContext;

/// An unordered set of conditions combined with AND semantics.
///
/// Conditions are stored in canonical order (descending priority, ties by
/// ascending qualifier name), so two sets built from the same conditions
/// in any order have the same key and hash.
#[derive(Debug, Clone)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
    canonical_key: String,
    hash: String,
}

impl ConditionSet {
    /// Builds a set, rejecting duplicate qualifier references.
    pub fn new(mut conditions: Vec<Condition>) -> Result<ConditionSet> {
        for (i, condition) in conditions.iter().enumerate() {
            if conditions[..i]
                .iter()
                .any(|c| c.qualifier_name() == condition.qualifier_name())
            {
                return Err(PolyresError::validation(format!(
                    "condition set references qualifier '{}' more than once",
                    condition.qualifier_name()
                )));
            }
        }
        conditions.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.qualifier_name().cmp(b.qualifier_name()))
        });
        let canonical_key = conditions
            .iter()
            .map(Condition::canonical_string)
            .collect::<Vec<_>>()
            .join("+");
        let hash = format!("{:08x}", crc32fast::hash(canonical_key.as_bytes()));
        Ok(ConditionSet {
            conditions,
            canonical_key,
            hash,
        })
    }

    /// The empty (unconditional) set.
    pub fn empty() -> ConditionSet {
        // Empty input cannot have duplicates.
        ConditionSet::new(Vec::new()).expect("empty condition set")
    }

    /// Returns the conditions in canonical order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns true if the set has no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns true if this set acts as a default: empty, or every
    /// condition is unconditional (`Always` or `score_as_default`).
    pub fn is_unconditional(&self) -> bool {
        self.conditions.iter().all(Condition::is_unconditional)
    }

    /// `+`-joined canonical condition strings. Identity: two sets are
    /// equal iff their canonical keys are.
    pub fn canonical_key(&self) -> &str {
        &self.canonical_key
    }

    /// 8-hex-digit CRC32 digest of the canonical key.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Sum of all condition priorities.
    pub fn priority_total(&self) -> u64 {
        self.conditions.iter().map(|c| u64::from(c.priority())).sum()
    }

    /// Scores the set against a context with AND semantics: every
    /// condition must match or the whole set is `None`. The aggregate is
    /// the priority-weighted sum of per-condition scores. The empty set
    /// matches everything with a zero score.
    pub fn score(
        &self,
        context: &ResolutionContext,
        qualifiers: &QualifierCollector,
        types: &QualifierTypeCollector,
    ) -> Option<SetScore> {
        let mut total = SetScore::ZERO;
        for condition in &self.conditions {
            let qualifier_type = qualifiers.qualifier_type(condition.qualifier_name(), types)?;
            let values = context.values(condition.qualifier_name());
            let score = condition.score(&values, qualifier_type);
            if score == MatchScore::NO_MATCH {
                return None;
            }
            total.add(score, condition.priority());
        }
        Some(total)
    }
}

impl PartialEq for ConditionSet {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_key == other.canonical_key
    }
}

impl Eq for ConditionSet {}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_key)
    }
}
