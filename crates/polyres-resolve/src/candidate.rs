//! Candidates - a condition-guarded JSON value competing for one
//! resource slot.

use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::Value;

use crate::condition_set::ConditionSet;

/// How a partial candidate combines with lower-ranked matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MergeMethod {
    /// Merge JSON payloads: object keys overwrite, nested objects merge
    /// recursively, arrays are replaced wholesale.
    #[default]
    Augment,
    /// Use the winning candidate's value verbatim, ignoring other partials.
    Replace,
}

/// One possible value for a resource, guarded by a condition set.
#[derive(Debug, Clone)]
pub struct Candidate {
    condition_set: Arc<ConditionSet>,
    value: Value,
    is_partial: bool,
    merge_method: MergeMethod,
}

impl Candidate {
    /// Creates a complete (non-partial) candidate.
    pub fn new(condition_set: Arc<ConditionSet>, value: Value) -> Candidate {
        Candidate {
            condition_set,
            value,
            is_partial: false,
            merge_method: MergeMethod::default(),
        }
    }

    /// Creates a partial candidate with the given merge method.
    pub fn partial(
        condition_set: Arc<ConditionSet>,
        value: Value,
        merge_method: MergeMethod,
    ) -> Candidate {
        Candidate {
            condition_set,
            value,
            is_partial: true,
            merge_method,
        }
    }

    /// Returns the guarding condition set.
    pub fn condition_set(&self) -> &Arc<ConditionSet> {
        &self.condition_set
    }

    /// Returns the candidate's JSON payload.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns true if this candidate carries only part of a value.
    pub fn is_partial(&self) -> bool {
        self.is_partial
    }

    /// Returns the merge method for partial candidates.
    pub fn merge_method(&self) -> MergeMethod {
        self.merge_method
    }

    /// Canonical total order for candidates within a decision: ascending
    /// aggregate condition-set priority, ties broken by condition-set
    /// hash, so the most specific candidate sorts last. Candidates
    /// sharing a condition set order by their serialized payload, then
    /// by partiality and merge method. Insertion order never
    /// participates.
    pub fn canonical_cmp(&self, other: &Candidate) -> Ordering {
        self.condition_set
            .priority_total()
            .cmp(&other.condition_set.priority_total())
            .then_with(|| self.condition_set.hash().cmp(other.condition_set.hash()))
            .then_with(|| self.value.to_string().cmp(&other.value.to_string()))
            .then_with(|| self.is_partial.cmp(&other.is_partial))
            .then_with(|| self.merge_method.cmp(&other.merge_method))
    }
}
