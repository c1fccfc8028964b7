//! Parent/child value hierarchies for territory and literal matching.

use std::collections::HashMap;

use crate::error::{ErrorAggregator, PolyresError, Result};
use crate::score::MatchScore;

/// Per-step decay of a hierarchical partial match. The exact curve is not
/// a contract; only strict bounds and monotonicity in depth are.
const DEPTH_DECAY: f64 = 0.9;

/// A child-to-parent mapping of arbitrary depth, used for containment
/// scoring: a condition value that is an ancestor of the context value is
/// a partial match that weakens with distance.
///
/// # Example
///
/// ```
/// use polyres_core::Hierarchy;
///
/// let h = Hierarchy::new([
///     ("CA".to_string(), "NA".to_string()),
///     ("US".to_string(), "NA".to_string()),
///     ("NA".to_string(), "world".to_string()),
/// ]).unwrap();
///
/// assert_eq!(h.ancestor_distance("NA", "CA"), Some(1));
/// assert_eq!(h.ancestor_distance("world", "CA"), Some(2));
/// assert_eq!(h.ancestor_distance("CA", "NA"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    parents: HashMap<String, String>,
}

impl Hierarchy {
    /// Builds a hierarchy from child/parent pairs, validating that no
    /// entry is self-referential and no chain loops back on itself.
    /// Parents that are not themselves children are roots and need no
    /// entry of their own.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Result<Hierarchy> {
        let mut errors = ErrorAggregator::new();
        let mut parents: HashMap<String, String> = HashMap::new();
        for (child, parent) in entries {
            if child == parent {
                errors.push(PolyresError::validation(format!(
                    "hierarchy entry '{child}' references itself"
                )));
                continue;
            }
            if parents.insert(child.clone(), parent).is_some() {
                errors.push(PolyresError::conflict(format!(
                    "hierarchy entry '{child}' declared twice"
                )));
            }
        }

        // Walk each chain to the root; revisiting a node means a cycle.
        for start in parents.keys() {
            let mut seen = vec![start.as_str()];
            let mut current = start.as_str();
            while let Some(parent) = parents.get(current) {
                if seen.contains(&parent.as_str()) {
                    errors.push(PolyresError::validation(format!(
                        "hierarchy cycle involving '{start}'"
                    )));
                    break;
                }
                seen.push(parent);
                current = parent;
            }
        }

        errors.ok_or_report(Hierarchy { parents })
    }

    /// Returns true if the hierarchy has no entries.
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns true if `value` appears as a child or a parent anywhere in
    /// the hierarchy.
    pub fn contains(&self, value: &str) -> bool {
        self.parents.contains_key(value) || self.parents.values().any(|p| p == value)
    }

    /// Number of steps from `child` up to `ancestor`, or `None` when
    /// `ancestor` is not above `child`. Distance 0 (identity) is not
    /// reported; exact equality is the caller's perfect-match case.
    pub fn ancestor_distance(&self, ancestor: &str, child: &str) -> Option<u32> {
        let mut current = child;
        let mut depth = 0u32;
        while let Some(parent) = self.parents.get(current) {
            depth += 1;
            if parent == ancestor {
                return Some(depth);
            }
            current = parent;
        }
        None
    }

    /// Partial score for a condition value `depth` steps above the
    /// context value: `DEPTH_DECAY^depth`, strictly inside (0, 1) and
    /// strictly decreasing in depth.
    pub fn partial_score(depth: u32) -> MatchScore {
        let value = DEPTH_DECAY.powi(depth.max(1) as i32);
        MatchScore::partial(value).unwrap_or(MatchScore::NO_MATCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Hierarchy {
        Hierarchy::new([
            ("CA".to_string(), "NA".to_string()),
            ("US".to_string(), "NA".to_string()),
            ("NA".to_string(), "world".to_string()),
        ])
        .unwrap()
    }

    #[test]
    fn test_distance() {
        let h = sample();
        assert_eq!(h.ancestor_distance("NA", "CA"), Some(1));
        assert_eq!(h.ancestor_distance("world", "US"), Some(2));
        assert_eq!(h.ancestor_distance("world", "world"), None);
        assert_eq!(h.ancestor_distance("US", "CA"), None);
    }

    #[test]
    fn test_reverse_is_not_ancestry() {
        let h = sample();
        assert_eq!(h.ancestor_distance("CA", "NA"), None);
    }

    #[test]
    fn test_self_reference_rejected() {
        let result = Hierarchy::new([("CA".to_string(), "CA".to_string())]);
        assert!(matches!(result, Err(PolyresError::Validation(_))));
    }

    #[test]
    fn test_cycle_rejected() {
        let result = Hierarchy::new([
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string()),
            ("c".to_string(), "a".to_string()),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let result = Hierarchy::new([
            ("CA".to_string(), "NA".to_string()),
            ("CA".to_string(), "world".to_string()),
        ]);
        assert!(matches!(result, Err(PolyresError::Conflict(_))));
    }

    #[test]
    fn test_partial_score_monotonic_in_depth() {
        let d1 = Hierarchy::partial_score(1);
        let d2 = Hierarchy::partial_score(2);
        let d3 = Hierarchy::partial_score(3);
        assert!(MatchScore::NO_MATCH < d3);
        assert!(d3 < d2);
        assert!(d2 < d1);
        assert!(d1 < MatchScore::PERFECT);
    }
}
