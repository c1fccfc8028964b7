//! Decisions - the full candidate set competing for one resource slot.

use std::fmt;

use crate::candidate::Candidate;

/// Key of a decision with no candidates.
pub const EMPTY_DECISION_KEY: &str = "empty";

/// All candidates competing for one resolvable slot, held in canonical
/// order with a derived key that is sensitive to both structure
/// (condition-set hashes) and values (a CRC32 over the JSON-stringified
/// payloads). The key is invariant to the order candidates are supplied
/// in.
#[derive(Debug, Clone)]
pub struct Decision {
    candidates: Vec<Candidate>,
    key: String,
    index: Option<usize>,
}

impl Decision {
    /// Builds a decision, normalizing candidate order and computing the
    /// key.
    pub fn new(mut candidates: Vec<Candidate>) -> Decision {
        candidates.sort_by(Candidate::canonical_cmp);
        let key = Self::compute_key(&candidates);
        Decision {
            candidates,
            key,
            index: None,
        }
    }

    /// An empty decision.
    pub fn empty() -> Decision {
        Decision::new(Vec::new())
    }

    fn compute_key(candidates: &[Candidate]) -> String {
        if candidates.is_empty() {
            return EMPTY_DECISION_KEY.to_string();
        }
        // Most specific hash first.
        let hashes = candidates
            .iter()
            .rev()
            .map(|c| c.condition_set().hash())
            .collect::<Vec<_>>()
            .join("+");
        let mut digest = crc32fast::Hasher::new();
        for candidate in candidates.iter().rev() {
            digest.update(candidate.value().to_string().as_bytes());
        }
        format!("{hashes}|{:08x}", digest.finalize())
    }

    /// Returns the candidates in canonical order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Returns the number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns true if the decision has no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the structural + value key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the assigned index, if any.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Assigns the decision's index. Negative indexes are invalid;
    /// re-setting to the same value is idempotent; re-setting to a
    /// different value is a conflict.
    pub fn set_index(&mut self, index: i64) -> polyres_core::Result<()> {
        if index < 0 {
            return Err(polyres_core::PolyresError::validation(format!(
                "decision index must not be negative, got {index}"
            )));
        }
        let index = index as usize;
        match self.index {
            None => {
                self.index = Some(index);
                Ok(())
            }
            Some(existing) if existing == index => Ok(()),
            Some(existing) => Err(polyres_core::PolyresError::conflict(format!(
                "decision already has index {existing}, cannot set {index}"
            ))),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decision[{} candidates, key {}]", self.candidates.len(), self.key)
    }
}
