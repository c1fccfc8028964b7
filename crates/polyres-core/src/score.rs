//! Match scores - candidate quality as a value in [0.0, 1.0]

use std::cmp::Ordering;
use std::fmt;

/// How well a context value satisfies a condition value.
///
/// Scores are confined to `[0.0, 1.0]`: `NO_MATCH` (0.0) means the
/// condition rejects the context, `PERFECT` (1.0) means an exact match,
/// and values strictly between mark partial matches such as hierarchical
/// region fallback.
///
/// # Examples
///
/// ```
/// use polyres_core::MatchScore;
///
/// let partial = MatchScore::partial(0.9).unwrap();
/// assert!(partial > MatchScore::NO_MATCH);
/// assert!(partial < MatchScore::PERFECT);
/// assert!(partial.is_match());
/// assert!(!partial.is_perfect());
/// ```
#[derive(Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchScore(f64);

impl MatchScore {
    /// The condition rejects the context value.
    pub const NO_MATCH: MatchScore = MatchScore(0.0);

    /// An exact match.
    pub const PERFECT: MatchScore = MatchScore(1.0);

    /// Creates a partial score. Returns `None` unless the value is finite
    /// and strictly between `NO_MATCH` and `PERFECT`.
    pub fn partial(value: f64) -> Option<MatchScore> {
        if value.is_finite() && value > 0.0 && value < 1.0 {
            Some(MatchScore(value))
        } else {
            None
        }
    }

    /// Returns the raw score value.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Returns true if the score is anything better than `NO_MATCH`.
    #[inline]
    pub fn is_match(&self) -> bool {
        self.0 > 0.0
    }

    /// Returns true for an exact match.
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.0 >= 1.0
    }

    /// Returns the better of two scores.
    pub fn max(self, other: MatchScore) -> MatchScore {
        if other > self {
            other
        } else {
            self
        }
    }
}

impl Eq for MatchScore {}

impl Ord for MatchScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // Scores are finite by construction.
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for MatchScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchScore({})", self.0)
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Aggregate score of a whole condition set against one context.
///
/// `score_total` is the priority-weighted sum of per-condition scores;
/// `priority_total` is the summed priorities of the contributing
/// conditions, used as a secondary tie-break when weighted scores are
/// equal. Ordering compares `score_total` first, then `priority_total`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SetScore {
    /// Priority-weighted sum of per-condition scores.
    pub score_total: f64,
    /// Sum of the priorities of all conditions in the set.
    pub priority_total: u64,
    /// Number of conditions that contributed a score.
    pub matched: usize,
}

impl SetScore {
    /// The score of an empty (unconditional) set.
    pub const ZERO: SetScore = SetScore {
        score_total: 0.0,
        priority_total: 0,
        matched: 0,
    };

    /// Folds one condition result into the aggregate.
    pub fn add(&mut self, score: MatchScore, priority: u16) {
        self.score_total += score.value() * f64::from(priority);
        self.priority_total += u64::from(priority);
        self.matched += 1;
    }
}

impl Eq for SetScore {}

impl Ord for SetScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.score_total.total_cmp(&other.score_total) {
            Ordering::Equal => self.priority_total.cmp(&other.priority_total),
            order => order,
        }
    }
}

impl PartialOrd for SetScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}@{}", self.score_total, self.priority_total)
    }
}
