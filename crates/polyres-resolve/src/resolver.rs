//! Candidate scoring and winner selection.
//!
//! Resolution is a pure function of (decision, context): no state, no
//! I/O, no suspension. Ties are never broken by insertion order, so the
//! winner is reproducible regardless of build order.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::{debug, trace};

use polyres_core::{PolyresError, QualifierCollector, QualifierTypeCollector, Result, SetScore};

use crate::candidate::{Candidate, MergeMethod};
use crate::context::ResolutionContext;
use crate::decision::Decision;
use crate::merge::{merge_values, ArrayMergePolicy};

/// One candidate's scoring outcome, for ranked diagnostic output.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    /// The scored candidate.
    pub candidate: &'a Candidate,
    /// The aggregate condition-set score.
    pub score: SetScore,
    /// True when the candidate's condition set is unconditional and the
    /// candidate therefore acts as a fallback.
    pub is_default: bool,
}

/// Scores every candidate in the decision against the context and
/// returns the matches, ranked: genuine matches before defaults, then
/// descending weighted score, descending aggregate priority, then
/// ascending condition-set hash and serialized payload as deterministic
/// tie-breaks. Candidates whose sets score no-match are dropped.
pub fn resolve_all<'a>(
    decision: &'a Decision,
    context: &ResolutionContext,
    qualifiers: &QualifierCollector,
    types: &QualifierTypeCollector,
) -> Vec<ScoredCandidate<'a>> {
    let mut scored: Vec<ScoredCandidate<'a>> = decision
        .candidates()
        .iter()
        .filter_map(|candidate| {
            let score = candidate.condition_set().score(context, qualifiers, types)?;
            let is_default = candidate.condition_set().is_unconditional();
            trace!(
                set = candidate.condition_set().canonical_key(),
                %score,
                is_default,
                "candidate matched"
            );
            Some(ScoredCandidate {
                candidate,
                score,
                is_default,
            })
        })
        .collect();

    scored.sort_by(|a, b| rank(a, b));
    scored
}

fn rank(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    a.is_default
        .cmp(&b.is_default)
        .then_with(|| b.score.cmp(&a.score))
        .then_with(|| {
            a.candidate
                .condition_set()
                .hash()
                .cmp(b.candidate.condition_set().hash())
        })
        .then_with(|| {
            // Candidates sharing a condition set rank by payload, never
            // by insertion order.
            a.candidate
                .value()
                .to_string()
                .cmp(&b.candidate.value().to_string())
        })
}

/// Resolves the single best candidate value for the context.
///
/// The winner is the top-ranked match from [`resolve_all`]. A partial
/// winner with [`MergeMethod::Augment`] is merged over every
/// lower-ranked matching augment partial and the fallback default, in
/// ascending rank so the winner's keys overwrite. A
/// [`MergeMethod::Replace`] winner is returned verbatim. No match and no
/// default is a [`PolyresError::NotFound`].
pub fn resolve_best(
    decision: &Decision,
    context: &ResolutionContext,
    qualifiers: &QualifierCollector,
    types: &QualifierTypeCollector,
) -> Result<Value> {
    let scored = resolve_all(decision, context, qualifiers, types);
    let winner = scored
        .first()
        .ok_or_else(|| PolyresError::not_found("no candidate matches the context"))?;
    debug!(
        set = winner.candidate.condition_set().canonical_key(),
        score = %winner.score,
        "resolved winner"
    );

    if !winner.candidate.is_partial() || winner.candidate.merge_method() == MergeMethod::Replace {
        return Ok(winner.candidate.value().clone());
    }

    // Fold the augment partials (and the base default, if any) from the
    // bottom of the ranking upward so higher-ranked payloads overwrite.
    // Only the best-ranked default participates as the base layer.
    let mut base_default_taken = false;
    let mut layers: Vec<&Candidate> = scored
        .iter()
        .filter(|s| {
            if s.is_default {
                if base_default_taken {
                    return false;
                }
                base_default_taken = true;
                return true;
            }
            s.candidate.is_partial() && s.candidate.merge_method() == MergeMethod::Augment
        })
        .map(|s| s.candidate)
        .collect();
    layers.reverse();

    let mut merged = layers
        .first()
        .map(|c| c.value().clone())
        .unwrap_or_else(|| winner.candidate.value().clone());
    for layer in layers.iter().skip(1) {
        merge_values(&mut merged, layer.value(), ArrayMergePolicy::Replace);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests;
