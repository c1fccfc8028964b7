//! Tests for scoring and winner selection.

use std::sync::Arc;

use serde_json::json;

use polyres_core::{
    ConditionOperator, Qualifier, QualifierCollector, QualifierType, QualifierTypeCollector,
    TerritoryMatcher,
};

use super::*;
use crate::condition::{Condition, ConditionDecl};
use crate::condition_set::ConditionSet;

fn collectors() -> (QualifierCollector, QualifierTypeCollector) {
    let mut types = QualifierTypeCollector::new();
    types
        .add(QualifierType::language("language", true).unwrap())
        .unwrap();
    types
        .add(
            QualifierType::territory(
                "territory",
                false,
                TerritoryMatcher::new(None, true, []).unwrap(),
            )
            .unwrap(),
        )
        .unwrap();
    let mut qualifiers = QualifierCollector::new();
    qualifiers
        .add(Qualifier::new("language", "language", 600).unwrap(), &types)
        .unwrap();
    qualifiers
        .add(
            Qualifier::new("homeTerritory", "territory", 800).unwrap(),
            &types,
        )
        .unwrap();
    (qualifiers, types)
}

fn set(
    pairs: &[(&str, &str)],
    qualifiers: &QualifierCollector,
    types: &QualifierTypeCollector,
) -> Arc<ConditionSet> {
    let conditions = pairs
        .iter()
        .map(|(q, v)| {
            Condition::new(ConditionDecl::matches(*q, *v), qualifiers, types).unwrap()
        })
        .collect();
    Arc::new(ConditionSet::new(conditions).unwrap())
}

fn scenario_decision(
    qualifiers: &QualifierCollector,
    types: &QualifierTypeCollector,
    with_default: bool,
) -> Decision {
    let mut candidates = vec![
        Candidate::new(set(&[("language", "en")], qualifiers, types), json!("A")),
        Candidate::new(set(&[("homeTerritory", "CA")], qualifiers, types), json!("B")),
    ];
    if with_default {
        candidates.push(Candidate::new(
            Arc::new(ConditionSet::empty()),
            json!("default"),
        ));
    }
    Decision::new(candidates)
}

#[test]
fn test_best_match_by_condition() {
    let (qualifiers, types) = collectors();
    let decision = scenario_decision(&qualifiers, &types, true);

    let en = ResolutionContext::parse("language=en", &qualifiers, &types).unwrap();
    assert_eq!(resolve_best(&decision, &en, &qualifiers, &types).unwrap(), json!("A"));

    // Only the territory set matches; the language condition fails on fr.
    let ca = ResolutionContext::parse("homeTerritory=CA|language=fr", &qualifiers, &types).unwrap();
    assert_eq!(resolve_best(&decision, &ca, &qualifiers, &types).unwrap(), json!("B"));
}

#[test]
fn test_default_when_nothing_matches() {
    let (qualifiers, types) = collectors();
    let decision = scenario_decision(&qualifiers, &types, true);
    let empty = ResolutionContext::new();
    assert_eq!(
        resolve_best(&decision, &empty, &qualifiers, &types).unwrap(),
        json!("default")
    );
}

#[test]
fn test_not_found_without_default() {
    let (qualifiers, types) = collectors();
    let decision = scenario_decision(&qualifiers, &types, false);
    let de = ResolutionContext::parse("language=de", &qualifiers, &types).unwrap();
    let result = resolve_best(&decision, &de, &qualifiers, &types);
    assert!(matches!(result, Err(PolyresError::NotFound(_))));
}

#[test]
fn test_higher_priority_wins_on_joint_match() {
    let (qualifiers, types) = collectors();
    let decision = scenario_decision(&qualifiers, &types, false);
    // Both sets match; homeTerritory's priority 800 outweighs language's 600.
    let both = ResolutionContext::parse("language=en|homeTerritory=CA", &qualifiers, &types)
        .unwrap();
    assert_eq!(
        resolve_best(&decision, &both, &qualifiers, &types).unwrap(),
        json!("B")
    );
}

#[test]
fn test_genuine_match_outranks_default() {
    let (qualifiers, types) = collectors();
    let decision = scenario_decision(&qualifiers, &types, true);
    let en = ResolutionContext::parse("language=en", &qualifiers, &types).unwrap();
    let ranked = resolve_all(&decision, &en, &qualifiers, &types);
    assert_eq!(ranked.len(), 2);
    assert!(!ranked[0].is_default);
    assert!(ranked[1].is_default);
}

#[test]
fn test_determinism_under_permutation() {
    let (qualifiers, types) = collectors();
    let a = Candidate::new(set(&[("language", "en")], &qualifiers, &types), json!("A"));
    let b = Candidate::new(
        set(&[("language", "en"), ("homeTerritory", "CA")], &qualifiers, &types),
        json!("AB"),
    );
    let c = Candidate::new(Arc::new(ConditionSet::empty()), json!("default"));

    let context =
        ResolutionContext::parse("language=en|homeTerritory=CA", &qualifiers, &types).unwrap();
    let forward = Decision::new(vec![a.clone(), b.clone(), c.clone()]);
    let reverse = Decision::new(vec![c, b, a]);
    let w1 = resolve_best(&forward, &context, &qualifiers, &types).unwrap();
    let w2 = resolve_best(&reverse, &context, &qualifiers, &types).unwrap();
    assert_eq!(w1, w2);
    assert_eq!(w1, json!("AB"));

    // Repeated calls are bit-identical.
    assert_eq!(w1, resolve_best(&forward, &context, &qualifiers, &types).unwrap());
}

#[test]
fn test_equal_sets_tie_break_by_hash() {
    let (qualifiers, types) = collectors();
    // Two candidates with different single-condition sets of equal
    // priority and equal score; hash ordering decides, not insertion.
    let ctx = ResolutionContext::parse("language=en,fr", &qualifiers, &types).unwrap();
    let en = Candidate::new(set(&[("language", "en")], &qualifiers, &types), json!("en"));
    let fr = Candidate::new(set(&[("language", "fr")], &qualifiers, &types), json!("fr"));

    let expected = if en.condition_set().hash() < fr.condition_set().hash() {
        json!("en")
    } else {
        json!("fr")
    };
    let d1 = Decision::new(vec![en.clone(), fr.clone()]);
    let d2 = Decision::new(vec![fr, en]);
    assert_eq!(resolve_best(&d1, &ctx, &qualifiers, &types).unwrap(), expected);
    assert_eq!(resolve_best(&d2, &ctx, &qualifiers, &types).unwrap(), expected);
}

#[test]
fn test_duplicate_sets_resolve_independent_of_insertion_order() {
    let (qualifiers, types) = collectors();
    // Two defaults share the empty condition set; the payload tie-break
    // keeps both the key and the winner stable across build orders.
    let a = Candidate::new(Arc::new(ConditionSet::empty()), json!("first"));
    let b = Candidate::new(Arc::new(ConditionSet::empty()), json!("second"));
    let d1 = Decision::new(vec![a.clone(), b.clone()]);
    let d2 = Decision::new(vec![b, a]);
    assert_eq!(d1.key(), d2.key());

    let empty = ResolutionContext::new();
    let w1 = resolve_best(&d1, &empty, &qualifiers, &types).unwrap();
    let w2 = resolve_best(&d2, &empty, &qualifiers, &types).unwrap();
    assert_eq!(w1, w2);
    assert_eq!(w1, json!("first"));
}

#[test]
fn test_score_as_default_ranks_behind_genuine_matches() {
    let (qualifiers, types) = collectors();
    let fallback_decl = ConditionDecl {
        score_as_default: true,
        priority: Some(900),
        ..ConditionDecl::matches("language", "en")
    };
    let fallback_set = Arc::new(
        ConditionSet::new(vec![
            Condition::new(fallback_decl, &qualifiers, &types).unwrap()
        ])
        .unwrap(),
    );
    let decision = Decision::new(vec![
        Candidate::new(Arc::clone(&fallback_set), json!("fallback")),
        Candidate::new(set(&[("language", "en")], &qualifiers, &types), json!("genuine")),
    ]);

    // Both sets score perfectly on language=en and the fallback even
    // carries the higher priority, yet it ranks behind the genuine match.
    let en = ResolutionContext::parse("language=en", &qualifiers, &types).unwrap();
    let ranked = resolve_all(&decision, &en, &qualifiers, &types);
    assert_eq!(ranked.len(), 2);
    assert!(!ranked[0].is_default);
    assert!(ranked[1].is_default);
    assert_eq!(
        resolve_best(&decision, &en, &qualifiers, &types).unwrap(),
        json!("genuine")
    );

    // Without a genuine competitor the fallback wins, but only when its
    // own condition actually matches.
    let solo = Decision::new(vec![Candidate::new(fallback_set, json!("fallback"))]);
    assert_eq!(
        resolve_best(&solo, &en, &qualifiers, &types).unwrap(),
        json!("fallback")
    );
    let fr = ResolutionContext::parse("language=fr", &qualifiers, &types).unwrap();
    assert!(matches!(
        resolve_best(&solo, &fr, &qualifiers, &types),
        Err(PolyresError::NotFound(_))
    ));
}

#[test]
fn test_augment_partials_merge_over_default() {
    let (qualifiers, types) = collectors();
    let candidates = vec![
        Candidate::new(
            Arc::new(ConditionSet::empty()),
            json!({ "greeting": "hello", "farewell": "bye" }),
        ),
        Candidate::partial(
            set(&[("language", "en")], &qualifiers, &types),
            json!({ "greeting": "howdy" }),
            MergeMethod::Augment,
        ),
        Candidate::partial(
            set(&[("homeTerritory", "CA")], &qualifiers, &types),
            json!({ "greeting": "eh", "currency": "CAD" }),
            MergeMethod::Augment,
        ),
    ];
    let decision = Decision::new(candidates);
    let context =
        ResolutionContext::parse("language=en|homeTerritory=CA", &qualifiers, &types).unwrap();
    let value = resolve_best(&decision, &context, &qualifiers, &types).unwrap();
    // The territory partial outranks the language partial (priority 800
    // vs 600), so its greeting wins; all other keys merge through.
    assert_eq!(
        value,
        json!({ "greeting": "eh", "farewell": "bye", "currency": "CAD" })
    );
}

#[test]
fn test_replace_winner_ignores_partials() {
    let (qualifiers, types) = collectors();
    let candidates = vec![
        Candidate::new(Arc::new(ConditionSet::empty()), json!({ "greeting": "hello" })),
        Candidate::partial(
            set(&[("homeTerritory", "CA")], &qualifiers, &types),
            json!({ "greeting": "eh" }),
            MergeMethod::Replace,
        ),
    ];
    let decision = Decision::new(candidates);
    let context = ResolutionContext::parse("homeTerritory=CA", &qualifiers, &types).unwrap();
    let value = resolve_best(&decision, &context, &qualifiers, &types).unwrap();
    assert_eq!(value, json!({ "greeting": "eh" }));
}

#[test]
fn test_always_condition_matches_absent_qualifier() {
    let (qualifiers, types) = collectors();
    let decl = ConditionDecl {
        operator: ConditionOperator::Always,
        ..ConditionDecl::matches("language", "en")
    };
    let condition = Condition::new(decl, &qualifiers, &types).unwrap();
    let always_set = Arc::new(ConditionSet::new(vec![condition]).unwrap());
    let decision = Decision::new(vec![Candidate::new(always_set, json!("weighted-default"))]);

    let empty = ResolutionContext::new();
    assert_eq!(
        resolve_best(&decision, &empty, &qualifiers, &types).unwrap(),
        json!("weighted-default")
    );
}

#[test]
fn test_empty_decision_is_not_found() {
    let (qualifiers, types) = collectors();
    let decision = Decision::empty();
    let empty = ResolutionContext::new();
    assert!(resolve_best(&decision, &empty, &qualifiers, &types).is_err());
}
