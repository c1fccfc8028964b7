//! Tests for qualifier types.

use super::*;

fn territory_type() -> QualifierType {
    let matcher = TerritoryMatcher::new(
        None,
        true,
        [
            ("CA".to_string(), "NA".to_string()),
            ("US".to_string(), "NA".to_string()),
            ("NA".to_string(), "world".to_string()),
        ],
    )
    .unwrap();
    QualifierType::territory("territory", false, matcher).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

mod construction {
    use super::*;

    #[test]
    fn test_invalid_name_rejected() {
        assert!(QualifierType::language("9lang", false).is_err());
        assert!(QualifierType::language("", false).is_err());
    }

    #[test]
    fn test_literal_requires_values() {
        let result = LiteralMatcher::new(Vec::new(), true, []);
        assert!(result.is_err());
    }

    #[test]
    fn test_literal_duplicate_values_rejected() {
        let result = LiteralMatcher::new(vec!["dark".into(), "dark".into()], true, []);
        assert!(matches!(result, Err(PolyresError::Conflict(_))));
    }

    #[test]
    fn test_literal_hierarchy_must_reference_values() {
        let result = LiteralMatcher::new(
            vec!["dark".into(), "light".into()],
            true,
            [("dark".to_string(), "midnight".to_string())],
        );
        assert!(matches!(result, Err(PolyresError::Validation(_))));
    }

    #[test]
    fn test_territory_allow_list_constrains_hierarchy() {
        let result = TerritoryMatcher::new(
            Some(vec!["CA".into(), "US".into()]),
            false,
            [("CA".to_string(), "NA".to_string())],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_errors_are_aggregated() {
        // Bad value and a self-referential hierarchy entry, reported together.
        let result = LiteralMatcher::new(
            vec!["a b".into(), "ok".into()],
            true,
            [("ok".to_string(), "ok".to_string())],
        );
        match result {
            Err(PolyresError::Multiple(errors)) => assert!(errors.len() >= 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_index_set_once() {
        let mut qt = QualifierType::language("language", true).unwrap();
        assert_eq!(qt.index(), None);
        qt.set_index(3).unwrap();
        qt.set_index(3).unwrap();
        assert!(matches!(qt.set_index(4), Err(PolyresError::Conflict(_))));
        assert_eq!(qt.index(), Some(3));
    }
}

// ============================================================================
// Operators
// ============================================================================

mod operators {
    use super::*;

    #[test]
    fn test_always_is_perfect_regardless_of_values() {
        let qt = QualifierType::language("language", false).unwrap();
        let score = qt.matches("en", "zz-not-even-valid", ConditionOperator::Always);
        assert_eq!(score, MatchScore::PERFECT);
    }

    #[test]
    fn test_never_is_no_match_regardless_of_values() {
        let qt = QualifierType::language("language", false).unwrap();
        let score = qt.matches("en", "en", ConditionOperator::Never);
        assert_eq!(score, MatchScore::NO_MATCH);
    }
}

// ============================================================================
// Territory matching
// ============================================================================

mod territory {
    use super::*;

    #[test]
    fn test_exact_match() {
        let qt = territory_type();
        let score = qt.matches("CA", "CA", ConditionOperator::Matches);
        assert_eq!(score, MatchScore::PERFECT);
    }

    #[test]
    fn test_case_normalization_round_trip() {
        let qt = territory_type();
        assert_eq!(
            qt.matches("US", "us", ConditionOperator::Matches),
            MatchScore::PERFECT
        );
        assert_eq!(
            qt.matches("us", "US", ConditionOperator::Matches),
            MatchScore::PERFECT
        );
    }

    #[test]
    fn test_ancestor_condition_is_partial() {
        let qt = territory_type();
        let one = qt.matches("NA", "CA", ConditionOperator::Matches);
        let two = qt.matches("world", "CA", ConditionOperator::Matches);
        assert!(one.is_match() && !one.is_perfect());
        assert!(two.is_match() && !two.is_perfect());
        assert!(two < one, "deeper ancestry must score lower");
    }

    #[test]
    fn test_narrow_condition_rejects_broad_context() {
        let qt = territory_type();
        let score = qt.matches("CA", "NA", ConditionOperator::Matches);
        assert_eq!(score, MatchScore::NO_MATCH);
    }

    #[test]
    fn test_allow_list_membership() {
        let matcher = TerritoryMatcher::new(Some(vec!["CA".into(), "US".into()]), true, []).unwrap();
        let qt = QualifierType::territory("territory", false, matcher).unwrap();
        assert!(qt.is_valid_condition_value("ca"));
        assert!(!qt.is_valid_condition_value("MX"));
        assert_eq!(
            qt.matches("CA", "MX", ConditionOperator::Matches),
            MatchScore::NO_MATCH
        );
    }
}

// ============================================================================
// Literal matching
// ============================================================================

mod literal {
    use super::*;

    fn theme_type(case_sensitive: bool) -> QualifierType {
        let matcher = LiteralMatcher::new(
            vec!["dark".into(), "light".into(), "any".into()],
            case_sensitive,
            [
                ("dark".to_string(), "any".to_string()),
                ("light".to_string(), "any".to_string()),
            ],
        )
        .unwrap();
        QualifierType::literal("theme", false, matcher).unwrap()
    }

    #[test]
    fn test_membership() {
        let qt = theme_type(true);
        assert!(qt.is_valid_condition_value("dark"));
        assert!(!qt.is_valid_condition_value("sepia"));
        assert!(!qt.is_valid_condition_value("DARK"));
    }

    #[test]
    fn test_case_insensitive_membership() {
        let qt = theme_type(false);
        assert!(qt.is_valid_condition_value("DARK"));
        assert_eq!(
            qt.matches("Dark", "dark", ConditionOperator::Matches),
            MatchScore::PERFECT
        );
    }

    #[test]
    fn test_hierarchy_parity_with_territory() {
        let qt = theme_type(true);
        let partial = qt.matches("any", "dark", ConditionOperator::Matches);
        assert!(partial.is_match() && !partial.is_perfect());
        assert_eq!(
            qt.matches("dark", "any", ConditionOperator::Matches),
            MatchScore::NO_MATCH
        );
    }

    #[test]
    fn test_unknown_context_value_is_no_match() {
        let qt = theme_type(true);
        assert_eq!(
            qt.matches("dark", "sepia", ConditionOperator::Matches),
            MatchScore::NO_MATCH
        );
    }
}

// ============================================================================
// Language matching
// ============================================================================

mod language {
    use super::*;

    #[test]
    fn test_exact_tag() {
        let qt = QualifierType::language("language", true).unwrap();
        assert_eq!(
            qt.matches("en-US", "en-US", ConditionOperator::Matches),
            MatchScore::PERFECT
        );
    }

    #[test]
    fn test_region_fallback_is_partial() {
        let qt = QualifierType::language("language", true).unwrap();
        let score = qt.matches("en", "en-US", ConditionOperator::Matches);
        assert!(score.is_match() && !score.is_perfect());
    }

    #[test]
    fn test_primary_mismatch() {
        let qt = QualifierType::language("language", true).unwrap();
        assert_eq!(
            qt.matches("fr", "en", ConditionOperator::Matches),
            MatchScore::NO_MATCH
        );
    }

    #[test]
    fn test_condition_value_validation() {
        let qt = QualifierType::language("language", true).unwrap();
        assert!(qt.is_valid_condition_value("zh-Hant-TW"));
        assert!(!qt.is_valid_condition_value("not a tag"));
    }
}
