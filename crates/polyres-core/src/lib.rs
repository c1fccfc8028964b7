//! Polyres Core - Core types for the polyres resource-localization engine
//!
//! This crate provides the fundamental abstractions for polyres:
//! - Match score types for representing candidate quality
//! - Qualifier types (language, territory, literal) and their matching rules
//! - Qualifiers: named, priority-weighted axes of variation
//! - Collectors that own qualifier types and qualifiers for one configuration

pub mod collector;
pub mod error;
pub mod hierarchy;
pub mod ident;
pub mod language;
pub mod qualifier;
pub mod qualifier_type;
pub mod score;

pub use collector::{QualifierCollector, QualifierTypeCollector};
pub use error::{ErrorAggregator, PolyresError, Result};
pub use hierarchy::Hierarchy;
pub use ident::{validate_identifier, validate_resource_id};
pub use language::LanguageTag;
pub use qualifier::Qualifier;
pub use qualifier_type::{
    ConditionOperator, LiteralMatcher, QualifierType, TerritoryMatcher, TypeMatcher,
};
pub use score::{MatchScore, SetScore};
