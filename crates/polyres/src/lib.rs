//! polyres - a resource-localization engine.
//!
//! Resources carry condition-guarded candidate values; a resolver scores
//! the candidates against a runtime context of qualifier values
//! (language, territory, etc.) and picks a deterministic winner.
//!
//! # Example
//!
//! ```
//! use polyres::{ResourceManager, SystemConfig};
//! use polyres_config::ResourceCollectionDecl;
//! use serde_json::json;
//!
//! let config = SystemConfig::from_json_str(r#"{
//!     "qualifierTypes": [
//!         { "name": "language", "systemType": "language",
//!           "configuration": { "allowContextList": true } }
//!     ],
//!     "qualifiers": [
//!         { "name": "language", "typeName": "language", "defaultPriority": 600 }
//!     ],
//!     "resourceTypes": [ { "name": "string" } ]
//! }"#).unwrap();
//!
//! let mut manager = ResourceManager::from_config(&config).unwrap();
//! let resources = ResourceCollectionDecl::from_json_str(r#"{
//!     "resources": [ { "id": "greeting", "candidates": [
//!         { "conditions": { "language": "en" }, "value": "hello" },
//!         { "conditions": { "language": "fr" }, "value": "bonjour" },
//!         { "value": "hi" }
//!     ] } ]
//! }"#).unwrap();
//! manager.load_collection(&resources).unwrap();
//!
//! assert_eq!(manager.resolve_with_tokens("greeting", "language=fr").unwrap(), json!("bonjour"));
//! assert_eq!(manager.resolve_with_tokens("greeting", "").unwrap(), json!("hi"));
//! ```

mod manager;
mod resource;

pub use manager::ResourceManager;
pub use resource::Resource;

// Core types
pub use polyres_core::{
    ConditionOperator, LanguageTag, MatchScore, PolyresError, Qualifier, QualifierCollector,
    QualifierType, QualifierTypeCollector, Result, SetScore,
};

// Resolution types
pub use polyres_resolve::{
    Candidate, Condition, ConditionSet, Decision, MergeMethod, ResolutionContext, ScoredCandidate,
};

// Declaration layer
pub use polyres_config::{ConfigError, ResourceCollectionDecl, SystemConfig};
