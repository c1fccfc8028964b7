//! Declaration and configuration layer for polyres.
//!
//! Load a system configuration (qualifier types, qualifiers, resource
//! types) and resource declarations from JSON. Qualifier-type
//! configurations are discriminated by `systemType`; condition sets are
//! accepted in both the record shorthand (`{"language": "en"}`) and the
//! verbose array-of-objects form, which are semantically equivalent.
//!
//! # Examples
//!
//! ```
//! use polyres_config::SystemConfig;
//!
//! let config = SystemConfig::from_json_str(r#"{
//!     "name": "demo",
//!     "qualifierTypes": [
//!         { "name": "language", "systemType": "language", "configuration": { "allowContextList": true } },
//!         { "name": "territory", "systemType": "territory",
//!           "configuration": { "allowContextList": false, "acceptLowercase": true } }
//!     ],
//!     "qualifiers": [
//!         { "name": "language", "typeName": "language", "defaultPriority": 600 },
//!         { "name": "homeTerritory", "typeName": "territory", "defaultPriority": 800 }
//!     ],
//!     "resourceTypes": [ { "name": "string" } ]
//! }"#).unwrap();
//!
//! assert_eq!(config.qualifier_types.len(), 2);
//! assert_eq!(config.qualifiers[1].default_priority, 800);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use polyres_core::{
    ConditionOperator, LiteralMatcher, PolyresError, Qualifier, QualifierType, TerritoryMatcher,
};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] PolyresError),
}

/// Root system configuration: the qualifier types, qualifiers, and
/// resource types of one polyres configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    /// Optional configuration name.
    #[serde(default)]
    pub name: Option<String>,

    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Qualifier-type configurations.
    #[serde(default)]
    pub qualifier_types: Vec<QualifierTypeConfig>,

    /// Qualifier declarations.
    #[serde(default)]
    pub qualifiers: Vec<QualifierDecl>,

    /// Resource-type declarations.
    #[serde(default)]
    pub resource_types: Vec<ResourceTypeDecl>,
}

impl SystemConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// One qualifier-type configuration, discriminated by `systemType`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifierTypeConfig {
    /// Unique type name.
    pub name: String,

    /// The system type and its type-specific configuration.
    #[serde(flatten)]
    pub system: SystemTypeConfig,
}

impl QualifierTypeConfig {
    /// Builds the validated qualifier type.
    pub fn build(&self) -> Result<QualifierType, PolyresError> {
        match &self.system {
            SystemTypeConfig::Language(c) => {
                QualifierType::language(&self.name, c.allow_context_list)
            }
            SystemTypeConfig::Territory(c) => {
                let matcher = TerritoryMatcher::new(
                    c.allowed_territories.clone(),
                    c.accept_lowercase,
                    c.hierarchy.clone(),
                )?;
                QualifierType::territory(&self.name, c.allow_context_list, matcher)
            }
            SystemTypeConfig::Literal(c) => {
                let matcher =
                    LiteralMatcher::new(c.values.clone(), c.case_sensitive, c.hierarchy.clone())?;
                QualifierType::literal(&self.name, c.allow_context_list, matcher)
            }
        }
    }
}

/// Type-specific configuration, tagged by the `systemType` discriminator.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "systemType", content = "configuration", rename_all = "camelCase")]
pub enum SystemTypeConfig {
    /// BCP-47 language matching.
    Language(LanguageTypeConfig),

    /// Territory matching with optional hierarchy and allow-list.
    Territory(TerritoryTypeConfig),

    /// Literal enumerated-value matching.
    Literal(LiteralTypeConfig),
}

/// Configuration for the language system type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageTypeConfig {
    /// May the context supply a preference list for this qualifier.
    #[serde(default)]
    pub allow_context_list: bool,
}

/// Configuration for the territory system type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryTypeConfig {
    /// May the context supply a value list for this qualifier.
    #[serde(default)]
    pub allow_context_list: bool,

    /// Closed allow-list of territory codes, if any.
    #[serde(default)]
    pub allowed_territories: Option<Vec<String>>,

    /// Normalize case before comparison.
    #[serde(default)]
    pub accept_lowercase: bool,

    /// Child-to-parent containment hierarchy.
    #[serde(default)]
    pub hierarchy: BTreeMap<String, String>,
}

/// Configuration for the literal system type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralTypeConfig {
    /// May the context supply a value list for this qualifier.
    #[serde(default)]
    pub allow_context_list: bool,

    /// The enumerated value set.
    pub values: Vec<String>,

    /// Compare values case-sensitively (default true).
    #[serde(default = "default_true")]
    pub case_sensitive: bool,

    /// Child-to-parent value hierarchy.
    #[serde(default)]
    pub hierarchy: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

/// Declaration of one qualifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifierDecl {
    /// Qualifier name.
    pub name: String,

    /// Name of the qualifier type.
    pub type_name: String,

    /// Priority inherited by conditions that don't set one.
    pub default_priority: u16,

    /// Optional short alias for compact serializations.
    #[serde(default)]
    pub token: Option<String>,

    /// Optional default context value.
    #[serde(default)]
    pub default_value: Option<String>,
}

impl QualifierDecl {
    /// Builds the validated qualifier.
    pub fn build(&self) -> Result<Qualifier, PolyresError> {
        let mut qualifier = Qualifier::new(&self.name, &self.type_name, self.default_priority)?;
        if let Some(token) = &self.token {
            qualifier = qualifier.with_token(token)?;
        }
        if let Some(value) = &self.default_value {
            qualifier = qualifier.with_default_value(value);
        }
        Ok(qualifier)
    }
}

/// Declaration of one resource type.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTypeDecl {
    /// Unique resource-type name.
    pub name: String,
}

/// A condition-set declaration: either the record shorthand
/// (`{"language": "en"}`) or the verbose array-of-objects form. The two
/// are semantically equivalent.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConditionSetDecl {
    /// `{qualifierName: value}` shorthand; operator defaults to
    /// `matches`, priority to the qualifier's default.
    Shorthand(BTreeMap<String, String>),

    /// Full per-condition form.
    Verbose(Vec<ConditionEntryDecl>),
}

impl ConditionSetDecl {
    /// Normalizes both forms to verbose entries.
    pub fn entries(&self) -> Vec<ConditionEntryDecl> {
        match self {
            ConditionSetDecl::Shorthand(map) => map
                .iter()
                .map(|(name, value)| ConditionEntryDecl {
                    qualifier_name: name.clone(),
                    value: value.clone(),
                    operator: ConditionOperator::Matches,
                    priority: None,
                    score_as_default: false,
                })
                .collect(),
            ConditionSetDecl::Verbose(entries) => entries.clone(),
        }
    }
}

impl Default for ConditionSetDecl {
    fn default() -> Self {
        ConditionSetDecl::Verbose(Vec::new())
    }
}

/// One condition in the verbose declaration form.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionEntryDecl {
    /// Name of the tested qualifier.
    pub qualifier_name: String,

    /// Comparison value.
    pub value: String,

    /// Comparison operator (default `matches`).
    #[serde(default)]
    pub operator: ConditionOperator,

    /// Priority override.
    #[serde(default)]
    pub priority: Option<u16>,

    /// Rank a match as a default rather than a genuine match.
    #[serde(default)]
    pub score_as_default: bool,
}

/// How a partial candidate's payload combines with others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeMethodDecl {
    /// Merge payloads; the winner's keys overwrite.
    #[default]
    Augment,
    /// Use the winner's payload verbatim.
    Replace,
}

/// Declaration of one candidate value.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDecl {
    /// Guarding conditions; absent means unconditional.
    #[serde(default)]
    pub conditions: ConditionSetDecl,

    /// The candidate's JSON payload.
    pub value: Value,

    /// Whether the payload is only part of a value.
    #[serde(default)]
    pub is_partial: bool,

    /// Merge behavior for partial candidates.
    #[serde(default)]
    pub merge_method: MergeMethodDecl,
}

/// Declaration of one resource and its candidates.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDecl {
    /// Resource id (dotted identifier path).
    pub id: String,

    /// Optional resource-type reference.
    #[serde(default)]
    pub resource_type_name: Option<String>,

    /// Candidate values competing for this resource.
    #[serde(default)]
    pub candidates: Vec<CandidateDecl>,
}

/// A flat collection of resource declarations.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCollectionDecl {
    /// The declared resources.
    #[serde(default)]
    pub resources: Vec<ResourceDecl>,
}

impl ResourceCollectionDecl {
    /// Parses a resource collection from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a resource collection from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
