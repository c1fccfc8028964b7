//! The resource manager - owns one configuration's qualifier types,
//! qualifiers, resource types, and resources.
//!
//! Building (adding qualifiers, resources, candidates) is a
//! single-writer phase; the built manager is an immutable snapshot that
//! any number of concurrent resolvers can share.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use polyres_config::{
    CandidateDecl, MergeMethodDecl, ResourceCollectionDecl, ResourceDecl, SystemConfig,
};
use polyres_core::{
    validate_identifier, validate_resource_id, ErrorAggregator, PolyresError, QualifierCollector,
    QualifierTypeCollector, Result,
};
use polyres_resolve::{
    resolve_all, resolve_best, Candidate, Condition, ConditionDecl, ConditionSet, Decision,
    MergeMethod, ResolutionContext, ScoredCandidate,
};

use crate::resource::Resource;

/// Owns all qualifier types, qualifiers, resource types, and resources
/// of one configuration.
#[derive(Debug, Clone, Default)]
pub struct ResourceManager {
    qualifier_types: QualifierTypeCollector,
    qualifiers: QualifierCollector,
    resource_types: Vec<String>,
    resources: BTreeMap<String, Resource>,
}

impl ResourceManager {
    /// Creates an empty manager.
    pub fn new() -> ResourceManager {
        ResourceManager::default()
    }

    /// Builds a manager from a system configuration, validating the
    /// whole declaration tree and reporting every problem at once.
    pub fn from_config(config: &SystemConfig) -> Result<ResourceManager> {
        let mut errors = ErrorAggregator::new();
        let mut manager = ResourceManager::new();

        for type_config in &config.qualifier_types {
            if let Some(qualifier_type) = errors.capture(type_config.build()) {
                errors.capture(manager.qualifier_types.add(qualifier_type));
            }
        }
        for decl in &config.qualifiers {
            if let Some(qualifier) = errors.capture(decl.build()) {
                errors.capture(manager.qualifiers.add(qualifier, &manager.qualifier_types));
            }
        }
        for decl in &config.resource_types {
            errors.capture(manager.add_resource_type(&decl.name));
        }

        info!(
            name = config.name.as_deref().unwrap_or("<unnamed>"),
            qualifier_types = manager.qualifier_types.len(),
            qualifiers = manager.qualifiers.len(),
            "built resource manager"
        );
        errors.ok_or_report(manager)
    }

    /// Registers a resource type name.
    pub fn add_resource_type(&mut self, name: &str) -> Result<()> {
        validate_identifier(name)
            .map_err(|_| PolyresError::validation(format!("'{name}' is not a valid resource type name")))?;
        if self.resource_types.iter().any(|t| t == name) {
            return Err(PolyresError::conflict(format!(
                "duplicate resource type '{name}'"
            )));
        }
        self.resource_types.push(name.to_string());
        Ok(())
    }

    /// Adds an empty resource. The id must be a dotted identifier path
    /// and not already present; a declared resource type must be
    /// registered.
    pub fn add_resource(&mut self, id: &str, resource_type: Option<&str>) -> Result<()> {
        validate_resource_id(id)?;
        if let Some(type_name) = resource_type {
            if !self.resource_types.iter().any(|t| t == type_name) {
                return Err(PolyresError::reference(format!(
                    "resource '{id}' references unknown resource type '{type_name}'"
                )));
            }
        }
        if self.resources.contains_key(id) {
            return Err(PolyresError::conflict(format!("duplicate resource '{id}'")));
        }
        debug!(id, ?resource_type, "adding resource");
        self.resources.insert(
            id.to_string(),
            Resource::new(id.to_string(), resource_type.map(str::to_string)),
        );
        Ok(())
    }

    /// Adds one candidate to an existing resource. The resource's
    /// decision (candidate list and key) is rebuilt from scratch, not
    /// incrementally patched.
    pub fn add_candidate(&mut self, id: &str, decl: &CandidateDecl) -> Result<()> {
        let candidate = self.build_candidate(decl)?;
        let resource = self
            .resources
            .get_mut(id)
            .ok_or_else(|| PolyresError::not_found(format!("unknown resource '{id}'")))?;

        let mut candidates: Vec<Candidate> = resource.decision().candidates().to_vec();
        candidates.push(candidate);
        resource.set_decision(Decision::new(candidates));
        debug!(
            id,
            candidates = resource.decision().len(),
            key = resource.decision().key(),
            "rebuilt decision"
        );
        Ok(())
    }

    fn build_candidate(&self, decl: &CandidateDecl) -> Result<Candidate> {
        let mut conditions = Vec::new();
        let mut errors = ErrorAggregator::new();
        for entry in decl.conditions.entries() {
            let condition = Condition::new(
                ConditionDecl {
                    qualifier_name: entry.qualifier_name,
                    value: entry.value,
                    operator: entry.operator,
                    priority: entry.priority,
                    score_as_default: entry.score_as_default,
                },
                &self.qualifiers,
                &self.qualifier_types,
            );
            if let Some(condition) = errors.capture(condition) {
                conditions.push(condition);
            }
        }
        let conditions = errors.ok_or_report(conditions)?;
        let set = Arc::new(ConditionSet::new(conditions)?);
        Ok(if decl.is_partial {
            let method = match decl.merge_method {
                MergeMethodDecl::Augment => MergeMethod::Augment,
                MergeMethodDecl::Replace => MergeMethod::Replace,
            };
            Candidate::partial(set, decl.value.clone(), method)
        } else {
            Candidate::new(set, decl.value.clone())
        })
    }

    /// Loads a whole resource collection, aggregating validation errors
    /// across every resource and candidate.
    pub fn load_collection(&mut self, collection: &ResourceCollectionDecl) -> Result<()> {
        let mut errors = ErrorAggregator::new();
        for resource in &collection.resources {
            errors.capture(self.load_resource(resource));
        }
        errors.ok_or_report(())
    }

    fn load_resource(&mut self, decl: &ResourceDecl) -> Result<()> {
        let mut errors = ErrorAggregator::new();
        errors.capture(self.add_resource(&decl.id, decl.resource_type_name.as_deref()));
        for candidate in &decl.candidates {
            errors.capture(self.add_candidate(&decl.id, candidate));
        }
        errors.ok_or_report(())
    }

    /// Returns the qualifier collector.
    pub fn qualifiers(&self) -> &QualifierCollector {
        &self.qualifiers
    }

    /// Returns the qualifier-type collector.
    pub fn qualifier_types(&self) -> &QualifierTypeCollector {
        &self.qualifier_types
    }

    /// Returns the registered resource-type names.
    pub fn resource_types(&self) -> &[String] {
        &self.resource_types
    }

    /// Looks up a resource by id.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Iterates over resources in id order.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Parses a context token string against this configuration.
    pub fn parse_context(&self, token: &str) -> Result<ResolutionContext> {
        ResolutionContext::parse(token, &self.qualifiers, &self.qualifier_types)
    }

    /// Resolves the best-matching value for a resource.
    pub fn resolve(&self, id: &str, context: &ResolutionContext) -> Result<Value> {
        let resource = self
            .resources
            .get(id)
            .ok_or_else(|| PolyresError::not_found(format!("unknown resource '{id}'")))?;
        resolve_best(
            resource.decision(),
            context,
            &self.qualifiers,
            &self.qualifier_types,
        )
    }

    /// Resolves with a compact context token, e.g.
    /// `"language=en|homeTerritory=CA"`.
    pub fn resolve_with_tokens(&self, id: &str, token: &str) -> Result<Value> {
        let context = self.parse_context(token)?;
        self.resolve(id, &context)
    }

    /// Returns the ranked, score-annotated candidate list for a
    /// resource, for diagnostics.
    pub fn resolve_all<'a>(
        &'a self,
        id: &str,
        context: &ResolutionContext,
    ) -> Result<Vec<ScoredCandidate<'a>>> {
        let resource = self
            .resources
            .get(id)
            .ok_or_else(|| PolyresError::not_found(format!("unknown resource '{id}'")))?;
        Ok(resolve_all(
            resource.decision(),
            context,
            &self.qualifiers,
            &self.qualifier_types,
        ))
    }
}
