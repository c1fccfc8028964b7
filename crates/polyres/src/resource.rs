//! Resources - an id plus the decision over its candidate values.

use polyres_resolve::Decision;

/// One resolvable resource: an id, an optional resource-type reference,
/// and the decision holding its competing candidates.
#[derive(Debug, Clone)]
pub struct Resource {
    id: String,
    resource_type: Option<String>,
    decision: Decision,
}

impl Resource {
    pub(crate) fn new(id: String, resource_type: Option<String>) -> Resource {
        Resource {
            id,
            resource_type,
            decision: Decision::empty(),
        }
    }

    /// Returns the resource id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the resource-type name, if declared.
    pub fn resource_type(&self) -> Option<&str> {
        self.resource_type.as_deref()
    }

    /// Returns the decision over this resource's candidates.
    pub fn decision(&self) -> &Decision {
        &self.decision
    }

    pub(crate) fn set_decision(&mut self, decision: Decision) {
        self.decision = decision;
    }
}
