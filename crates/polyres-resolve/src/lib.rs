//! Condition matching and decision resolution for polyres.
//!
//! This crate holds the resolution core:
//! - [`Condition`] / [`ConditionSet`]: qualifier-value tests combined with
//!   AND semantics and a canonical, order-independent identity
//! - [`Candidate`] / [`Decision`]: condition-guarded values competing for
//!   one resource slot, with deterministic ordering and value-sensitive keys
//! - [`ResolutionContext`]: the caller's qualifier values, parsed and
//!   validated at the boundary
//! - [`resolver`]: pure scoring and winner selection over immutable inputs

pub mod candidate;
pub mod condition;
pub mod condition_set;
pub mod context;
pub mod decision;
pub mod merge;
pub mod resolver;

pub use candidate::{Candidate, MergeMethod};
pub use condition::{Condition, ConditionDecl};
pub use condition_set::ConditionSet;
pub use context::ResolutionContext;
pub use decision::{Decision, EMPTY_DECISION_KEY};
pub use merge::{merge_values, ArrayMergePolicy};
pub use resolver::{resolve_all, resolve_best, ScoredCandidate};
