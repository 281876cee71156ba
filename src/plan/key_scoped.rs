use ahash::AHashSet as HashSet;

use crate::errors::Result;
use crate::plan::PlannedMutation;
use crate::record::Record;
use crate::MutationType;

/// Contract for planners that reconcile mutations one logical key at a
/// time ("random" planners, as opposed to bulk planners that sweep the
/// whole dataset).
///
/// The grouping collaborator upstream derives keys, collects the records
/// that arrived for each key in the current cycle and the records
/// currently stored for it, and dispatches one call per distinct key —
/// potentially many in parallel. Implementations must therefore be
/// stateless across invocations apart from their fixed configuration:
/// planning one key's records never observes another key's records.
pub trait RandomPlanner: Send + Sync + std::fmt::Debug {
    /// Produces the ordered list of mutations to apply for one key.
    ///
    /// `arriving` holds the records that arrived for the key in this
    /// cycle; `existing` holds what is currently stored for it (possibly
    /// nothing). An empty return value is a valid plan: out-of-order and
    /// no-change arrivals are resolved by planning nothing, not by
    /// raising errors.
    ///
    /// Fails with [`SeshatError::SchemaMissing`] when the key, any
    /// arriving record, or the stored record lacks a schema.
    ///
    /// [`SeshatError::SchemaMissing`]: crate::errors::SeshatError::SchemaMissing
    fn plan_mutations_for_key(
        &self,
        key: &Record,
        arriving: Vec<Record>,
        existing: &[Record],
    ) -> Result<Vec<PlannedMutation>>;

    /// The set of mutation kinds this planner can ever emit.
    fn emitted_mutation_types(&self) -> HashSet<MutationType>;

    /// The configured key field names, consumed by the grouping
    /// collaborator. Planners never derive keys themselves.
    fn key_field_names(&self) -> Result<Vec<String>>;

    /// The stable name this planner is registered under.
    fn alias(&self) -> &'static str;
}
