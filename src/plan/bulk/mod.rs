pub mod append;
pub mod overwrite;

use ahash::AHashSet as HashSet;
use arrow::record_batch::RecordBatch;

use crate::errors::Result;
use crate::plan::PlannedSet;
use crate::MutationType;

/// Contract for planners that emit mutations for an entire arriving
/// dataset at once, with no per-key reasoning.
///
/// The dataset is opaque to the planner beyond column-level operations
/// (adding a column, filling a column with values). Bulk planners
/// typically return exactly one pair covering the whole input.
pub trait BulkPlanner: Send + Sync + std::fmt::Debug {
    /// Produces the ordered list of dataset-level mutations for one
    /// arriving batch.
    fn plan_mutations_for_set(&self, arriving: RecordBatch) -> Result<Vec<PlannedSet>>;

    /// The set of mutation kinds this planner can ever emit.
    fn emitted_mutation_types(&self) -> HashSet<MutationType>;

    /// The stable name this planner is registered under.
    fn alias(&self) -> &'static str;
}
