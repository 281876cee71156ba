use ahash::AHashSet as HashSet;
use arrow::record_batch::RecordBatch;

use crate::errors::Result;
use crate::plan::bulk::BulkPlanner;
use crate::plan::PlannedSet;
use crate::MutationType;

/// A bulk planner that replaces the entire target with the arriving
/// dataset, unchanged, every cycle. Full-refresh semantics.
#[derive(Debug, Default)]
pub struct OverwritePlanner;

impl OverwritePlanner {
    /// Creates the planner. Takes no configuration.
    pub fn new() -> Self {
        Self
    }
}

impl BulkPlanner for OverwritePlanner {
    fn plan_mutations_for_set(&self, arriving: RecordBatch) -> Result<Vec<PlannedSet>> {
        Ok(vec![PlannedSet::new(MutationType::Overwrite, arriving)])
    }

    fn emitted_mutation_types(&self) -> HashSet<MutationType> {
        HashSet::from_iter([MutationType::Overwrite])
    }

    fn alias(&self) -> &'static str {
        "overwrite"
    }
}
