pub mod bulk;
pub mod event_time_upsert;
pub mod key_scoped;
pub mod registry;

use arrow::record_batch::RecordBatch;

use crate::record::Record;
use crate::MutationType;

/// A single-record mutation decided by a key-scoped planner.
///
/// Pairs the kind of write with the record it applies to. Planned
/// mutations are created by a planner call and consumed immediately by
/// the storage-application collaborator; they are never retained.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMutation {
    mutation_type: MutationType,
    record: Record,
}

impl PlannedMutation {
    /// Creates a new `PlannedMutation`.
    pub fn new(mutation_type: MutationType, record: Record) -> Self {
        Self {
            mutation_type,
            record,
        }
    }

    /// Returns the kind of mutation.
    pub fn mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// Returns the record the mutation applies to.
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Consumes the plan, yielding the record.
    pub fn into_record(self) -> Record {
        self.record
    }
}

/// A whole-dataset mutation decided by a bulk planner.
#[derive(Debug, Clone)]
pub struct PlannedSet {
    mutation_type: MutationType,
    data: RecordBatch,
}

impl PlannedSet {
    /// Creates a new `PlannedSet`.
    pub fn new(mutation_type: MutationType, data: RecordBatch) -> Self {
        Self {
            mutation_type,
            data,
        }
    }

    /// Returns the kind of mutation.
    pub fn mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// Returns the dataset the mutation covers.
    pub fn data(&self) -> &RecordBatch {
        &self.data
    }
}
