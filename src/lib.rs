pub mod arrow_bridge;
pub mod clock;
pub mod config;
pub mod errors;
pub mod plan;
pub mod record;
pub mod seshat;
pub mod stream;

// Re-export key types and structs for easier access
pub use clock::{Clock, SystemClock};
pub use config::PlannerConfig;
pub use errors::{Result, SeshatError};
pub use plan::bulk::BulkPlanner;
pub use plan::key_scoped::RandomPlanner;
pub use plan::{PlannedMutation, PlannedSet};
pub use record::{FieldValue, Record};
pub use seshat::Seshat;
pub use stream::shaping::StreamingStep;
pub use stream::source::{RecordBatchStream, StreamInput};

use std::fmt;

/// The closed set of mutation kinds a planner can emit.
///
/// Each planner advertises the subset it can ever produce via
/// `emitted_mutation_types`, which the surrounding pipeline checks
/// against the capabilities of the storage connector before any data
/// flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationType {
    /// Insert a record that does not yet exist in the target.
    Insert,
    /// Overwrite the stored record for an existing key.
    Update,
    /// Remove the stored record for a key.
    Delete,
    /// Insert-or-update decided by the storage connector itself.
    Upsert,
    /// Replace the entire target dataset with the planned dataset.
    Overwrite,
}

impl fmt::Display for MutationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationType::Insert => "INSERT",
            MutationType::Update => "UPDATE",
            MutationType::Delete => "DELETE",
            MutationType::Upsert => "UPSERT",
            MutationType::Overwrite => "OVERWRITE",
        };
        write!(f, "{}", name)
    }
}
