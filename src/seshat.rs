use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::PlannerConfig;
use crate::errors::Result;
use crate::plan::bulk::BulkPlanner;
use crate::plan::key_scoped::RandomPlanner;
use crate::plan::registry;
use crate::stream::shaping::StreamingStep;
use crate::stream::source::StreamInput;

/// Seshat Prelude
pub mod prelude {
    pub use crate::arrow_bridge::*;
    pub use crate::clock::*;
    pub use crate::config::*;
    pub use crate::errors::*;
    pub use crate::plan::bulk::append::AppendPlanner;
    pub use crate::plan::bulk::overwrite::OverwritePlanner;
    pub use crate::plan::bulk::*;
    pub use crate::plan::event_time_upsert::EventTimeUpsertPlanner;
    pub use crate::plan::key_scoped::*;
    pub use crate::plan::registry::*;
    pub use crate::plan::*;
    pub use crate::record::*;
    pub use crate::stream::shaping::*;
    pub use crate::stream::source::*;
    pub use crate::*;
}

/// The main entry point for the Seshat mutation planning layer.
///
/// Holds the configuration document and the wall-clock source, and hands
/// out planners and shaping steps wired to both. Construction of a
/// planner validates its required configuration immediately.
pub struct Seshat {
    /// The immutable configuration document, shared by every planner.
    config: PlannerConfig,
    /// The wall-clock source injected into planners for audit stamps and
    /// into the shaping step for window arrival times.
    clock: Arc<dyn Clock>,
}

impl Seshat {
    /// Creates an instance using the system wall clock.
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an instance with an explicit clock, so tests can pin
    /// audit stamps and window boundaries to known values.
    pub fn with_clock(config: PlannerConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Instantiates a key-scoped planner by alias.
    pub fn random_planner(&self, alias: &str) -> Result<Box<dyn RandomPlanner>> {
        registry::create_random_planner(alias, self.config.clone(), Arc::clone(&self.clock))
    }

    /// Instantiates a bulk planner by alias.
    pub fn bulk_planner(&self, alias: &str) -> Result<Box<dyn BulkPlanner>> {
        registry::create_bulk_planner(alias, self.config.clone(), Arc::clone(&self.clock))
    }

    /// Wraps a streaming source in the configured shaping step.
    pub fn streaming_step(&self, input: Box<dyn StreamInput>) -> Result<StreamingStep> {
        StreamingStep::new(&self.config, input, Arc::clone(&self.clock))
    }
}
