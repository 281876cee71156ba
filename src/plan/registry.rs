use std::sync::Arc;

use crate::clock::Clock;
use crate::config::PlannerConfig;
use crate::errors::{Result, SeshatError};
use crate::plan::bulk::append::AppendPlanner;
use crate::plan::bulk::overwrite::OverwritePlanner;
use crate::plan::bulk::BulkPlanner;
use crate::plan::event_time_upsert::EventTimeUpsertPlanner;
use crate::plan::key_scoped::RandomPlanner;

/// Alias of the event-time upsert planner.
pub const EVENT_TIME_UPSERT_ALIAS: &str = "eventtimeupsert";
/// Alias of the append planner.
pub const APPEND_ALIAS: &str = "append";
/// Alias of the overwrite planner.
pub const OVERWRITE_ALIAS: &str = "overwrite";

const RANDOM_ALIASES: &[&str] = &[EVENT_TIME_UPSERT_ALIAS];
const BULK_ALIASES: &[&str] = &[APPEND_ALIAS, OVERWRITE_ALIAS];

/// Instantiates a key-scoped planner by its registered alias.
///
/// The registry is a closed set validated here at startup; unknown
/// aliases and aliases belonging to the bulk family are configuration
/// errors, surfaced before any data flows.
pub fn create_random_planner(
    alias: &str,
    config: PlannerConfig,
    clock: Arc<dyn Clock>,
) -> Result<Box<dyn RandomPlanner>> {
    match alias {
        EVENT_TIME_UPSERT_ALIAS => Ok(Box::new(EventTimeUpsertPlanner::new(config, clock)?)),
        other if BULK_ALIASES.contains(&other) => Err(SeshatError::Config(format!(
            "planner alias '{other}' names a bulk planner, not a key-scoped planner"
        ))),
        other => Err(unknown_alias(other)),
    }
}

/// Instantiates a bulk planner by its registered alias.
pub fn create_bulk_planner(
    alias: &str,
    config: PlannerConfig,
    clock: Arc<dyn Clock>,
) -> Result<Box<dyn BulkPlanner>> {
    match alias {
        APPEND_ALIAS => Ok(Box::new(AppendPlanner::new(config, clock)?)),
        OVERWRITE_ALIAS => Ok(Box::new(OverwritePlanner::new())),
        other if RANDOM_ALIASES.contains(&other) => Err(SeshatError::Config(format!(
            "planner alias '{other}' names a key-scoped planner, not a bulk planner"
        ))),
        other => Err(unknown_alias(other)),
    }
}

fn unknown_alias(alias: &str) -> SeshatError {
    SeshatError::Config(format!(
        "unknown planner alias '{alias}'; known aliases: {}, {}, {}",
        EVENT_TIME_UPSERT_ALIAS, APPEND_ALIAS, OVERWRITE_ALIAS
    ))
}
