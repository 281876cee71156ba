use std::sync::Arc;

use ahash::AHashSet as HashSet;
use arrow::datatypes::DataType;
use log::debug;

use crate::clock::Clock;
use crate::config::PlannerConfig;
use crate::errors::{Result, SeshatError};
use crate::plan::key_scoped::RandomPlanner;
use crate::plan::PlannedMutation;
use crate::record::{FieldValue, Record};
use crate::MutationType;

/// Configuration key naming the key fields.
pub const KEY_FIELD_NAMES_CONFIG_NAME: &str = "fields.key";
/// Configuration key naming the optional audit field.
pub const LAST_UPDATED_FIELD_NAME_CONFIG_NAME: &str = "field.last.updated";
/// Configuration key naming the event-time field.
pub const TIMESTAMP_FIELD_NAME_CONFIG_NAME: &str = "field.timestamp";
/// Configuration key naming the value fields compared for change.
pub const VALUE_FIELD_NAMES_CONFIG_NAME: &str = "field.values";

/// A key-scoped planner that keeps the most recent version of each key's
/// values, equivalent to Type-1 slowly-changing-dimension modeling.
///
/// Ordering is decided by the event time embedded in the data, not by
/// arrival order, which makes the plan robust to redelivered and
/// reordered records: a late arrival never overwrites newer stored
/// state, and a redelivered record with no semantic change plans
/// nothing at all.
pub struct EventTimeUpsertPlanner {
    config: PlannerConfig,
    clock: Arc<dyn Clock>,
    key_field_names: Vec<String>,
    timestamp_field_name: String,
    value_field_names: Vec<String>,
}

impl EventTimeUpsertPlanner {
    /// Creates the planner, validating required configuration up front.
    pub fn new(config: PlannerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let key_field_names = config.require_string_list(KEY_FIELD_NAMES_CONFIG_NAME)?;
        let timestamp_field_name = config.require_string(TIMESTAMP_FIELD_NAME_CONFIG_NAME)?;
        let value_field_names = config.require_string_list(VALUE_FIELD_NAMES_CONFIG_NAME)?;

        Ok(Self {
            config,
            clock,
            key_field_names,
            timestamp_field_name,
            value_field_names,
        })
    }

    fn last_updated_field_name(&self) -> Option<&str> {
        self.config.get_string(LAST_UPDATED_FIELD_NAME_CONFIG_NAME)
    }

    /// Stamps the audit field with the current wall-clock time as text,
    /// when one is configured. Returns a new record; the input is never
    /// mutated.
    fn stamp_last_updated(&self, record: Record) -> Result<Record> {
        match self.last_updated_field_name() {
            Some(field_name) => record.with_field(
                field_name,
                DataType::Utf8,
                FieldValue::Utf8(self.clock.now_millis().to_string()),
            ),
            None => Ok(record),
        }
    }

    /// Picks the most recent arriving record as the merge candidate.
    ///
    /// The sort is stable and descending by event time, so among records
    /// sharing the maximum timestamp the earliest-arriving one wins —
    /// the tie-break is deterministic under replay.
    fn select_candidate(&self, arriving: Vec<Record>) -> Result<Option<Record>> {
        if arriving.len() <= 1 {
            return Ok(arriving.into_iter().next());
        }

        let mut timestamped: Vec<(i64, Record)> = arriving
            .into_iter()
            .map(|record| {
                record
                    .event_time(&self.timestamp_field_name)
                    .map(|time| (time, record))
            })
            .collect::<Result<_>>()?;
        timestamped.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(timestamped.into_iter().next().map(|(_, record)| record))
    }
}

impl std::fmt::Debug for EventTimeUpsertPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventTimeUpsertPlanner")
            .field("config", &self.config)
            .field("key_field_names", &self.key_field_names)
            .field("timestamp_field_name", &self.timestamp_field_name)
            .field("value_field_names", &self.value_field_names)
            .finish_non_exhaustive()
    }
}

impl RandomPlanner for EventTimeUpsertPlanner {
    fn plan_mutations_for_key(
        &self,
        key: &Record,
        arriving: Vec<Record>,
        existing: &[Record],
    ) -> Result<Vec<PlannedMutation>> {
        if key.schema().is_none() {
            return Err(SeshatError::SchemaMissing(
                "key sent to event time upsert planner does not contain a schema".to_string(),
            ));
        }

        let Some(arrived) = self.select_candidate(arriving)? else {
            return Ok(Vec::new());
        };

        if arrived.schema().is_none() {
            return Err(SeshatError::SchemaMissing(
                "arriving record sent to event time upsert planner does not contain a schema"
                    .to_string(),
            ));
        }

        let mut planned = Vec::new();

        match existing.first() {
            None => {
                let arrived = self.stamp_last_updated(arrived)?;
                debug!("planning INSERT for previously unseen key");
                planned.push(PlannedMutation::new(MutationType::Insert, arrived));
            }
            Some(existing) => {
                if existing.schema().is_none() {
                    return Err(SeshatError::SchemaMissing(
                        "existing record sent to event time upsert planner does not contain a schema"
                            .to_string(),
                    ));
                }

                let arrived_time = arrived.event_time(&self.timestamp_field_name)?;
                let existing_time = existing.event_time(&self.timestamp_field_name)?;

                if arrived_time < existing_time {
                    // The arriving record is older than the existing record.
                    debug!(
                        "discarding late arrival: event time {} precedes stored {}",
                        arrived_time, existing_time
                    );
                } else if arrived.differs_on(existing, &self.value_field_names)? {
                    let arrived = self.stamp_last_updated(arrived)?;
                    debug!("planning UPDATE: values changed at event time {}", arrived_time);
                    planned.push(PlannedMutation::new(MutationType::Update, arrived));
                } else {
                    // Same-or-later event time but identical values.
                    debug!("no-op plan: redelivery carried no semantic change");
                }
            }
        }

        Ok(planned)
    }

    fn emitted_mutation_types(&self) -> HashSet<MutationType> {
        HashSet::from_iter([MutationType::Insert, MutationType::Update])
    }

    fn key_field_names(&self) -> Result<Vec<String>> {
        Ok(self.key_field_names.clone())
    }

    fn alias(&self) -> &'static str {
        "eventtimeupsert"
    }
}
