use std::sync::Arc;

use ahash::AHashSet as HashSet;
use arrow::record_batch::RecordBatch;
use log::debug;
use uuid::Uuid;

use crate::arrow_bridge::with_utf8_column;
use crate::clock::Clock;
use crate::config::PlannerConfig;
use crate::errors::{Result, SeshatError};
use crate::plan::bulk::BulkPlanner;
use crate::plan::PlannedSet;
use crate::MutationType;

/// Configuration key naming the key fields.
pub const KEY_FIELD_NAMES_CONFIG_NAME: &str = "fields.key";
/// Configuration key naming the optional audit field.
pub const LAST_UPDATED_FIELD_NAME_CONFIG_NAME: &str = "field.last.updated";
/// Configuration key toggling synthetic UUID keys.
pub const UUID_KEY_CONFIG_NAME: &str = "uuid.key.enabled";

/// A bulk planner that appends the arriving dataset to the target. Only
/// plans insert mutations.
///
/// Optionally synthesizes a fresh UUID key per row and stamps an audit
/// field with one wall-clock snapshot for the whole batch.
pub struct AppendPlanner {
    clock: Arc<dyn Clock>,
    uuid_key_field: Option<String>,
    last_updated_field_name: Option<String>,
}

impl std::fmt::Debug for AppendPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppendPlanner")
            .field("uuid_key_field", &self.uuid_key_field)
            .field("last_updated_field_name", &self.last_updated_field_name)
            .finish_non_exhaustive()
    }
}

impl AppendPlanner {
    /// Creates the planner, validating configuration up front. Enabling
    /// UUID keys without naming key fields is a configuration error.
    pub fn new(config: PlannerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let uuid_key_field = if config.get_bool_or(UUID_KEY_CONFIG_NAME, false)? {
            let key_field_names = config
                .get_string_list(KEY_FIELD_NAMES_CONFIG_NAME)
                .filter(|names| !names.is_empty())
                .ok_or_else(|| {
                    SeshatError::Config(
                        "key columns must be specified to provide UUID keys".to_string(),
                    )
                })?;
            Some(key_field_names[0].clone())
        } else {
            None
        };

        let last_updated_field_name = config
            .get_string(LAST_UPDATED_FIELD_NAME_CONFIG_NAME)
            .map(str::to_owned);

        Ok(Self {
            clock,
            uuid_key_field,
            last_updated_field_name,
        })
    }
}

impl BulkPlanner for AppendPlanner {
    fn plan_mutations_for_set(&self, arriving: RecordBatch) -> Result<Vec<PlannedSet>> {
        let mut arriving = arriving;

        if let Some(key_field) = &self.uuid_key_field {
            // The first key field is regenerated unconditionally, even
            // when the arriving data already populated it.
            let keys: Vec<String> = (0..arriving.num_rows())
                .map(|_| Uuid::new_v4().to_string())
                .collect();
            arriving = with_utf8_column(&arriving, key_field, keys)?;
        }

        if let Some(field_name) = &self.last_updated_field_name {
            // One clock snapshot per plan call; every row in the batch
            // carries the same stamp.
            let stamp = self.clock.now_millis().to_string();
            arriving = with_utf8_column(&arriving, field_name, vec![stamp; arriving.num_rows()])?;
        }

        debug!("planning INSERT of {} arriving rows", arriving.num_rows());

        Ok(vec![PlannedSet::new(MutationType::Insert, arriving)])
    }

    fn emitted_mutation_types(&self) -> HashSet<MutationType> {
        HashSet::from_iter([MutationType::Insert])
    }

    fn alias(&self) -> &'static str {
        "append"
    }
}
