//! Common utilities for Seshat integration tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use seshat::{Clock, FieldValue, PlannerConfig, Record};

// --- ManualClock ---

/// A clock pinned to a value tests control, so audit stamps and window
/// boundaries are exact.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Creates a clock reading `start` milliseconds.
    pub fn new(start: i64) -> Arc<Self> {
        Arc::new(Self {
            now: AtomicI64::new(start),
        })
    }

    /// Moves the clock to an absolute time.
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    /// Moves the clock forward.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

// --- Helper Functions ---

/// Schema of the rows the upsert planner tests work with.
pub fn upsert_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("value", DataType::Utf8, true),
        Field::new("ts", DataType::Int64, false),
    ]))
}

/// Builds a data record over [`upsert_schema`].
pub fn data_record(id: i64, value: &str, ts: i64) -> Record {
    Record::new(
        upsert_schema(),
        vec![
            FieldValue::Int64(id),
            FieldValue::Utf8(value.to_string()),
            FieldValue::Int64(ts),
        ],
    )
    .unwrap()
}

/// Builds a key record projecting just the `id` field.
pub fn key_record(id: i64) -> Record {
    let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
    Record::new(schema, vec![FieldValue::Int64(id)]).unwrap()
}

/// The standard configuration for the event-time upsert planner tests.
pub fn upsert_config() -> PlannerConfig {
    PlannerConfig::from_pairs([
        ("fields.key", "id"),
        ("field.timestamp", "ts"),
        ("field.values", "value"),
    ])
}

/// Builds a `RecordBatch` of (id, value, ts) rows over [`upsert_schema`].
pub fn create_upsert_batch(rows: &[(i64, &str, i64)]) -> RecordBatch {
    let ids: Vec<i64> = rows.iter().map(|row| row.0).collect();
    let values: Vec<Option<&str>> = rows.iter().map(|row| Some(row.1)).collect();
    let timestamps: Vec<i64> = rows.iter().map(|row| row.2).collect();
    RecordBatch::try_new(
        upsert_schema(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(values)),
            Arc::new(Int64Array::from(timestamps)),
        ],
    )
    .unwrap()
}

/// Builds a two-column `RecordBatch` for the bulk planner tests.
pub fn create_record_batch(ids: Vec<i64>, values: Vec<Option<&str>>) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("value", DataType::Utf8, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(StringArray::from(values)),
        ],
    )
    .unwrap()
}
