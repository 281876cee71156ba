use std::sync::Arc;

use arrow::array::{Array, Int64Array};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use futures::executor::block_on;
use futures::StreamExt;
use seshat::{
    PlannerConfig, RecordBatchStream, Result, Seshat, SeshatError, StreamInput, StreamingStep,
};

mod common;

use common::{create_record_batch, ManualClock};

// --- MockStreamInput ---

/// A source collaborator yielding a fixed sequence of micro-batches
/// (or errors).
struct MockStreamInput {
    schema: SchemaRef,
    items: Vec<Result<RecordBatch>>,
}

impl MockStreamInput {
    fn new(items: Vec<Result<RecordBatch>>) -> Self {
        let schema = create_record_batch(vec![], vec![]).schema();
        Self { schema, items }
    }
}

impl StreamInput for MockStreamInput {
    fn get_stream(&mut self) -> Result<RecordBatchStream> {
        let items = std::mem::take(&mut self.items);
        Ok(futures::stream::iter(items).boxed())
    }

    fn get_schema(&self) -> Result<SchemaRef> {
        Ok(Arc::clone(&self.schema))
    }
}

fn step_with(
    config: PlannerConfig,
    clock: Arc<ManualClock>,
    items: Vec<Result<RecordBatch>>,
) -> Result<StreamingStep> {
    Seshat::with_clock(config, clock).streaming_step(Box::new(MockStreamInput::new(items)))
}

fn ids_of(batch: &RecordBatch) -> Vec<i64> {
    let ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    (0..batch.num_rows()).map(|row| ids.value(row)).collect()
}

#[test]
fn test_passthrough_without_window_or_repartition() {
    let clock = ManualClock::new(0);
    let batch = create_record_batch(vec![1, 2], vec![Some("a"), Some("b")]);
    let mut step = step_with(
        PlannerConfig::default(),
        clock,
        vec![Ok(batch.clone())],
    )
    .unwrap();

    let shaped: Vec<_> = block_on(step.get_stream().unwrap().collect());

    assert_eq!(shaped.len(), 1);
    let partitions = shaped[0].as_ref().unwrap();
    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0], batch);
}

#[test]
fn test_window_replays_trailing_micro_batches() {
    let clock = ManualClock::new(0);
    let config = PlannerConfig::from_pairs([
        ("window.enabled", "true"),
        ("window.milliseconds", "800"),
    ]);
    let batches = vec![
        Ok(create_record_batch(vec![1], vec![Some("a")])),
        Ok(create_record_batch(vec![2], vec![Some("b")])),
        Ok(create_record_batch(vec![3], vec![Some("c")])),
    ];
    let mut step = step_with(config, Arc::clone(&clock), batches).unwrap();
    let mut stream = step.get_stream().unwrap();

    block_on(async {
        // t=0: window holds only the first batch.
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(ids_of(&first[0]), vec![1]);

        // t=500: both batches are inside the trailing 800ms.
        clock.set(500);
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(ids_of(&second[0]), vec![1, 2]);

        // t=1000: the batch that arrived at t=0 has left the window.
        clock.set(1000);
        let third = stream.next().await.unwrap().unwrap();
        assert_eq!(ids_of(&third[0]), vec![2, 3]);
    });
}

#[test]
fn test_repartition_distributes_rows_round_robin() {
    let clock = ManualClock::new(0);
    let config = PlannerConfig::from_pairs([
        ("input.repartition", "true"),
        ("input.repartition.partitions", "2"),
    ]);
    let batch = create_record_batch(
        vec![1, 2, 3, 4, 5],
        vec![Some("a"), Some("b"), Some("c"), Some("d"), Some("e")],
    );
    let mut step = step_with(config, clock, vec![Ok(batch)]).unwrap();

    let shaped: Vec<_> = block_on(step.get_stream().unwrap().collect());
    let partitions = shaped[0].as_ref().unwrap();

    assert_eq!(partitions.len(), 2);
    assert_eq!(ids_of(&partitions[0]), vec![1, 3, 5]);
    assert_eq!(ids_of(&partitions[1]), vec![2, 4]);
}

#[test]
fn test_window_enabled_without_milliseconds_is_a_config_error() {
    let clock = ManualClock::new(0);
    let config = PlannerConfig::from_pairs([("window.enabled", "true")]);

    let err = step_with(config, clock, Vec::new()).unwrap_err();
    assert!(matches!(err, SeshatError::Config(_)));
}

#[test]
fn test_repartition_enabled_without_partitions_is_a_config_error() {
    let clock = ManualClock::new(0);
    let config = PlannerConfig::from_pairs([("input.repartition", "true")]);

    let err = step_with(config, clock, Vec::new()).unwrap_err();
    assert!(matches!(err, SeshatError::Config(_)));
}

#[test]
fn test_source_errors_propagate_unchanged() {
    let clock = ManualClock::new(0);
    let items = vec![
        Ok(create_record_batch(vec![1], vec![Some("a")])),
        Err(SeshatError::Source("transport dropped".to_string())),
    ];
    let mut step = step_with(PlannerConfig::default(), clock, items).unwrap();

    let shaped: Vec<_> = block_on(step.get_stream().unwrap().collect());

    assert!(shaped[0].is_ok());
    match shaped[1].as_ref().unwrap_err() {
        SeshatError::Source(message) => assert_eq!(message, "transport dropped"),
        other => panic!("expected source error, got {other:?}"),
    }
}

#[test]
fn test_schema_passes_through_from_the_source() {
    let clock = ManualClock::new(0);
    let step = step_with(PlannerConfig::default(), clock, Vec::new()).unwrap();

    let schema = step.get_schema().unwrap();
    assert_eq!(schema.fields().len(), 2);
    assert_eq!(schema.field(0).name(), "id");
}
