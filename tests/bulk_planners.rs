use std::collections::HashSet;

use arrow::array::{Array, StringArray};
use seshat::{BulkPlanner, MutationType, PlannerConfig, Seshat, SeshatError};

mod common;

use common::{create_record_batch, ManualClock};

fn bulk_planner(config: PlannerConfig, now: i64) -> Box<dyn BulkPlanner> {
    Seshat::with_clock(config, ManualClock::new(now))
        .bulk_planner("append")
        .unwrap()
}

fn utf8_column<'a>(batch: &'a arrow::record_batch::RecordBatch, name: &str) -> &'a StringArray {
    let index = batch.schema().column_with_name(name).unwrap().0;
    batch
        .column(index)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap()
}

#[test]
fn test_append_plans_exactly_one_insert_spanning_the_input() {
    let planner = bulk_planner(PlannerConfig::default(), 0);
    let batch = create_record_batch(vec![1, 2, 3], vec![Some("a"), Some("b"), None]);

    let plan = planner.plan_mutations_for_set(batch.clone()).unwrap();

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].mutation_type(), MutationType::Insert);
    assert_eq!(*plan[0].data(), batch);
}

#[test]
fn test_append_stamps_audit_field_uniformly() {
    let config = PlannerConfig::from_pairs([("field.last.updated", "last_updated")]);
    let planner = bulk_planner(config, 42);
    let batch = create_record_batch(vec![1, 2, 3], vec![Some("a"), Some("b"), Some("c")]);

    let plan = planner.plan_mutations_for_set(batch).unwrap();
    let planned = plan[0].data();

    assert_eq!(planned.num_rows(), 3);
    let stamps = utf8_column(planned, "last_updated");
    for row in 0..planned.num_rows() {
        assert_eq!(stamps.value(row), "42");
    }
}

#[test]
fn test_append_uuid_keys_are_distinct_and_canonical() {
    let config = PlannerConfig::from_pairs([
        ("fields.key", "value"),
        ("uuid.key.enabled", "true"),
    ]);
    let planner = bulk_planner(config, 0);
    let batch = create_record_batch(
        vec![1, 2, 3, 4],
        vec![Some("w"), Some("x"), Some("y"), Some("z")],
    );

    let plan = planner.plan_mutations_for_set(batch).unwrap();
    let planned = plan[0].data();
    let keys = utf8_column(planned, "value");

    let mut seen = HashSet::new();
    for row in 0..planned.num_rows() {
        let key = keys.value(row);
        assert_eq!(key.len(), 36);
        for hyphen in [8, 13, 18, 23] {
            assert_eq!(&key[hyphen..=hyphen], "-");
        }
        assert!(key
            .chars()
            .all(|c| c == '-' || c.is_ascii_hexdigit()));
        seen.insert(key.to_string());
    }
    assert_eq!(seen.len(), 4);

    // The pre-existing key values were overwritten, and no column was added.
    assert_eq!(planned.num_columns(), 2);
    assert!(!seen.contains("w"));
}

#[test]
fn test_append_uuid_keys_require_key_fields() {
    let config = PlannerConfig::from_pairs([("uuid.key.enabled", "true")]);
    let err = Seshat::with_clock(config, ManualClock::new(0))
        .bulk_planner("append")
        .unwrap_err();

    assert!(matches!(err, SeshatError::Config(_)));
}

#[test]
fn test_append_emits_insert_only() {
    let planner = bulk_planner(PlannerConfig::default(), 0);
    let emitted = planner.emitted_mutation_types();

    assert_eq!(emitted.len(), 1);
    assert!(emitted.contains(&MutationType::Insert));
    assert_eq!(planner.alias(), "append");
}

#[test]
fn test_overwrite_plans_exactly_one_overwrite_with_the_dataset_untouched() {
    let planner = Seshat::with_clock(PlannerConfig::default(), ManualClock::new(0))
        .bulk_planner("overwrite")
        .unwrap();
    let batch = create_record_batch(vec![1, 2], vec![Some("a"), Some("b")]);

    let plan = planner.plan_mutations_for_set(batch.clone()).unwrap();

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].mutation_type(), MutationType::Overwrite);
    assert_eq!(*plan[0].data(), batch);

    let emitted = planner.emitted_mutation_types();
    assert_eq!(emitted.len(), 1);
    assert!(emitted.contains(&MutationType::Overwrite));
    assert_eq!(planner.alias(), "overwrite");
}
