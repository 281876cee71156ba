use std::collections::VecDeque;
use std::sync::Arc;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use futures::future;
use futures::stream::BoxStream;
use futures::StreamExt;
use log::trace;

use crate::arrow_bridge::{concat_batches, round_robin_split};
use crate::clock::Clock;
use crate::config::PlannerConfig;
use crate::errors::Result;
use crate::stream::source::{RecordBatchStream, StreamInput};

/// Configuration key toggling repartitioning.
pub const REPARTITION_PROPERTY: &str = "input.repartition";
/// Configuration key for the repartition parallelism.
pub const REPARTITION_NUM_PARTITIONS_PROPERTY: &str = "input.repartition.partitions";
/// Configuration key toggling time-window expansion.
pub const WINDOW_ENABLED_PROPERTY: &str = "window.enabled";
/// Configuration key for the window length.
pub const WINDOW_MILLISECONDS_PROPERTY: &str = "window.milliseconds";

/// Shapes a raw micro-batch stream into the logical arriving batches the
/// planners consume.
///
/// Two optional stages apply, in order:
/// 1. window expansion — each emitted batch replays the trailing
///    `window.milliseconds` of micro-batches, which defines how much
///    history constitutes "arriving" for the next planning cycle;
/// 2. repartitioning — rows are redistributed round-robin across a fixed
///    number of partition batches. A parallelism knob only: planners
///    reason per key, never per partition, so correctness is unaffected.
///
/// Errors from the underlying source propagate through unchanged.
pub struct StreamingStep {
    input: Box<dyn StreamInput>,
    clock: Arc<dyn Clock>,
    window_milliseconds: Option<i64>,
    repartition_partitions: Option<usize>,
}

impl std::fmt::Debug for StreamingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingStep")
            .field("window_milliseconds", &self.window_milliseconds)
            .field("repartition_partitions", &self.repartition_partitions)
            .finish_non_exhaustive()
    }
}

impl StreamingStep {
    /// Creates the step, validating configuration eagerly: enabling a
    /// toggle without its required integer is a configuration error
    /// surfaced here, not at first poll.
    pub fn new(
        config: &PlannerConfig,
        input: Box<dyn StreamInput>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let window_milliseconds = if config.get_bool_or(WINDOW_ENABLED_PROPERTY, false)? {
            Some(config.require_positive_i64(WINDOW_MILLISECONDS_PROPERTY)?)
        } else {
            None
        };

        let repartition_partitions = if config.get_bool_or(REPARTITION_PROPERTY, false)? {
            Some(config.require_positive_i64(REPARTITION_NUM_PARTITIONS_PROPERTY)? as usize)
        } else {
            None
        };

        Ok(Self {
            input,
            clock,
            window_milliseconds,
            repartition_partitions,
        })
    }

    /// Opens the shaped stream. Each item is one logical arriving batch,
    /// split into its partition batches (a single-element list when
    /// repartitioning is disabled).
    pub fn get_stream(&mut self) -> Result<BoxStream<'static, Result<Vec<RecordBatch>>>> {
        let mut stream = self.input.get_stream()?;

        if let Some(window_milliseconds) = self.window_milliseconds {
            stream = expand_to_window(stream, window_milliseconds, Arc::clone(&self.clock));
        }

        let partitions = self.repartition_partitions;
        Ok(stream
            .map(move |item| {
                item.and_then(|batch| match partitions {
                    Some(partitions) => round_robin_split(&batch, partitions),
                    None => Ok(vec![batch]),
                })
            })
            .boxed())
    }

    /// The schema of the shaped stream, straight from the source.
    pub fn get_schema(&self) -> Result<SchemaRef> {
        self.input.get_schema()
    }
}

/// Expands each micro-batch into the concatenation of every micro-batch
/// that arrived within the trailing `window_milliseconds`, by arrival
/// time against the injected clock.
fn expand_to_window(
    stream: RecordBatchStream,
    window_milliseconds: i64,
    clock: Arc<dyn Clock>,
) -> RecordBatchStream {
    let buffer: VecDeque<(i64, RecordBatch)> = VecDeque::new();

    stream
        .scan(buffer, move |buffer, item| {
            let expanded = item.and_then(|batch| {
                let now = clock.now_millis();
                let schema = batch.schema();
                buffer.push_back((now, batch));

                while buffer
                    .front()
                    .is_some_and(|(arrived, _)| now - arrived >= window_milliseconds)
                {
                    buffer.pop_front();
                    trace!("evicted micro-batch that left the trailing window");
                }

                let retained: Vec<RecordBatch> =
                    buffer.iter().map(|(_, batch)| batch.clone()).collect();
                concat_batches(&schema, &retained)
            });

            future::ready(Some(expanded))
        })
        .boxed()
}
