use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use futures::stream::BoxStream;

use crate::errors::Result;

/// An unbounded sequence of record micro-batches produced by a source
/// connector.
pub type RecordBatchStream = BoxStream<'static, Result<RecordBatch>>;

/// The source collaborator feeding the streaming shaping step.
///
/// Implementations wrap an ingestion transport (message queue, change
/// log, socket) and expose its data as micro-batches plus the schema
/// those batches conform to. Errors from the transport are surfaced
/// through the stream items and propagate downstream unchanged.
pub trait StreamInput: Send {
    /// Opens the unbounded micro-batch stream.
    fn get_stream(&mut self) -> Result<RecordBatchStream>;

    /// The schema of every batch the stream yields.
    fn get_schema(&self) -> Result<SchemaRef>;
}
