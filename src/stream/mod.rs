pub mod shaping;
pub mod source;

pub use shaping::StreamingStep;
pub use source::{RecordBatchStream, StreamInput};
