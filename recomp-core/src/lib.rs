#![forbid(unsafe_code)]

pub mod batch;
pub mod codec;
pub mod convert;
pub mod error;
pub mod format;
pub mod progress;
pub mod schedule;

// Re-exports: stable API surface
pub use batch::{BatchOptions, BatchSummary, FileFailure, run_batch};
pub use codec::{Codec, CodecRegistry};
pub use convert::{ConversionJob, ConvertOutcome, convert};
pub use error::{RecompError, Result};
pub use format::Format;
