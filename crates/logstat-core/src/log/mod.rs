mod extractor;
mod source;

pub use extractor::{FailureReason, LogRecord, ParseFailure, RecordExtractor};
pub use source::{Lines, LogSource};
