pub mod analysis;
pub mod error;
pub mod log;
pub mod pipeline;
pub mod report;

pub use error::{Error, Result};
pub use pipeline::{ParsedRun, PipelineConfig, PipelineOrchestrator, RunOutcome, RunSummary};
