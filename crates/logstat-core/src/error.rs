use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read log source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report rows: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Log source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Log source is a directory, not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("No parseable records in log source: wrong log format or content")]
    EmptyRun,

    #[error("Cannot assemble a report from an empty set of URL statistics")]
    EmptyReport,

    #[error("Percentage is undefined when the run totals are zero")]
    PercentageUndefined,

    #[error("Report template does not contain the placeholder {0}")]
    TemplatePlaceholderMissing(String),

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("Log source {} exceeds the limit of {limit} lines", .path.display())]
    LineLimitExceeded { path: PathBuf, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
