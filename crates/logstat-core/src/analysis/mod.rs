mod aggregator;
mod assembler;
mod metrics;

pub use aggregator::{AggregatedRun, RunTotals, UrlAggregator, UrlStats};
pub use assembler::{ReportAssembler, ReportRow};
pub use metrics::{MetricCalculator, UrlMetrics};
